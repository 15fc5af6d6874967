//! meshtalk integration test harness.
//!
//! These tests wire core and services together the way an application
//! does: a transport side that only speaks boundary records and status
//! reports, and an application side that owns the store.
//!
//!   cargo test --test integration

use std::sync::Arc;

use meshtalk_core::config::MeshtalkConfig;
use meshtalk_core::DataPacket;
use meshtalk_services::{DeliveryTracker, MessageStore, PacketDispatcher, TextMessageService};

mod contract;
mod delivery;
mod handoff;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Application side: store, text service, dispatcher and tracker sharing one store.
pub struct App {
    pub store: MessageStore,
    pub text: Arc<TextMessageService>,
    pub dispatcher: Arc<PacketDispatcher>,
    pub tracker: DeliveryTracker,
}

pub fn app() -> App {
    app_with(MeshtalkConfig::default())
}

pub fn app_with(config: MeshtalkConfig) -> App {
    let store = MessageStore::new(config.store.max_messages_per_contact);
    let text = Arc::new(TextMessageService::new(store.clone(), config.packets));
    let mut dispatcher = PacketDispatcher::new();
    dispatcher.register(text.clone());
    App {
        tracker: DeliveryTracker::new(store.clone()),
        store,
        text,
        dispatcher: Arc::new(dispatcher),
    }
}

/// A text packet as radio ingress would decode it.
pub fn inbound_text(from: &str, text: &str, id: u32) -> DataPacket {
    DataPacket::new_text(Some("!00000001".into()), text)
        .with_from(Some(from.to_string()))
        .with_id(id)
        .with_hop_limit(2)
        .with_time(1_700_000_000_000 + id as i64)
}
