//! Text message service — stores inbound text packets and composes
//! outgoing ones.
//!
//! The payload of a text packet is plain UTF-8 on [`TEXT_MESSAGE_APP`].
//! Outgoing packets are created QUEUED with a fresh correlation id so the
//! transport's ack or nak can find them again in the store.

use anyhow::{bail, Result};
use meshtalk_core::config::PacketConfig;
use meshtalk_core::portnum::TEXT_MESSAGE_APP;
use meshtalk_core::{DataPacket, MessageStatus};

use crate::message_store::MessageStore;
use crate::service::PacketService;

pub struct TextMessageService {
    store: MessageStore,
    config: PacketConfig,
}

impl TextMessageService {
    pub fn new(store: MessageStore, config: PacketConfig) -> Self {
        Self { store, config }
    }

    /// Build an outgoing text packet and record it in the store.
    pub fn compose(&self, to: Option<String>, text: &str) -> Result<DataPacket> {
        let packet = DataPacket::compose_text(&self.config, to, text, &mut rand::thread_rng())?;

        tracing::debug!(
            id = packet.id,
            to = packet.to.as_deref().unwrap_or_default(),
            len = text.len(),
            "text message queued"
        );

        self.store.add(packet.clone());
        Ok(packet)
    }
}

impl PacketService for TextMessageService {
    fn port(&self) -> i32 {
        TEXT_MESSAGE_APP
    }

    fn handle_packet(&self, mut packet: DataPacket) -> Result<()> {
        if packet.text().is_none() {
            bail!("text packet {} has no payload", packet.id);
        }
        if matches!(packet.status, None | Some(MessageStatus::Unknown)) {
            packet.status = Some(MessageStatus::Received);
        }

        let digest = hex::encode(&packet.fingerprint()[..8]);
        tracing::debug!(
            from = packet.from.as_deref().unwrap_or_default(),
            id = packet.id,
            channel = packet.channel,
            fingerprint = %digest,
            "text message received"
        );

        if !self.store.add(packet) {
            tracing::debug!(fingerprint = %digest, "duplicate text message ignored");
        }
        Ok(())
    }
}
