use dashmap::DashMap;
use meshtalk_core::{DataPacket, MessageStatus};
use std::sync::Arc;

/// In-memory message store
#[derive(Clone, Default)]
pub struct MessageStore {
    /// Packets per conversation: contact key -> packets in arrival order
    messages: Arc<DashMap<String, Vec<DataPacket>>>,
    /// Oldest packets are dropped past this count. 0 = unlimited.
    max_per_contact: usize,
}

impl MessageStore {
    pub fn new(max_per_contact: usize) -> Self {
        Self {
            messages: Arc::new(DashMap::new()),
            max_per_contact,
        }
    }

    /// Add a packet under its contact key.
    /// Returns false if an equal packet is already stored.
    pub fn add(&self, packet: DataPacket) -> bool {
        let mut entry = self.messages.entry(packet.contact_key()).or_default();
        if entry.contains(&packet) {
            return false;
        }
        entry.push(packet);
        if self.max_per_contact > 0 && entry.len() > self.max_per_contact {
            let excess = entry.len() - self.max_per_contact;
            entry.drain(..excess);
        }
        true
    }

    /// Get all packets for a contact
    pub fn get(&self, contact_key: &str) -> Vec<DataPacket> {
        self.messages
            .get(contact_key)
            .map(|msgs| msgs.clone())
            .unwrap_or_default()
    }

    /// Get packets newer than `since` (milliseconds)
    pub fn get_since(&self, contact_key: &str, since: i64) -> Vec<DataPacket> {
        self.messages
            .get(contact_key)
            .map(|msgs| msgs.iter().filter(|m| m.time > since).cloned().collect())
            .unwrap_or_default()
    }

    /// Count packets for a contact
    pub fn count(&self, contact_key: &str) -> usize {
        self.messages
            .get(contact_key)
            .map(|msgs| msgs.len())
            .unwrap_or(0)
    }

    /// Known contact keys, sorted
    pub fn contacts(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.messages.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Find a packet by its correlation id. Id 0 is never matched.
    pub fn find_by_id(&self, id: u32) -> Option<DataPacket> {
        if id == 0 {
            return None;
        }
        self.messages
            .iter()
            .find_map(|e| e.value().iter().find(|m| m.id == id).cloned())
    }

    /// Record a status change for the outgoing packet with this id.
    /// Inbound packets are never matched: their ids belong to other senders.
    /// Returns the previous status, or None if no packet matched.
    pub fn update_status(
        &self,
        id: u32,
        status: MessageStatus,
        error: Option<String>,
    ) -> Option<Option<MessageStatus>> {
        if id == 0 {
            return None;
        }
        for mut entry in self.messages.iter_mut() {
            let found = entry
                .value_mut()
                .iter_mut()
                .find(|m| m.id == id && m.is_outgoing());
            if let Some(packet) = found {
                let previous = packet.status.replace(status);
                packet.error_message = error;
                return Some(previous);
            }
        }
        None
    }

    /// Clear all packets
    pub fn clear(&self) {
        self.messages.clear();
    }
}
