//! Delivery tracking — applies transport status reports to stored packets.
//!
//! The transport owns the status state machine. This tracker records what
//! it is told, and only logs when a report does not follow the diagram.

use meshtalk_core::MessageStatus;

use crate::message_store::MessageStore;

/// One progress report from the transport about an outgoing packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub id: u32,
    pub status: MessageStatus,
    /// Diagnostic text, normally only with ERROR.
    pub error: Option<String>,
}

impl StatusReport {
    pub fn new(id: u32, status: MessageStatus) -> Self {
        Self {
            id,
            status,
            error: None,
        }
    }

    pub fn failed(id: u32, error: impl Into<String>) -> Self {
        Self {
            id,
            status: MessageStatus::Error,
            error: Some(error.into()),
        }
    }
}

/// Applies status reports to a [`MessageStore`].
#[derive(Clone)]
pub struct DeliveryTracker {
    store: MessageStore,
}

impl DeliveryTracker {
    pub fn new(store: MessageStore) -> Self {
        Self { store }
    }

    /// Apply a report. Returns false if no stored outgoing packet has this id.
    pub fn apply(&self, report: StatusReport) -> bool {
        let StatusReport { id, status, error } = report;
        let Some(previous) = self.store.update_status(id, status, error) else {
            tracing::warn!(id, %status, "status report for unknown packet");
            return false;
        };

        let previous = previous.unwrap_or_default();
        if previous == status {
            tracing::debug!(id, %status, "repeated status report");
        } else if previous.is_terminal() {
            tracing::warn!(
                id,
                from = %previous,
                to = %status,
                "status report after terminal state recorded"
            );
        } else if !MessageStatus::is_defined_transition(previous, status) {
            tracing::warn!(
                id,
                from = %previous,
                to = %status,
                "undefined status transition recorded"
            );
        } else {
            tracing::debug!(id, from = %previous, to = %status, "status updated");
        }
        true
    }
}
