//! Async handoff loops between the transport and the application.
//!
//! The transport side owns the senders. Records and reports cross the
//! channel by value, so no packet is ever shared mutably between tasks.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::delivery::{DeliveryTracker, StatusReport};
use crate::dispatch::PacketDispatcher;

/// Counts from one [`run_ingress`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngressSummary {
    pub dispatched: usize,
    pub unhandled: usize,
    pub malformed: usize,
}

/// Decode and dispatch boundary records until every sender is dropped.
pub async fn run_ingress(
    mut rx: mpsc::Receiver<Bytes>,
    dispatcher: Arc<PacketDispatcher>,
) -> IngressSummary {
    let mut summary = IngressSummary::default();
    while let Some(record) = rx.recv().await {
        match dispatcher.dispatch_record(&record) {
            Ok(true) => summary.dispatched += 1,
            Ok(false) => summary.unhandled += 1,
            Err(e) => {
                summary.malformed += 1;
                tracing::warn!(len = record.len(), error = %e, "dropping malformed record");
            }
        }
    }
    tracing::debug!(
        dispatched = summary.dispatched,
        unhandled = summary.unhandled,
        malformed = summary.malformed,
        "ingress closed"
    );
    summary
}

/// Apply status reports until every sender is dropped.
/// Returns how many reports matched a stored packet.
pub async fn run_status_reports(
    mut rx: mpsc::Receiver<StatusReport>,
    tracker: DeliveryTracker,
) -> usize {
    let mut applied = 0;
    while let Some(report) = rx.recv().await {
        if tracker.apply(report) {
            applied += 1;
        }
    }
    applied
}
