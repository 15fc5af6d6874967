//! Service trait for port-based packet consumers.
//!
//! Every application that listens on the mesh owns one port number. This
//! trait is the contract between ingress (which decodes packets) and the
//! service logic (which interprets their payload).

use anyhow::Result;
use meshtalk_core::DataPacket;

/// Trait for services that consume inbound packets on one port.
pub trait PacketService: Send + Sync {
    /// The port number this service owns.
    fn port(&self) -> i32;

    /// Handle an inbound packet routed to this service's port.
    ///
    /// Ownership is handed over: ingress keeps no reference to the packet,
    /// so the service may mutate it freely.
    fn handle_packet(&self, packet: DataPacket) -> Result<()>;
}
