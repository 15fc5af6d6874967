//! Routes inbound packets to the service that owns their port.

use std::collections::HashMap;
use std::sync::Arc;

use meshtalk_core::{portnum, DataPacket, WireError};

use crate::service::PacketService;

/// Maps port numbers to services and dispatches inbound packets.
#[derive(Default)]
pub struct PacketDispatcher {
    services: HashMap<i32, Arc<dyn PacketService>>,
}

impl PacketDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under its port. Replaces any previous owner.
    pub fn register(&mut self, service: Arc<dyn PacketService>) {
        let port = service.port();
        if self.services.insert(port, service).is_some() {
            tracing::warn!(port, "replaced existing service for port");
        }
    }

    /// Ports with a registered service.
    pub fn ports(&self) -> Vec<i32> {
        let mut ports: Vec<i32> = self.services.keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    /// Dispatch a packet to the service owning its port.
    /// Returns false if no service handles this port or the port is out of range.
    pub fn dispatch(&self, packet: DataPacket) -> bool {
        let port = packet.data_type();
        if !portnum::is_valid(port) {
            tracing::warn!(port, id = packet.id, "port outside registry range");
            return false;
        }
        let Some(service) = self.services.get(&port) else {
            tracing::debug!(port, id = packet.id, "no service for port");
            return false;
        };
        let id = packet.id;
        if let Err(e) = service.handle_packet(packet) {
            tracing::warn!(
                port,
                id,
                error = %e,
                "service packet handling failed"
            );
        }
        true
    }

    /// Decode one boundary record and dispatch it.
    pub fn dispatch_record(&self, record: &[u8]) -> Result<bool, WireError> {
        let packet = DataPacket::from_record(record)?;
        Ok(self.dispatch(packet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtalk_core::portnum::{POSITION_APP, TEXT_MESSAGE_APP};
    use std::sync::Mutex;

    struct Recorder {
        port: i32,
        seen: Mutex<Vec<DataPacket>>,
        fail: bool,
    }

    impl Recorder {
        fn new(port: i32, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                port,
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    impl PacketService for Recorder {
        fn port(&self) -> i32 {
            self.port
        }

        fn handle_packet(&self, packet: DataPacket) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(packet);
            if self.fail {
                anyhow::bail!("refused");
            }
            Ok(())
        }
    }

    #[test]
    fn routes_by_port() {
        let text = Recorder::new(TEXT_MESSAGE_APP, false);
        let position = Recorder::new(POSITION_APP, false);
        let mut dispatcher = PacketDispatcher::new();
        dispatcher.register(text.clone());
        dispatcher.register(position.clone());
        assert_eq!(dispatcher.ports(), vec![TEXT_MESSAGE_APP, POSITION_APP]);

        let p = DataPacket::new_text(None, "hi");
        assert!(dispatcher.dispatch(p.clone()));
        assert_eq!(text.seen.lock().unwrap().as_slice(), &[p]);
        assert!(position.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unknown_port_is_not_handled() {
        let dispatcher = PacketDispatcher::new();
        assert!(!dispatcher.dispatch(DataPacket::new(None, 300)));
    }

    #[test]
    fn out_of_range_port_is_dropped() {
        let stray = Recorder::new(portnum::MAX + 1, false);
        let mut dispatcher = PacketDispatcher::new();
        dispatcher.register(stray.clone());

        assert!(!dispatcher.dispatch(DataPacket::new(None, portnum::MAX + 1)));
        assert!(!dispatcher.dispatch(DataPacket::new(None, -3)));
        assert!(stray.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn service_errors_are_contained() {
        let failing = Recorder::new(TEXT_MESSAGE_APP, true);
        let mut dispatcher = PacketDispatcher::new();
        dispatcher.register(failing.clone());
        assert!(dispatcher.dispatch(DataPacket::new_text(None, "x")));
        assert_eq!(failing.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn dispatch_record_decodes_first() {
        let text = Recorder::new(TEXT_MESSAGE_APP, false);
        let mut dispatcher = PacketDispatcher::new();
        dispatcher.register(text.clone());

        let p = DataPacket::new_text(None, "over the wire").with_id(5);
        assert_eq!(dispatcher.dispatch_record(&p.to_record().unwrap()), Ok(true));
        assert_eq!(text.seen.lock().unwrap()[0], p);

        assert!(dispatcher.dispatch_record(&[1, 2]).is_err());
    }
}
