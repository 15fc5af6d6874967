//! meshtalk-services — application-side consumers of mesh packets.
//!
//! Ingress hands decoded packets to a [`PacketDispatcher`], which routes
//! them by port to a [`PacketService`]. Transport status reports flow
//! through the [`DeliveryTracker`] into the [`MessageStore`].

pub mod delivery;
pub mod dispatch;
pub mod ingress;
pub mod message_store;
pub mod service;
pub mod text_service;

pub use delivery::{DeliveryTracker, StatusReport};
pub use dispatch::PacketDispatcher;
pub use ingress::{run_ingress, run_status_reports, IngressSummary};
pub use message_store::MessageStore;
pub use service::PacketService;
pub use text_service::TextMessageService;
