//! meshtalk-core — the mesh packet envelope, its delivery status, node
//! addressing, and the boundary record format.
//! All other meshtalk crates depend on this one.

pub mod addr;
pub mod config;
pub mod packet;
pub mod portnum;
pub mod status;
pub mod wire;

pub use addr::{node_num_to_id, BROADCAST_ID, BROADCAST_NUM, LOCAL_ID};
pub use packet::{generate_packet_id, DataPacket, PacketError};
pub use status::MessageStatus;
pub use wire::WireError;
