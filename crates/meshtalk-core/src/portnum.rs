//! Well-known application port numbers.
//!
//! A packet's `data_type` selects how its payload is interpreted. The
//! registry is owned by the mesh protocol; these are the values applications
//! commonly route on. Only [`TEXT_MESSAGE_APP`] is interpreted by this crate.

pub const UNKNOWN_APP: i32 = 0;
/// UTF-8 text, no framing.
pub const TEXT_MESSAGE_APP: i32 = 1;
pub const REMOTE_HARDWARE_APP: i32 = 2;
pub const POSITION_APP: i32 = 3;
pub const NODEINFO_APP: i32 = 4;
pub const ROUTING_APP: i32 = 5;
pub const ADMIN_APP: i32 = 6;
pub const TEXT_MESSAGE_COMPRESSED_APP: i32 = 7;
pub const WAYPOINT_APP: i32 = 8;
pub const TELEMETRY_APP: i32 = 67;
/// First port free for private applications.
pub const PRIVATE_APP: i32 = 256;
/// Highest valid port number.
pub const MAX: i32 = 511;

/// True for ports inside the registry range, `0..=MAX`.
pub fn is_valid(port: i32) -> bool {
    (UNKNOWN_APP..=MAX).contains(&port)
}

/// Registry name for a known port.
pub fn name(port: i32) -> Option<&'static str> {
    match port {
        UNKNOWN_APP => Some("UNKNOWN_APP"),
        TEXT_MESSAGE_APP => Some("TEXT_MESSAGE_APP"),
        REMOTE_HARDWARE_APP => Some("REMOTE_HARDWARE_APP"),
        POSITION_APP => Some("POSITION_APP"),
        NODEINFO_APP => Some("NODEINFO_APP"),
        ROUTING_APP => Some("ROUTING_APP"),
        ADMIN_APP => Some("ADMIN_APP"),
        TEXT_MESSAGE_COMPRESSED_APP => Some("TEXT_MESSAGE_COMPRESSED_APP"),
        WAYPOINT_APP => Some("WAYPOINT_APP"),
        TELEMETRY_APP => Some("TELEMETRY_APP"),
        PRIVATE_APP => Some("PRIVATE_APP"),
        _ => None,
    }
}
