//! Delivery status of a packet.
//!
//! ```text
//! UNKNOWN -> QUEUED -> ENROUTE -> DELIVERED
//!                             \-> ERROR
//! RECEIVED   (initial state for inbound packets)
//! ```
//!
//! The transport drives every transition. A packet stores whatever status
//! it is given; [`MessageStatus::is_defined_transition`] only describes the
//! diagram so callers can log surprises.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinals are part of the boundary record format. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum MessageStatus {
    /// Not set for this message.
    #[default]
    Unknown = 0,
    /// Came in from the mesh.
    Received = 1,
    /// Waiting to be sent once the radio is connected.
    Queued = 2,
    /// Handed to the radio, no ack or nak yet.
    Enroute = 3,
    /// Acknowledged by the destination.
    Delivered = 4,
    /// Nak received, not delivered.
    Error = 5,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 6] = [
        Self::Unknown,
        Self::Received,
        Self::Queued,
        Self::Enroute,
        Self::Delivered,
        Self::Error,
    ];

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// No further transport reports are expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Error)
    }

    /// Whether `from -> to` is an edge of the status diagram.
    /// Re-reporting the same status is not an edge.
    pub fn is_defined_transition(from: Self, to: Self) -> bool {
        use MessageStatus::*;
        matches!(
            (from, to),
            (Unknown, Queued)
                | (Unknown, Received)
                | (Queued, Enroute)
                | (Enroute, Delivered)
                | (Enroute, Error)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Received => "RECEIVED",
            Self::Queued => "QUEUED",
            Self::Enroute => "ENROUTE",
            Self::Delivered => "DELIVERED",
            Self::Error => "ERROR",
        }
    }
}

impl TryFrom<i32> for MessageStatus {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.ordinal() == value)
            .ok_or(value)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
