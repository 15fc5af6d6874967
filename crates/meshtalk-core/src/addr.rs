//! Node addressing — reserved identities and the canonical node id form.
//!
//! A node on the mesh is a 32-bit number. Applications address it by its
//! canonical string id, `!` followed by eight lowercase hex digits. Two
//! reserved ids never map to a specific node: `^all` (every node) and
//! `^local` (this device, before it knows its own number).

/// Node id for broadcast destinations.
pub const BROADCAST_ID: &str = "^all";

/// Node id for the local node, used as `from` when the sender does not yet
/// know its own node number.
pub const LOCAL_ID: &str = "^local";

/// Numeric broadcast address. Counterpart of [`BROADCAST_ID`].
pub const BROADCAST_NUM: u32 = 0xffff_ffff;

/// Canonical string id for a node number. Total: every input has an output.
pub fn node_num_to_id(n: u32) -> String {
    format!("!{n:08x}")
}

/// Parse a canonical node id back to its number.
///
/// Accepts either hex case. [`BROADCAST_ID`] maps to [`BROADCAST_NUM`];
/// [`LOCAL_ID`] has no numeric form.
pub fn id_to_node_num(id: &str) -> Result<u32, AddrError> {
    if id == BROADCAST_ID {
        return Ok(BROADCAST_NUM);
    }
    if id == LOCAL_ID {
        return Err(AddrError::NoNumericForm(id.to_string()));
    }
    let digits = id
        .strip_prefix('!')
        .ok_or_else(|| AddrError::Malformed(id.to_string()))?;
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddrError::Malformed(id.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| AddrError::Malformed(id.to_string()))
}

/// True for the broadcast id.
pub fn is_broadcast(id: &str) -> bool {
    id == BROADCAST_ID
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddrError {
    #[error("malformed node id: {0:?} (expected '!' + 8 hex digits)")]
    Malformed(String),

    #[error("node id {0:?} has no numeric form")]
    NoNumericForm(String),
}
