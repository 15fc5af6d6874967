//! Node id conversion commands.

use anyhow::{Context, Result};
use meshtalk_core::addr::{id_to_node_num, node_num_to_id};

/// Parse a node number given in decimal or `0x` hex.
pub fn parse_node_num(arg: &str) -> Result<u32> {
    match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => arg.parse(),
    }
    .with_context(|| format!("not a 32-bit node number: {arg}"))
}

pub fn cmd_node_id(arg: &str) -> Result<String> {
    Ok(node_num_to_id(parse_node_num(arg)?))
}

pub fn cmd_node_num(id: &str) -> Result<String> {
    let n = id_to_node_num(id)?;
    Ok(n.to_string())
}
