//! CLI command modules.

pub mod node;
pub mod packet;
