//! Packet record commands.

use anyhow::{Context, Result};
use meshtalk_core::config::PacketConfig;
use meshtalk_core::{portnum, DataPacket, BROADCAST_ID};
use serde::Serialize;

#[derive(Serialize)]
struct DecodedPacket<'a> {
    packet: &'a DataPacket,
    port_name: Option<&'static str>,
    text: Option<String>,
    fingerprint: String,
}

/// Hex record of a QUEUED text packet.
pub fn cmd_encode_text(
    config: &PacketConfig,
    to: Option<&str>,
    channel: Option<u32>,
    text: &str,
) -> Result<String> {
    let to = to.unwrap_or(BROADCAST_ID).to_string();
    let mut packet = DataPacket::compose_text(config, Some(to), text, &mut rand::thread_rng())?;
    if let Some(channel) = channel {
        packet.channel = channel;
    }

    tracing::debug!(id = packet.id, len = packet.record_len(), "encoded text packet");
    Ok(hex::encode(packet.to_record()?))
}

/// Pretty JSON view of a hex record.
pub fn cmd_decode(record_hex: &str) -> Result<String> {
    let record = hex::decode(record_hex.trim()).context("record is not valid hex")?;
    let packet = DataPacket::from_record(&record).context("failed to decode record")?;

    let decoded = DecodedPacket {
        packet: &packet,
        port_name: portnum::name(packet.data_type()),
        text: packet.text(),
        fingerprint: hex::encode(packet.fingerprint()),
    };
    serde_json::to_string_pretty(&decoded).context("failed to render packet")
}
