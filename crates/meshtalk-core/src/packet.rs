//! The application-level mesh packet.
//!
//! A `DataPacket` is the addressed, typed envelope around one mesh payload.
//! It is what radio ingress hands to the application and what the
//! application hands back to the transport for sending.
//!
//! Identity is structural: two packets are equal when their addressing,
//! timing, correlation id, port, payload content, status, hop limit and
//! channel all match. `error_message` is diagnostic and never takes part.

use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::addr::{is_broadcast, BROADCAST_ID, LOCAL_ID};
use crate::config::PacketConfig;
use crate::portnum::TEXT_MESSAGE_APP;
use crate::status::MessageStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPacket {
    /// Destination node id, or [`BROADCAST_ID`].
    pub to: Option<String>,

    /// Payload. `None` only for control packets without a body; an empty
    /// payload is a different packet.
    #[serde(with = "hex_bytes")]
    bytes: Option<Bytes>,

    /// Port number selecting how `bytes` is interpreted.
    data_type: i32,

    /// Sender node id, or [`LOCAL_ID`].
    pub from: Option<String>,

    /// Milliseconds since the Unix epoch.
    pub time: i64,

    /// Correlation id for acks. 0 means unassigned.
    pub id: u32,

    pub status: Option<MessageStatus>,

    /// Relay hops remaining.
    pub hop_limit: u32,

    /// Channel index.
    pub channel: u32,

    /// What went wrong, when `status` is ERROR.
    #[serde(skip)]
    pub error_message: Option<String>,
}

impl DataPacket {
    /// Broadcast from the local node, stamped now, status UNKNOWN.
    pub fn new(bytes: Option<Bytes>, data_type: i32) -> Self {
        Self {
            to: Some(BROADCAST_ID.to_string()),
            bytes,
            data_type,
            from: Some(LOCAL_ID.to_string()),
            time: now_millis(),
            id: 0,
            status: Some(MessageStatus::Unknown),
            hop_limit: 0,
            channel: 0,
            error_message: None,
        }
    }

    /// A text message with default addressing for everything but `to`.
    pub fn new_text(to: Option<String>, text: &str) -> Self {
        Self::new(
            Some(Bytes::copy_from_slice(text.as_bytes())),
            TEXT_MESSAGE_APP,
        )
        .with_to(to)
    }

    pub fn with_to(mut self, to: Option<String>) -> Self {
        self.to = to;
        self
    }

    pub fn with_from(mut self, from: Option<String>) -> Self {
        self.from = from;
        self
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: Option<MessageStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_hop_limit(mut self, hop_limit: u32) -> Self {
        self.hop_limit = hop_limit;
        self
    }

    pub fn with_channel(mut self, channel: u32) -> Self {
        self.channel = channel;
        self
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        self.bytes.as_ref()
    }

    pub fn data_type(&self) -> i32 {
        self.data_type
    }

    /// The payload as text, if this is a text message.
    ///
    /// Invalid UTF-8 is decoded lossily (U+FFFD), so a corrupt payload
    /// still yields a value rather than an error.
    pub fn text(&self) -> Option<String> {
        if self.data_type != TEXT_MESSAGE_APP {
            return None;
        }
        self.bytes
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Mark the packet failed.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(MessageStatus::Error);
        self.error_message = Some(message.into());
    }

    /// An outgoing QUEUED text packet shaped by `config`: fresh correlation
    /// id, configured hop limit and channel.
    pub fn compose_text<R: Rng + ?Sized>(
        config: &PacketConfig,
        to: Option<String>,
        text: &str,
        rng: &mut R,
    ) -> Result<Self, PacketError> {
        if text.len() > config.max_payload_len {
            return Err(PacketError::PayloadTooLarge {
                len: text.len(),
                max: config.max_payload_len,
            });
        }
        Ok(Self::new_text(to, text)
            .with_id(generate_packet_id(rng))
            .with_status(Some(MessageStatus::Queued))
            .with_hop_limit(config.default_hop_limit)
            .with_channel(config.default_channel))
    }

    /// Originated on this device.
    pub fn is_outgoing(&self) -> bool {
        self.from.as_deref() == Some(LOCAL_ID)
    }

    /// BLAKE3 over every identity field in equality order.
    /// Equal packets share a fingerprint; `error_message` never contributes.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hash_nullable(&mut hasher, self.from.as_deref().map(str::as_bytes));
        hash_nullable(&mut hasher, self.to.as_deref().map(str::as_bytes));
        hasher.update(&self.time.to_le_bytes());
        hasher.update(&self.id.to_le_bytes());
        hasher.update(&self.data_type.to_le_bytes());
        hash_nullable(&mut hasher, self.bytes.as_deref());
        hasher.update(&self.status.map_or(-1, MessageStatus::ordinal).to_le_bytes());
        hasher.update(&self.hop_limit.to_le_bytes());
        hasher.update(&self.channel.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Conversation key: channel index followed by the remote party.
    ///
    /// Broadcasts and outgoing packets key on `to`; everything else on `from`.
    pub fn contact_key(&self) -> String {
        let broadcast = self.to.as_deref().is_some_and(is_broadcast);
        let peer = if self.is_outgoing() || broadcast {
            self.to.as_deref()
        } else {
            self.from.as_deref()
        };
        format!("{}{}", self.channel, peer.unwrap_or_default())
    }
}

impl PartialEq for DataPacket {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.channel == other.channel
            && self.time == other.time
            && self.id == other.id
            && self.data_type == other.data_type
            && self.bytes == other.bytes
            && self.status == other.status
            && self.hop_limit == other.hop_limit
    }
}

impl Eq for DataPacket {}

impl Hash for DataPacket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.time.hash(state);
        self.id.hash(state);
        self.data_type.hash(state);
        self.bytes.hash(state);
        self.status.hash(state);
        self.hop_limit.hash(state);
        self.channel.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    #[error("payload is {len} bytes, limit is {max}")]
    PayloadTooLarge { len: usize, max: usize },
}

fn hash_nullable(hasher: &mut blake3::Hasher, field: Option<&[u8]>) {
    match field {
        Some(data) => {
            hasher.update(&[1]);
            hasher.update(&(data.len() as u64).to_le_bytes());
            hasher.update(data);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

/// Random non-zero correlation id for an outgoing packet.
pub fn generate_packet_id<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(1..=u32::MAX)
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

mod hex_bytes {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_some(&hex::encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Bytes>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map(Bytes::from).map_err(serde::de::Error::custom))
            .transpose()
    }
}
