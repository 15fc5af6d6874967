//! Boundary record format — how a `DataPacket` crosses a process, thread
//! or persistence boundary.
//!
//! The record carries no field tags. Producers and consumers agree on the
//! field order, so changing anything here is a breaking change:
//!
//! ```text
//! to         nullable string   i32 length (-1 = absent) + UTF-8
//! bytes      nullable blob     i32 length (-1 = absent) + raw bytes
//! data_type  i32
//! from       nullable string
//! tail       RecordTail (24 bytes)
//! ```
//!
//! All integers are little-endian. `error_message` is not carried.
//! Decoding always builds a fresh packet; nothing is read into an existing one.

use bytes::{Buf, BufMut, Bytes};
use static_assertions::assert_eq_size;
use zerocopy::byteorder::{LittleEndian, I32, I64, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::packet::DataPacket;
use crate::status::MessageStatus;

// ── Record Tail ──────────────────────────────────────────────────────────────

/// Fixed-size trailing block of a record.
///
/// Wire size: 24 bytes.
#[derive(Debug, Clone, AsBytes, FromBytes, FromZeroes)]
#[repr(C)]
pub struct RecordTail {
    /// Milliseconds since the Unix epoch.
    pub time: I64<LittleEndian>,
    /// Correlation id. 0 = unassigned.
    pub id: U32<LittleEndian>,
    /// Status ordinal, or [`ABSENT`] when the packet has no status.
    pub status: I32<LittleEndian>,
    pub hop_limit: U32<LittleEndian>,
    pub channel: U32<LittleEndian>,
}

// Compile-time size guard. If this fails, the record format has silently changed.
assert_eq_size!(RecordTail, [u8; 24]);

// ── Constants ─────────────────────────────────────────────────────────────────

/// Length prefix (and status value) marking an absent field.
pub const ABSENT: i32 = -1;

/// Size of a length prefix.
const LEN_PREFIX: usize = 4;

/// Smallest possible record: three absent prefixes, data_type, tail.
pub const MIN_RECORD_LEN: usize = 3 * LEN_PREFIX + 4 + std::mem::size_of::<RecordTail>();

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors that can arise when writing or reading a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("record truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid length prefix: {0}")]
    InvalidLength(i32),

    #[error("field `{field}` is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("unknown status ordinal: {0}")]
    UnknownStatus(i32),

    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    #[error("field `{field}` is {len} bytes, longer than a length prefix can carry")]
    FieldTooLong { field: &'static str, len: usize },
}

// ── Encoding ──────────────────────────────────────────────────────────────────

impl DataPacket {
    /// Append this packet's record to `buf`.
    /// Nothing is written when a field is too long to encode.
    pub fn encode_to<B: BufMut>(&self, buf: &mut B) -> Result<(), WireError> {
        let to = self.to.as_deref().map(str::as_bytes);
        let bytes = self.bytes().map(|b| b.as_ref());
        let from = self.from.as_deref().map(str::as_bytes);
        let to_len = nullable_prefix("to", to)?;
        let bytes_len = nullable_prefix("bytes", bytes)?;
        let from_len = nullable_prefix("from", from)?;

        put_nullable(buf, to_len, to);
        put_nullable(buf, bytes_len, bytes);
        buf.put_i32_le(self.data_type());
        put_nullable(buf, from_len, from);

        let tail = RecordTail {
            time: I64::new(self.time),
            id: U32::new(self.id),
            status: I32::new(self.status.map_or(ABSENT, MessageStatus::ordinal)),
            hop_limit: U32::new(self.hop_limit),
            channel: U32::new(self.channel),
        };
        buf.put_slice(tail.as_bytes());
        Ok(())
    }

    /// Encode to a standalone record.
    pub fn to_record(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::with_capacity(self.record_len());
        self.encode_to(&mut buf)?;
        Ok(buf)
    }

    /// Exact encoded size in bytes.
    pub fn record_len(&self) -> usize {
        MIN_RECORD_LEN
            + self.to.as_ref().map_or(0, String::len)
            + self.bytes().map_or(0, Bytes::len)
            + self.from.as_ref().map_or(0, String::len)
    }

    /// Read one record from the front of `buf`, advancing past it.
    /// Use for streams of back-to-back records.
    pub fn decode(buf: &mut &[u8]) -> Result<DataPacket, WireError> {
        let to = get_string(buf, "to")?;
        let bytes = get_nullable(buf)?;
        need(buf, 4)?;
        let data_type = buf.get_i32_le();
        let from = get_string(buf, "from")?;

        let tail = RecordTail::read_from_prefix(*buf).ok_or(WireError::Truncated {
            needed: std::mem::size_of::<RecordTail>(),
            remaining: buf.len(),
        })?;
        buf.advance(std::mem::size_of::<RecordTail>());

        let status = match tail.status.get() {
            ABSENT => None,
            n => Some(MessageStatus::try_from(n).map_err(WireError::UnknownStatus)?),
        };

        Ok(DataPacket::new(bytes, data_type)
            .with_to(to)
            .with_from(from)
            .with_time(tail.time.get())
            .with_id(tail.id.get())
            .with_status(status)
            .with_hop_limit(tail.hop_limit.get())
            .with_channel(tail.channel.get()))
    }

    /// Decode a buffer holding exactly one record.
    pub fn from_record(data: &[u8]) -> Result<DataPacket, WireError> {
        let mut buf = data;
        let packet = Self::decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingBytes(buf.len()));
        }
        Ok(packet)
    }
}

// ── Field helpers ─────────────────────────────────────────────────────────────

/// Length prefix for a field: [`ABSENT`], or its length if it fits an `i32`.
fn prefix_len(field: &'static str, len: usize) -> Result<i32, WireError> {
    i32::try_from(len).map_err(|_| WireError::FieldTooLong { field, len })
}

fn nullable_prefix(field: &'static str, data: Option<&[u8]>) -> Result<i32, WireError> {
    data.map_or(Ok(ABSENT), |d| prefix_len(field, d.len()))
}

fn put_nullable<B: BufMut>(buf: &mut B, prefix: i32, field: Option<&[u8]>) {
    buf.put_i32_le(prefix);
    if let Some(data) = field {
        buf.put_slice(data);
    }
}

fn need(buf: &[u8], needed: usize) -> Result<(), WireError> {
    if buf.len() < needed {
        return Err(WireError::Truncated {
            needed,
            remaining: buf.len(),
        });
    }
    Ok(())
}

fn get_nullable(buf: &mut &[u8]) -> Result<Option<Bytes>, WireError> {
    need(buf, LEN_PREFIX)?;
    let len = buf.get_i32_le();
    if len == ABSENT {
        return Ok(None);
    }
    if len < 0 {
        return Err(WireError::InvalidLength(len));
    }
    let len = len as usize;
    need(buf, len)?;
    Ok(Some(buf.copy_to_bytes(len)))
}

fn get_string(buf: &mut &[u8], field: &'static str) -> Result<Option<String>, WireError> {
    get_nullable(buf)?
        .map(|b| String::from_utf8(b.to_vec()).map_err(|_| WireError::InvalidUtf8 { field }))
        .transpose()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
