use std::fmt::Write as _;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::error::{FrameError, Result};

/// Packet header: size (4) + protocol constant (16) = 20 bytes.
pub const HEADER_SIZE: usize = 20;

/// Fixed bytes following the size field in every request header.
pub const HEADER_TAIL: [u8; 16] = [
    0xfa, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0xc5, 0x27, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
];

/// Default maximum inbound payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

const SIZE_FIELD_LEN: usize = 4;

/// A complete packet: header plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// The raw 20-byte header as received or built.
    pub header: [u8; HEADER_SIZE],
    /// The packet payload (normally UTF-8 JSON).
    pub payload: Bytes,
}

impl Packet {
    /// Build a request packet around `payload`.
    pub fn new(payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        let size = total_size(payload.len())?;

        let mut header = [0u8; HEADER_SIZE];
        header[..SIZE_FIELD_LEN].copy_from_slice(&size_prefix_bytes(size));
        header[SIZE_FIELD_LEN..].copy_from_slice(&HEADER_TAIL);

        Ok(Self { header, payload })
    }

    /// The size field carried in the header.
    pub fn size_field(&self) -> u32 {
        u32::from_le_bytes([self.header[0], self.header[1], self.header[2], self.header[3]])
    }

    /// The total wire size of this packet (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Serialize header and payload into a contiguous buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        buf.put_slice(&self.header);
        buf.put_slice(&self.payload);
        buf.freeze()
    }
}

/// Render the size field as the 8 hex characters seen on the wire.
///
/// This is the big-endian hex rendering with its byte pairs reversed, which
/// is the same thing as the little-endian bytes in hex:
/// `0x0000_1234` becomes `"34120000"`.
pub fn encode_size_prefix(size: u32) -> String {
    let mut out = String::with_capacity(SIZE_FIELD_LEN * 2);
    for byte in size_prefix_bytes(size) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// The size field as raw wire bytes.
pub fn size_prefix_bytes(size: u32) -> [u8; 4] {
    size.to_le_bytes()
}

/// Read the size field from the first 4 bytes of a header.
///
/// Always a fixed offset; the value may legitimately contain zero bytes.
pub fn decode_size_prefix(header: &[u8]) -> Result<u32> {
    let field: [u8; SIZE_FIELD_LEN] = header
        .get(..SIZE_FIELD_LEN)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            FrameError::malformed(format!(
                "need {SIZE_FIELD_LEN} bytes for the size field, got {}",
                header.len()
            ))
        })?;
    Ok(u32::from_le_bytes(field))
}

/// Encode a request packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────────────┬──────────────────┐
/// │ Size (4B LE) │ Protocol constant (16B)  │ Payload          │
/// │ total length │ fa000000 01000000        │ (Size - 20 bytes)│
/// │ incl. header │ c5270000 01000000        │                  │
/// └──────────────┴──────────────────────────┴──────────────────┘
/// ```
pub fn build_packet(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let size = total_size(payload.len())?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32_le(size);
    dst.put_slice(&HEADER_TAIL);
    dst.put_slice(payload);
    Ok(())
}

/// Validate a header and return the length of the payload that follows it.
pub fn parse_header(header: &[u8]) -> Result<usize> {
    if header.len() != HEADER_SIZE {
        return Err(FrameError::malformed(format!(
            "expected {HEADER_SIZE} header bytes, got {}",
            header.len()
        )));
    }

    let size = decode_size_prefix(header)? as usize;
    if size < HEADER_SIZE {
        return Err(FrameError::malformed(format!(
            "size field {size} is smaller than the {HEADER_SIZE}-byte header"
        )));
    }

    if header[SIZE_FIELD_LEN..] != HEADER_TAIL {
        debug!(tail = %hex(&header[SIZE_FIELD_LEN..]), "response header tail differs from request constant");
    }

    Ok(size - HEADER_SIZE)
}

/// Decode one packet from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete packet yet.
/// On success, consumes the packet bytes from the buffer.
pub fn decode_packet(src: &mut BytesMut, max_payload: usize) -> Result<Option<Packet>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let payload_len = parse_header(&src[..HEADER_SIZE])?;
    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    if src.len() < HEADER_SIZE + payload_len {
        return Ok(None);
    }

    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(&src[..HEADER_SIZE]);
    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Packet { header, payload }))
}

/// Configuration for inbound packet handling.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

fn total_size(payload_len: usize) -> Result<u32> {
    let max = u32::MAX as usize - HEADER_SIZE;
    if payload_len > max {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max,
        });
    }
    Ok((payload_len + HEADER_SIZE) as u32)
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
