//! Packet framing and JSON envelope codec for the Cleanmate protocol.
//!
//! Every packet on the wire is a fixed 20-byte header followed by a UTF-8
//! JSON payload:
//! - A 4-byte little-endian size field holding the *total* packet length
//! - A 16-byte protocol constant
//!
//! Requests wrap the command in an envelope carrying the protocol version
//! and the device auth code. Responses are decoded back into a
//! [`serde_json::Value`].

pub mod codec;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    build_packet, decode_packet, decode_size_prefix, encode_size_prefix, parse_header,
    size_prefix_bytes, FrameConfig, Packet, DEFAULT_MAX_PAYLOAD, HEADER_SIZE, HEADER_TAIL,
};
pub use decoder::{parse_value, JsonValueParser, ResponseDecoder, ValueParser};
pub use envelope::{build, RequestEnvelope, PROTOCOL_VERSION};
pub use error::{FrameError, Result};
pub use reader::{read_packet, read_response};
pub use writer::{send_request, write_packet};
