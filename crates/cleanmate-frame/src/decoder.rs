use serde_json::Value;
use tracing::trace;

use crate::codec::{parse_header, Packet};
use crate::error::{FrameError, Result};

/// Turns decoded response text into a structured value.
pub trait ValueParser {
    /// Parse `text`; must not fail, falling back to a string value.
    fn parse_value(&self, text: &str) -> Value;
}

impl<F> ValueParser for F
where
    F: Fn(&str) -> Value,
{
    fn parse_value(&self, text: &str) -> Value {
        self(text)
    }
}

/// Default parser: JSON when it parses, the raw text otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValueParser;

impl ValueParser for JsonValueParser {
    fn parse_value(&self, text: &str) -> Value {
        let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(text.to_string()))
    }
}

/// Parse response text with the default [`JsonValueParser`].
pub fn parse_value(text: &str) -> Value {
    JsonValueParser.parse_value(text)
}

/// Decodes response packets into structured values.
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder<P = JsonValueParser> {
    parser: P,
}

impl ResponseDecoder {
    /// Create a decoder using the default JSON parser.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ValueParser> ResponseDecoder<P> {
    /// Create a decoder with a custom value parser.
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Validate the header against the payload and parse the payload text.
    pub fn decode(&self, header: &[u8], payload: &[u8]) -> Result<Value> {
        let declared = parse_header(header)?;
        if declared != payload.len() {
            return Err(FrameError::MalformedHeader {
                reason: format!(
                    "header declares {declared} payload bytes, got {}",
                    payload.len()
                ),
            });
        }

        let text = std::str::from_utf8(payload)?;
        trace!(bytes = payload.len(), "decoded response payload");
        Ok(self.parser.parse_value(text))
    }

    /// Decode a packet previously read off the wire.
    pub fn decode_packet(&self, packet: &Packet) -> Result<Value> {
        self.decode(&packet.header, &packet.payload)
    }
}
