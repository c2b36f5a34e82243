use std::fmt;

use serde::Serialize;

use crate::error::Result;

/// Protocol version carried in every request envelope.
pub const PROTOCOL_VERSION: &str = "1.0";

/// The JSON document wrapped by every request packet.
///
/// Serializes as `{"version":"1.0","control":{"authCode":…},"value":…}`
/// with keys in exactly that order and no whitespace.
#[derive(Serialize)]
pub struct RequestEnvelope<'a, V: ?Sized> {
    version: &'static str,
    control: Control<'a>,
    value: &'a V,
}

#[derive(Clone, Serialize)]
struct Control<'a> {
    #[serde(rename = "authCode")]
    auth_code: &'a str,
}

impl<'a, V: Serialize + ?Sized> RequestEnvelope<'a, V> {
    /// Wrap a command value with the device credential.
    pub fn new(value: &'a V, auth_code: &'a str) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            control: Control { auth_code },
            value,
        }
    }

    /// Compact UTF-8 JSON bytes; their length is what the size field counts.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<V: ?Sized> fmt::Debug for RequestEnvelope<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEnvelope")
            .field("version", &self.version)
            .field(
                "auth_code",
                &format_args!("<redacted:{} bytes>", self.control.auth_code.len()),
            )
            .finish_non_exhaustive()
    }
}

/// Build the serialized request payload for `value`.
pub fn build<V: Serialize + ?Sized>(value: &V, auth_code: &str) -> Result<Vec<u8>> {
    RequestEnvelope::new(value, auth_code).to_bytes()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn poll_state_envelope_is_byte_exact() {
        let value = json!({"state": "", "transitCmd": "98"});
        let bytes = build(&value, "AUTH123").unwrap();
        assert_eq!(
            bytes,
            br#"{"version":"1.0","control":{"authCode":"AUTH123"},"value":{"state":"","transitCmd":"98"}}"#
        );
    }

    #[test]
    fn envelope_accepts_serializable_structs() {
        #[derive(Serialize)]
        struct Find<'a> {
            find: &'a str,
            #[serde(rename = "transitCmd")]
            transit_cmd: &'a str,
        }

        let bytes = build(
            &Find {
                find: "",
                transit_cmd: "143",
            },
            "k",
        )
        .unwrap();
        assert_eq!(
            bytes,
            br#"{"version":"1.0","control":{"authCode":"k"},"value":{"find":"","transitCmd":"143"}}"#
        );
    }

    #[test]
    fn non_ascii_payload_is_counted_in_bytes() {
        let value = json!({"name": "Kök"});
        let bytes = build(&value, "å").unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(bytes.len() > text.chars().count());
        assert_eq!(bytes.len(), text.len());
    }

    #[test]
    fn debug_redacts_auth_code() {
        let value = json!({});
        let envelope = RequestEnvelope::new(&value, "SECRET");
        let rendered = format!("{envelope:?}");
        assert!(!rendered.contains("SECRET"));
        assert!(rendered.contains("<redacted:6 bytes>"));
    }
}
