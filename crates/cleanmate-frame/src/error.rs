/// Errors that can occur during packet encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Transport-level error while sending or receiving packet bytes.
    #[error(transparent)]
    Transport(#[from] cleanmate_transport::TransportError),

    /// The header does not describe a valid packet.
    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    /// The payload exceeds the configured or encodable maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The response payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// The request envelope could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
