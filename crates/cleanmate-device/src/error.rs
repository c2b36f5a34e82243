/// Errors that can occur in device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] cleanmate_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] cleanmate_frame::FrameError),

    /// The device answered with something other than a status document.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The command arguments cannot be encoded.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A name did not match any known mode.
    #[error("unknown {kind}: {value}")]
    UnknownMode { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
