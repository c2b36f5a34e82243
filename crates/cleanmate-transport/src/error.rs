/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open a stream to the device.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// An operation needed an open stream but the connection is closed.
    #[error("not connected")]
    NotConnected,

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream before the expected bytes arrived.
    #[error("connection closed after {transferred} of {expected} bytes")]
    ConnectionClosed { expected: usize, transferred: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
