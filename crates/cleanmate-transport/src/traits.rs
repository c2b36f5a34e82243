use crate::error::Result;

/// A byte pipe to a single device.
///
/// One request/response exchange occupies the transport from send to the
/// matching receive; the protocol has no request identifiers, so callers
/// sharing a transport must serialize access themselves.
pub trait Transport {
    /// Open the underlying stream. Reconnecting an open transport replaces
    /// the previous stream.
    fn connect(&mut self) -> Result<()>;

    /// Close the stream if open. Idempotent.
    fn disconnect(&mut self);

    /// Whether a stream is currently open.
    fn is_connected(&self) -> bool;

    /// Write the whole buffer or fail.
    fn send_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `len` bytes or fail.
    fn receive_exact(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Human-readable peer description for diagnostics.
    fn endpoint(&self) -> String;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).send_all(bytes)
    }

    fn receive_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).receive_exact(len)
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}
