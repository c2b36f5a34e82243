use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};

/// Upper bound on a single `read` call while collecting a response.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 128;

/// Write the whole buffer, looping over partial writes.
///
/// A zero-length write means the peer is gone and is reported as
/// [`TransportError::ConnectionClosed`].
pub fn write_all_to<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match writer.write(&buf[offset..]) {
            Ok(0) => {
                return Err(TransportError::ConnectionClosed {
                    expected: buf.len(),
                    transferred: offset,
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}

/// Read exactly `len` bytes, at most `chunk_size` per `read` call.
///
/// Never consumes bytes beyond `len`, so whatever follows on the stream is
/// left for the next caller. EOF before `len` bytes is an error, never a
/// short buffer.
pub fn read_exact_from<R: Read + ?Sized>(
    reader: &mut R,
    len: usize,
    chunk_size: usize,
) -> Result<Vec<u8>> {
    let chunk_size = chunk_size.max(1);
    let mut buf = Vec::with_capacity(len);
    let mut chunk = vec![0u8; chunk_size.min(len)];

    while buf.len() < len {
        let want = (len - buf.len()).min(chunk_size);
        let read = match reader.read(&mut chunk[..want]) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        };

        if read == 0 {
            return Err(TransportError::ConnectionClosed {
                expected: len,
                transferred: buf.len(),
            });
        }

        buf.extend_from_slice(&chunk[..read]);
    }

    Ok(buf)
}

/// Read whole chunks until at least `len` bytes have been collected.
///
/// Unlike [`read_exact_from`] the result may overshoot `len` by up to one
/// chunk. Only safe when nothing else is expected on the stream.
pub fn read_at_least_from<R: Read + ?Sized>(
    reader: &mut R,
    len: usize,
    chunk_size: usize,
) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    let mut chunk = vec![0u8; chunk_size.max(1)];

    while buf.len() < len {
        let read = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        };

        if read == 0 {
            return Err(TransportError::ConnectionClosed {
                expected: len,
                transferred: buf.len(),
            });
        }

        buf.extend_from_slice(&chunk[..read]);
    }

    Ok(buf)
}
