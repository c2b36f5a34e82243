use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::io::{read_at_least_from, read_exact_from, write_all_to, DEFAULT_READ_CHUNK_SIZE};
use crate::traits::Transport;

/// TCP port the device listens on.
pub const DEFAULT_PORT: u16 = 8888;

/// Configuration for a TCP connection.
///
/// Every timeout defaults to `None`, i.e. fully blocking.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Device port. Default: 8888.
    pub port: u16,
    /// Timeout for each connect attempt.
    pub connect_timeout: Option<Duration>,
    /// Read timeout applied to the stream after connecting.
    pub read_timeout: Option<Duration>,
    /// Write timeout applied to the stream after connecting.
    pub write_timeout: Option<Duration>,
    /// Maximum bytes requested per `read` call. Default: 128.
    pub read_chunk_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl ConnectionConfig {
    /// Apply the same timeout to connect, read and write.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self.write_timeout = timeout;
        self
    }
}

/// A blocking TCP connection to one device.
///
/// The stream exists only between [`connect`](Transport::connect) and
/// [`disconnect`](Transport::disconnect); I/O on a closed connection fails
/// with [`TransportError::NotConnected`].
#[derive(Debug)]
pub struct TcpConnection {
    host: String,
    config: ConnectionConfig,
    stream: Option<TcpStream>,
}

impl TcpConnection {
    /// Create a closed connection to `host` on the default port.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_config(host, ConnectionConfig::default())
    }

    /// Create a closed connection with explicit configuration.
    pub fn with_config(host: impl Into<String>, config: ConnectionConfig) -> Self {
        Self {
            host: host.into(),
            config,
            stream: None,
        }
    }

    /// Device host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Device port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Current configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Read chunks until at least `len` bytes are collected; may return more.
    pub fn receive_at_least(&mut self, len: usize) -> Result<Vec<u8>> {
        let chunk_size = self.config.read_chunk_size;
        let stream = self.stream_mut()?;
        read_at_least_from(stream, len, chunk_size)
    }

    fn stream_mut(&mut self) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or(TransportError::NotConnected)
    }

    fn open(&self) -> Result<TcpStream> {
        let addr = self.endpoint();
        let connect_err = |source| TransportError::Connect {
            addr: addr.clone(),
            source,
        };

        let stream = match self.config.connect_timeout {
            None => TcpStream::connect((self.host.as_str(), self.config.port)).map_err(connect_err)?,
            Some(timeout) => {
                let mut last_err = None;
                let mut connected = None;
                for candidate in (self.host.as_str(), self.config.port)
                    .to_socket_addrs()
                    .map_err(connect_err)?
                {
                    match TcpStream::connect_timeout(&candidate, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(err) => last_err = Some(err),
                    }
                }
                match connected {
                    Some(stream) => stream,
                    None => {
                        return Err(connect_err(last_err.unwrap_or_else(|| {
                            std::io::Error::new(
                                std::io::ErrorKind::NotFound,
                                "host resolved to no addresses",
                            )
                        })))
                    }
                }
            }
        };

        stream.set_read_timeout(self.config.read_timeout)?;
        stream.set_write_timeout(self.config.write_timeout)?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

impl Transport for TcpConnection {
    fn connect(&mut self) -> Result<()> {
        let stream = self.open()?;
        debug!(endpoint = %self.endpoint(), "connected to device");
        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!(endpoint = %self.endpoint(), "disconnected from device");
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream_mut()?;
        write_all_to(stream, bytes)
    }

    fn receive_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        let chunk_size = self.config.read_chunk_size;
        let stream = self.stream_mut()?;
        read_exact_from(stream, len, chunk_size)
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.config.port)
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
