//! Blocking TCP transport for the Cleanmate control protocol.
//!
//! This is the lowest layer of the workspace: it owns the socket and knows
//! how to push a whole buffer out and pull an exact number of bytes back in,
//! regardless of how the network fragments them. Everything else builds on
//! the [`Transport`] trait provided here.

pub mod error;
pub mod io;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use io::{read_at_least_from, read_exact_from, write_all_to, DEFAULT_READ_CHUNK_SIZE};
pub use tcp::{ConnectionConfig, TcpConnection, DEFAULT_PORT};
pub use traits::Transport;
