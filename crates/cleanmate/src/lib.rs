//! Client for Cleanmate robot vacuums.
//!
//! Cleanmate vacuums accept JSON commands over a TCP socket on port 8888,
//! each wrapped in a 20-byte length-prefixed header.
//!
//! # Crate Structure
//!
//! - [`transport`]: Blocking TCP connection with exact-length reads
//! - [`frame`]: Header codec, request envelope, response decoding
//! - [`device`]: Command vocabulary and device state (behind `device` feature)

/// Re-export transport types.
pub mod transport {
    pub use cleanmate_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use cleanmate_frame::*;
}

/// Re-export device types (requires `device` feature).
#[cfg(feature = "device")]
pub mod device {
    pub use cleanmate_device::*;
}
