//! Cleanmate vacuum commands and state.
//!
//! A [`Device`] owns a [`Transport`](cleanmate_transport::Transport) rather
//! than being one, so command logic can be exercised against any byte pipe.
//! Each command is a single request/response exchange; responses that
//! carry status fields are folded into the device's [`DeviceState`].

pub mod command;
pub mod device;
pub mod error;
pub mod modes;
pub mod state;

pub use command::Command;
pub use device::Device;
pub use error::{DeviceError, Result};
pub use modes::{MopMode, WorkMode, WorkState};
pub use state::DeviceState;
