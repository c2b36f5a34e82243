use std::fmt;

use cleanmate_frame::{read_response, send_request, FrameConfig, ResponseDecoder};
use cleanmate_transport::{ConnectionConfig, TcpConnection, Transport};
use serde_json::Value;
use tracing::debug;

use crate::command::Command;
use crate::error::Result;
use crate::modes::{MopMode, WorkMode};
use crate::state::DeviceState;

/// A Cleanmate vacuum reached through a [`Transport`].
///
/// All I/O goes through `&mut self`; one command occupies the transport from
/// request to response. Reconnecting after a failure is up to the caller.
pub struct Device<T> {
    transport: T,
    auth_code: String,
    frame_config: FrameConfig,
    decoder: ResponseDecoder,
    state: DeviceState,
}

impl Device<TcpConnection> {
    /// A device reached over TCP at `host`. Not connected yet.
    pub fn tcp(host: impl Into<String>, auth_code: impl Into<String>, config: ConnectionConfig) -> Self {
        Self::new(TcpConnection::with_config(host, config), auth_code)
    }
}

impl<T: Transport> Device<T> {
    /// Wrap a transport with the device credential.
    pub fn new(transport: T, auth_code: impl Into<String>) -> Self {
        Self {
            transport,
            auth_code: auth_code.into(),
            frame_config: FrameConfig::default(),
            decoder: ResponseDecoder::new(),
            state: DeviceState::default(),
        }
    }

    /// Override inbound packet limits.
    pub fn with_frame_config(mut self, frame_config: FrameConfig) -> Self {
        self.frame_config = frame_config;
        self
    }

    /// Open the transport.
    pub fn connect(&mut self) -> Result<()> {
        self.transport.connect()?;
        Ok(())
    }

    /// Close the transport. Idempotent.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
    }

    /// Whether the transport is open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Send an arbitrary `value` and wait for the response.
    pub fn request_value(&mut self, value: &Value) -> Result<Value> {
        send_request(&mut self.transport, value, &self.auth_code)?;
        Ok(read_response(
            &mut self.transport,
            &self.frame_config,
            &self.decoder,
        )?)
    }

    /// Send an arbitrary `value` without reading a response.
    pub fn send_value(&mut self, value: &Value) -> Result<()> {
        send_request(&mut self.transport, value, &self.auth_code)?;
        Ok(())
    }

    /// Send `command` and return the decoded response without touching state.
    pub fn request(&mut self, command: &Command) -> Result<Value> {
        let value = command.to_value()?;
        debug!(command = command.name(), "sending command");
        self.request_value(&value)
    }

    /// Send `command` without waiting for the response.
    ///
    /// The unread response stays on the stream; the next exchange will
    /// pick it up instead of its own, so reconnect before reusing.
    pub fn send_only(&mut self, command: &Command) -> Result<()> {
        let value = command.to_value()?;
        debug!(command = command.name(), "sending command without reply");
        self.send_value(&value)
    }

    /// Send `command`, then fold the response into the device state when
    /// the command returns a status document.
    pub fn execute(&mut self, command: &Command) -> Result<Value> {
        let response = self.request(command)?;
        if command.returns_state() {
            self.state.apply_state(&response)?;
        }
        Ok(response)
    }

    /// Fetch and apply the current status.
    pub fn poll_state(&mut self) -> Result<Value> {
        self.execute(&Command::PollState)
    }

    /// Fetch the cleaning map.
    pub fn poll_map(&mut self) -> Result<Value> {
        self.execute(&Command::PollMap)
    }

    /// Start cleaning, optionally in a specific work mode.
    pub fn start(&mut self, work_mode: Option<WorkMode>) -> Result<Value> {
        self.execute(&Command::Start(work_mode))
    }

    pub fn pause(&mut self) -> Result<Value> {
        self.execute(&Command::Pause)
    }

    /// Send the vacuum back to its dock.
    pub fn charge(&mut self) -> Result<Value> {
        self.execute(&Command::Charge)
    }

    pub fn set_mop_mode(&mut self, mop_mode: MopMode) -> Result<Value> {
        self.execute(&Command::SetMopMode(mop_mode))
    }

    /// Set volume as a percentage, 0-100.
    pub fn set_volume(&mut self, percent: u8) -> Result<Value> {
        self.execute(&Command::SetVolume(percent))
    }

    /// Clean the given rooms; duplicates are dropped.
    pub fn clean_rooms(&mut self, room_ids: &[u32]) -> Result<Value> {
        self.execute(&Command::CleanRooms(room_ids.to_vec()))
    }

    /// Make the vacuum announce its location.
    pub fn find(&mut self) -> Result<Value> {
        self.execute(&Command::Find)
    }

    /// Fold an externally obtained status document into the state.
    pub fn apply_state(&mut self, update: &Value) -> Result<()> {
        self.state.apply_state(update)
    }

    /// Last known state.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the device and return the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T: Transport> fmt::Display for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cleanmate {}", self.transport.endpoint())
    }
}

impl<T: Transport> fmt::Debug for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("endpoint", &self.transport.endpoint())
            .field(
                "auth_code",
                &format_args!("<redacted:{} bytes>", self.auth_code.len()),
            )
            .field("state", &self.state)
            .finish()
    }
}
