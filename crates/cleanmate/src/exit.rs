use std::fmt;
use std::io;

use cleanmate_device::DeviceError;
use cleanmate_frame::FrameError;
use cleanmate_transport::TransportError;

// Exit codes follow sysexits-style conventions where one applies.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PROTOCOL_ERROR: i32 = 4;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => FAILURE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { addr, source } => {
            io_error(&format!("{context} ({addr})"), source)
        }
        TransportError::Io(source) => io_error(context, source),
        TransportError::ConnectionClosed { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        TransportError::NotConnected => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::MalformedHeader { .. } | FrameError::Decode(_) => {
            CliError::new(PROTOCOL_ERROR, format!("{context}: {err}"))
        }
        FrameError::PayloadTooLarge { .. } | FrameError::Json(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn device_error(context: &str, err: DeviceError) -> CliError {
    match err {
        DeviceError::Transport(err) => transport_error(context, err),
        DeviceError::Frame(err) => frame_error(context, err),
        DeviceError::UnexpectedResponse(_) => {
            CliError::new(PROTOCOL_ERROR, format!("{context}: {err}"))
        }
        DeviceError::InvalidCommand(_) | DeviceError::UnknownMode { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_connect_maps_to_failure() {
        let err = transport_error(
            "connect failed",
            TransportError::Connect {
                addr: "10.0.0.2:8888".to_string(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("10.0.0.2:8888"));
    }

    #[test]
    fn read_timeout_maps_to_timeout() {
        let err = device_error(
            "request failed",
            DeviceError::Frame(FrameError::Transport(TransportError::Io(io::Error::from(
                io::ErrorKind::WouldBlock,
            )))),
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn malformed_header_maps_to_protocol_error() {
        let err = frame_error(
            "request failed",
            FrameError::MalformedHeader {
                reason: "short".to_string(),
            },
        );
        assert_eq!(err.code, PROTOCOL_ERROR);
    }

    #[test]
    fn invalid_command_maps_to_usage() {
        let err = device_error(
            "request failed",
            DeviceError::InvalidCommand("no rooms".to_string()),
        );
        assert_eq!(err.code, USAGE);
    }
}
