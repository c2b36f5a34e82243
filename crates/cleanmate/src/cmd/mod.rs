use std::time::Duration;

use clap::{Args, Subcommand};
use cleanmate_device::{Command as DeviceCommand, MopMode, WorkMode};
use cleanmate_transport::{ConnectionConfig, DEFAULT_PORT};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod device;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll and print the vacuum status.
    Status(ConnArgs),
    /// Fetch the cleaning map.
    Map(ConnArgs),
    /// Start cleaning.
    Start(StartArgs),
    /// Pause cleaning.
    Pause(ConnArgs),
    /// Return to the charging dock.
    Charge(ConnArgs),
    /// Play a sound to locate the vacuum.
    Find(ConnArgs),
    /// Set mop water flow.
    Mop(MopArgs),
    /// Set speaker volume.
    Volume(VolumeArgs),
    /// Clean specific rooms.
    Rooms(RoomsArgs),
    /// Send a raw command value.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Status(conn) => device::run(&conn, DeviceCommand::PollState, "status", format),
        Command::Map(conn) => device::run(&conn, DeviceCommand::PollMap, "map", format),
        Command::Start(args) => {
            device::run(&args.conn, DeviceCommand::Start(args.mode), "start", format)
        }
        Command::Pause(conn) => device::run(&conn, DeviceCommand::Pause, "pause", format),
        Command::Charge(conn) => device::run(&conn, DeviceCommand::Charge, "charge", format),
        Command::Find(conn) => device::run(&conn, DeviceCommand::Find, "find", format),
        Command::Mop(args) => device::run(
            &args.conn,
            DeviceCommand::SetMopMode(args.mode),
            "mop",
            format,
        ),
        Command::Volume(args) => device::run(
            &args.conn,
            DeviceCommand::SetVolume(args.percent),
            "volume",
            format,
        ),
        Command::Rooms(args) => device::run(
            &args.conn,
            DeviceCommand::CleanRooms(args.ids),
            "rooms",
            format,
        ),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Arguments shared by every command that talks to a device.
#[derive(Args, Debug)]
pub struct ConnArgs {
    /// Device host name or IP address.
    pub host: String,
    /// Device auth code.
    #[arg(long, env = "CLEANMATE_AUTH_CODE", hide_env_values = true)]
    pub auth_code: String,
    /// Device TCP port.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Connect/read/write timeout (e.g. 5s, 500ms). Default: wait forever.
    #[arg(long)]
    pub timeout: Option<String>,
}

impl ConnArgs {
    pub fn connection_config(&self) -> CliResult<ConnectionConfig> {
        let timeout = self.timeout.as_deref().map(parse_duration).transpose()?;
        Ok(ConnectionConfig {
            port: self.port,
            ..ConnectionConfig::default()
        }
        .with_timeout(timeout))
    }
}

#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Work mode: standard, intensive or silent. Default: resume current mode.
    #[arg(long)]
    pub mode: Option<WorkMode>,
}

#[derive(Args, Debug)]
pub struct MopArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Mop mode: high, medium or low.
    pub mode: MopMode,
}

#[derive(Args, Debug)]
pub struct VolumeArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Volume percentage, 0-100.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percent: u8,
}

#[derive(Args, Debug)]
pub struct RoomsArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Room (block) ids to clean.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Command value as JSON, e.g. '{"find":"","transitCmd":"143"}'.
    #[arg(long)]
    pub json: String,
    /// Do not wait for a response.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn connection_config_applies_timeout_everywhere() {
        let conn = ConnArgs {
            host: "h".to_string(),
            auth_code: "x".to_string(),
            port: 9001,
            timeout: Some("750ms".to_string()),
        };
        let config = conn.connection_config().unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(750)));
        assert_eq!(config.read_timeout, Some(Duration::from_millis(750)));
        assert_eq!(config.write_timeout, Some(Duration::from_millis(750)));
    }

    #[test]
    fn connection_config_defaults_to_blocking() {
        let conn = ConnArgs {
            host: "h".to_string(),
            auth_code: "x".to_string(),
            port: DEFAULT_PORT,
            timeout: None,
        };
        let config = conn.connection_config().unwrap();
        assert!(config.read_timeout.is_none());
    }
}
