use cleanmate_device::{Command as DeviceCommand, Device};
use cleanmate_transport::Transport;

use crate::cmd::ConnArgs;
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

pub fn run(
    conn: &ConnArgs,
    command: DeviceCommand,
    label: &str,
    format: OutputFormat,
) -> CliResult<i32> {
    let mut device = Device::tcp(&conn.host, &conn.auth_code, conn.connection_config()?);
    device
        .connect()
        .map_err(|err| device_error("connect failed", err))?;

    let response = device
        .execute(&command)
        .map_err(|err| device_error(&format!("{label} failed"), err))?;
    let endpoint = device.transport().endpoint();
    tracing::info!(command = command.name(), %endpoint, "command completed");

    let state = command.returns_state().then_some(device.state());
    print_report(
        &Report {
            command: label,
            endpoint: &endpoint,
            state,
            response: Some(&response),
        },
        format,
    );

    device.disconnect();
    Ok(SUCCESS)
}
