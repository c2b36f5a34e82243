use cleanmate_device::Device;
use cleanmate_transport::Transport;
use serde_json::Value;

use crate::cmd::SendArgs;
use crate::exit::{device_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_report, OutputFormat, Report};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let value = parse_value_arg(&args.json)?;

    let mut device = Device::tcp(
        &args.conn.host,
        &args.conn.auth_code,
        args.conn.connection_config()?,
    );
    device
        .connect()
        .map_err(|err| device_error("connect failed", err))?;

    let response = if args.no_wait {
        device
            .send_value(&value)
            .map_err(|err| device_error("send failed", err))?;
        None
    } else {
        Some(
            device
                .request_value(&value)
                .map_err(|err| device_error("request failed", err))?,
        )
    };

    let endpoint = device.transport().endpoint();
    print_report(
        &Report {
            command: "send",
            endpoint: &endpoint,
            state: None,
            response: response.as_ref(),
        },
        format,
    );

    device.disconnect();
    Ok(SUCCESS)
}

fn parse_value_arg(json: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(json)
        .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
    if !value.is_object() {
        return Err(CliError::new(USAGE, "--json must be a JSON object"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_objects_only() {
        assert!(parse_value_arg(r#"{"find":"","transitCmd":"143"}"#).is_ok());
        assert_eq!(parse_value_arg("[1]").unwrap_err().code, USAGE);
        assert_eq!(parse_value_arg("{nope").unwrap_err().code, USAGE);
    }
}
