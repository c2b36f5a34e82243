use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use cleanmate_device::DeviceState;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One finished exchange with a device.
pub struct Report<'a> {
    pub command: &'a str,
    pub endpoint: &'a str,
    pub state: Option<&'a DeviceState>,
    pub response: Option<&'a Value>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    command: &'a str,
    endpoint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a DeviceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a Value>,
    timestamp: String,
}

pub fn print_report(report: &Report<'_>, format: OutputFormat) {
    println!("{}", render_report(report, format));
}

pub fn render_report(report: &Report<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let out = ReportOutput {
                command: report.command,
                endpoint: report.endpoint,
                state: report.state,
                response: report.response,
                timestamp: now_unix_seconds(),
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in fields(report) {
                table.add_row(vec![field.to_string(), value]);
            }
            table.to_string()
        }
        OutputFormat::Pretty => fields(report)
            .into_iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect::<Vec<_>>()
            .join(" "),
        OutputFormat::Raw => report
            .response
            .map(Value::to_string)
            .unwrap_or_default(),
    }
}

fn fields(report: &Report<'_>) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("command", report.command.to_string()),
        ("endpoint", report.endpoint.to_string()),
    ];

    match report.state {
        Some(state) => {
            rows.push(("battery", display(state.battery_level.map(|b| format!("{b}%")))));
            rows.push(("version", display(state.version.clone())));
            rows.push(("work_mode", display(state.work_mode.map(|m| m.to_string()))));
            rows.push(("work_state", display(state.work_state.map(|s| s.to_string()))));
            rows.push(("mop_mode", display(state.mop_mode.map(|m| m.to_string()))));
            rows.push(("volume", display(state.volume.clone())));
        }
        None => {
            if let Some(response) = report.response {
                rows.push(("response", response.to_string()));
            }
        }
    }

    rows
}

fn display(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
