use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{DeviceError, Result};
use crate::modes::{MopMode, WorkMode, WorkState};

/// Last known status of one vacuum.
///
/// Fields stay `None` until a status document has reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub battery_level: Option<u32>,
    pub version: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub work_state: Option<WorkState>,
    pub mop_mode: Option<MopMode>,
    pub volume: Option<String>,
}

impl DeviceState {
    /// Fold a status response (`{"value": {...}}`) into this state.
    ///
    /// Keys absent from the update keep their previous value. Codes that do
    /// not map to a known mode clear the field.
    pub fn apply_state(&mut self, update: &Value) -> Result<()> {
        let fields = update
            .get("value")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                DeviceError::UnexpectedResponse(format!(
                    "status response has no \"value\" object: {}",
                    truncate(&update.to_string())
                ))
            })?;

        if let Some(raw) = fields.get("battery") {
            self.battery_level = integer(raw).and_then(|n| u32::try_from(n).ok());
        }
        if let Some(raw) = fields.get("version") {
            self.version = text(raw);
        }
        if let Some(raw) = fields.get("volume") {
            self.volume = text(raw);
        }
        self.work_mode = mode_field(fields, "workMode", self.work_mode);
        self.work_state = mode_field(fields, "workState", self.work_state);
        self.mop_mode = mode_field(fields, "waterTank", self.mop_mode);

        Ok(())
    }
}

fn mode_field<M>(fields: &Map<String, Value>, key: &str, current: Option<M>) -> Option<M>
where
    M: TryFrom<i64, Error = DeviceError>,
{
    let raw = match fields.get(key) {
        Some(raw) => raw,
        None => return current,
    };
    let code = integer(raw)?;
    match M::try_from(code) {
        Ok(mode) => Some(mode),
        Err(err) => {
            warn!(key, code, error = %err, "ignoring unknown status code");
            None
        }
    }
}

/// Accept integers sent either as JSON numbers or numeric strings.
fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 120;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
