use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::error::{DeviceError, Result};
use crate::modes::{MopMode, WorkMode};

/// `transitCmd` identifiers understood by the device.
pub mod transit {
    pub const POLL_STATE: &str = "98";
    pub const START: &str = "100";
    pub const PAUSE: &str = "102";
    pub const CHARGE: &str = "104";
    pub const START_MODE: &str = "106";
    pub const VOLUME: &str = "123";
    pub const POLL_MAP: &str = "133";
    pub const FIND: &str = "143";
    pub const MOP_MODE: &str = "145";
}

/// A device command, rendered into the envelope's `value` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request the current status document.
    PollState,
    /// Request the cleaning map.
    PollMap,
    /// Start cleaning, optionally switching work mode.
    Start(Option<WorkMode>),
    Pause,
    /// Return to the charging dock.
    Charge,
    SetMopMode(MopMode),
    /// Set speaker volume as a percentage (clamped to 0..=100).
    SetVolume(u8),
    /// Clean the given room (block) ids.
    CleanRooms(Vec<u32>),
    /// Play a sound so the vacuum can be located.
    Find,
}

impl Command {
    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PollState => "poll_state",
            Command::PollMap => "poll_map",
            Command::Start(_) => "start",
            Command::Pause => "pause",
            Command::Charge => "charge",
            Command::SetMopMode(_) => "set_mop_mode",
            Command::SetVolume(_) => "set_volume",
            Command::CleanRooms(_) => "clean_rooms",
            Command::Find => "find",
        }
    }

    /// Whether the response to this command is a status document.
    pub fn returns_state(&self) -> bool {
        !matches!(self, Command::PollMap)
    }

    /// Build the `value` JSON for this command.
    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            Command::PollState => json!({
                "state": "",
                "transitCmd": transit::POLL_STATE,
            }),
            Command::PollMap => json!({
                "mapWidth": "0",
                "centerPoint": "0",
                "mapHeight": "0",
                "trackNum": "AAA=",
                "mapSign": "AAA=",
                "transitCmd": transit::POLL_MAP,
            }),
            Command::Start(None) => json!({
                "start": "1",
                "transitCmd": transit::START,
            }),
            Command::Start(Some(mode)) => json!({
                "mode": mode.code().to_string(),
                "transitCmd": transit::START_MODE,
            }),
            Command::Pause => json!({
                "pause": "1",
                "isStop": "0",
                "transitCmd": transit::PAUSE,
            }),
            Command::Charge => json!({
                "charge": "1",
                "transitCmd": transit::CHARGE,
            }),
            Command::SetMopMode(mode) => json!({
                "waterTank": mode.code().to_string(),
                "transitCmd": transit::MOP_MODE,
            }),
            Command::SetVolume(percent) => json!({
                "volume": volume_level(*percent),
                "voice": "",
                "transitCmd": transit::VOLUME,
            }),
            Command::CleanRooms(ids) => {
                let unique: BTreeSet<u32> = ids.iter().copied().collect();
                if unique.is_empty() {
                    return Err(DeviceError::InvalidCommand(
                        "clean_rooms needs at least one room id".to_string(),
                    ));
                }
                let blocks: Vec<Value> = unique
                    .into_iter()
                    .map(|id| json!({"cleanNum": "1", "blockNum": id.to_string()}))
                    .collect();
                json!({
                    "opCmd": "cleanBlocks",
                    "cleanBlocks": blocks,
                })
            }
            Command::Find => json!({
                "find": "",
                "transitCmd": transit::FIND,
            }),
        };
        Ok(value)
    }
}

/// Map a 0-100 percentage onto the device's 1.0-2.0 volume scale.
///
/// Tenths are rounded half-to-even.
pub fn volume_level(percent: u8) -> String {
    let percent = f64::from(percent.min(100));
    let tenths = (percent / 100.0 * 10.0).round_ties_even();
    format!("{:.1}", 1.0 + tenths / 10.0)
}
