use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::WorldConfig;

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Longest player name kept by the server, in characters.
pub const MAX_NAME_CHARS: usize = 15;

// === Server -> Client ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "welcome")]
    Welcome(WelcomeMsg),
    #[serde(rename = "updatePlayers")]
    UpdatePlayers(UpdatePlayersMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMsg {
    pub protocol_version: u32,
    pub self_id: u32,
    pub world: WorldConfig,
}

/// Full registry state for one tick, keyed by connection id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdatePlayersMsg {
    pub players: BTreeMap<u32, PlayerWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerWire {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// `#RRGGBB`
    pub color: String,
    pub name: String,
}

// === Client -> Server ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "register")]
    Register { name: String },
    #[serde(rename = "move")]
    Move { direction: Direction },
}

/// Movement intent. Starting a direction sets one velocity component,
/// stopping zeroes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    StopUp,
    StopDown,
    StopLeft,
    StopRight,
}

// === Conversion helpers ===

/// Format a 24-bit RGB value as `#RRGGBB`.
pub fn color_hex(color: u32) -> String {
    format!("#{:06X}", color & 0xFF_FFFF)
}
