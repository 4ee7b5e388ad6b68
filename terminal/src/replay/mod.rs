pub mod reader;
pub mod writer;

use common::{EntitySnapshot, Position};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

pub use reader::ReplayReader;
pub use writer::write_replay;

/// Team record in the metadata line of a replay file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub index: u32,
    pub name: String,
    pub ui_color: String,
    pub score: i64,
}

/// Player record in the metadata line, tagged with its team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub team_index: u32,
    pub name: String,
    pub position: Position,
}

/// First line of a `.replay` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayMetadata {
    pub game_id: u32,
    pub description: String,
    pub game_length_ms: u64,
    pub recorded_at: SystemTime,
    pub teams: Vec<TeamRecord>,
    pub players: Vec<PlayerRecord>,
}

/// One snapshot line in the data stream that follows the metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedSnapshot {
    pub player_id: u32,
    pub snapshot: EntitySnapshot,
}
