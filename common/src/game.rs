use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GAME_LENGTH_MS;

/// Player positions as scored by the center software
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Position {
    Commander,
    #[serde(rename = "Heavy Weapons")]
    HeavyWeapons,
    Scout,
    #[serde(rename = "Ammo Carrier")]
    AmmoCarrier,
    Medic,
}

impl Position {
    /// Short tag used in compact displays
    pub fn tag(&self) -> &'static str {
        match self {
            Position::Commander => "CMD",
            Position::HeavyWeapons => "HVY",
            Position::Scout => "SCT",
            Position::AmmoCarrier => "AMO",
            Position::Medic => "MED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Commander => "Commander",
            Position::HeavyWeapons => "Heavy Weapons",
            Position::Scout => "Scout",
            Position::AmmoCarrier => "Ammo Carrier",
            Position::Medic => "Medic",
        }
    }
}

/// Why a player was last deactivated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeacType {
    Opponent,
    Team,
    Resupply,
    Nuke,
    Penalty,
}

/// One timestamped record of a player's cumulative stats.
///
/// `state_time` is milliseconds since game start and is non-decreasing
/// within a player's snapshot sequence. Counters are cumulative as of
/// that time. Snapshots are immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntitySnapshot {
    pub state_time: u64,
    pub is_active: bool,
    pub is_eliminated: bool,
    pub last_deac_type: Option<DeacType>,
    pub score: i64,
    pub lives: u32,
    pub shots: u32,
    pub accuracy: f64,
    pub hit_diff: f64,
    pub assists: u32,
    pub medic_hits: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub shot_opponent: u32,
    pub deac_opponent: u32,
    pub self_hit: u32,
    pub self_deac: u32,
    pub sp_earned: u32,
    pub sp_spent: u32,
    pub resupply_shots: u32,
    pub resupply_lives: u32,
    pub penalties: u32,
}

impl EntitySnapshot {
    /// Net special points available to spend
    pub fn sp_available(&self) -> i64 {
        self.sp_earned as i64 - self.sp_spent as i64
    }
}

/// A scoring entity: stable id plus descriptive metadata and the ordered
/// snapshot sequence recorded for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GamePlayer {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub snapshots: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameTeam {
    pub index: u32,
    pub name: String,
    /// Color keyword used by display layers ("red", "green", ...)
    pub ui_color: String,
    pub score: i64,
    pub players: Vec<GamePlayer>,
}

/// The full dataset for one game: teams owning players owning snapshots.
/// Loaded once from an external source and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameReplay {
    pub game_id: u32,
    pub description: String,
    pub game_length_ms: u64,
    pub teams: Vec<GameTeam>,
}

impl GameReplay {
    pub fn new(game_id: u32, description: String) -> Self {
        GameReplay {
            game_id,
            description,
            game_length_ms: DEFAULT_GAME_LENGTH_MS,
            teams: Vec::new(),
        }
    }

    /// Iterate every player across all teams, paired with its team
    pub fn players(&self) -> impl Iterator<Item = (&GameTeam, &GamePlayer)> {
        self.teams
            .iter()
            .flat_map(|team| team.players.iter().map(move |player| (team, player)))
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(|t| t.players.len()).sum()
    }

    pub fn snapshot_count(&self) -> usize {
        self.teams
            .iter()
            .flat_map(|t| t.players.iter())
            .map(|p| p.snapshots.len())
            .sum()
    }

    /// Latest `state_time` recorded for any player, if any data is loaded
    pub fn latest_state_time(&self) -> Option<u64> {
        self.players()
            .flat_map(|(_, player)| player.snapshots.iter())
            .map(|s| s.state_time)
            .max()
    }
}
