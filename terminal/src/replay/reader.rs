use super::*;
use anyhow::{Context, Result};
use common::{GamePlayer, GameReplay, GameTeam};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct ReplayReader;

impl ReplayReader {
    /// Load one `.replay` file and assemble the nested team -> player ->
    /// snapshot dataset the viewer consumes.
    pub fn load_replay(path: &Path) -> Result<GameReplay> {
        let file =
            File::open(path).with_context(|| format!("Failed to open replay file: {:?}", path))?;
        let decoder = GzDecoder::new(file);
        let reader = BufReader::new(decoder);
        let mut lines = reader.lines();

        // Parse metadata (first line)
        let metadata_line = lines
            .next()
            .context("Replay file is empty")?
            .context("Failed to read metadata line")?;
        let metadata: ReplayMetadata =
            serde_json::from_str(&metadata_line).context("Failed to parse replay metadata")?;

        let mut replay = GameReplay {
            game_id: metadata.game_id,
            description: metadata.description,
            game_length_ms: metadata.game_length_ms,
            teams: metadata
                .teams
                .iter()
                .map(|team| GameTeam {
                    index: team.index,
                    name: team.name.clone(),
                    ui_color: team.ui_color.clone(),
                    score: team.score,
                    players: Vec::new(),
                })
                .collect(),
        };

        // Index of player id -> (team slot, player slot)
        let mut slots: HashMap<u32, (usize, usize)> = HashMap::new();
        for record in &metadata.players {
            let team_slot = replay
                .teams
                .iter()
                .position(|t| t.index == record.team_index)
                .with_context(|| {
                    format!("Player {} references unknown team {}", record.id, record.team_index)
                })?;
            let team = &mut replay.teams[team_slot];
            slots.insert(record.id, (team_slot, team.players.len()));
            team.players.push(GamePlayer {
                id: record.id,
                name: record.name.clone(),
                position: record.position,
                snapshots: Vec::new(),
            });
        }

        // Parse snapshot stream
        for (i, line_result) in lines.enumerate() {
            let line =
                line_result.with_context(|| format!("Failed to read snapshot line {}", i + 2))?;
            let entry: TimestampedSnapshot = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse snapshot on line {}", i + 2))?;

            match slots.get(&entry.player_id) {
                Some(&(team_slot, player_slot)) => {
                    replay.teams[team_slot].players[player_slot]
                        .snapshots
                        .push(entry.snapshot);
                }
                None => {
                    warn!(player_id = entry.player_id, "Snapshot for unknown player, skipping");
                }
            }
        }

        // The projector relies on per-player ordering by state_time. Well
        // formed files are already ordered; a stable sort keeps ties in
        // recording order either way.
        for team in &mut replay.teams {
            for player in &mut team.players {
                player.snapshots.sort_by_key(|s| s.state_time);
            }
        }

        Ok(replay)
    }

    pub fn list_replays(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut replays = Vec::new();

        fn find_replay_files(dir: &Path, replays: &mut Vec<PathBuf>) -> Result<()> {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();

                if path.is_dir() {
                    find_replay_files(&path, replays).ok();
                } else if path.extension() == Some(OsStr::new("replay")) {
                    replays.push(path);
                }
            }
            Ok(())
        }

        find_replay_files(dir, &mut replays)?;

        // Sort by modification time (newest first)
        replays.sort_by(|a, b| {
            let a_time = a
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            let b_time = b
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            b_time.cmp(&a_time)
        });

        Ok(replays)
    }
}
