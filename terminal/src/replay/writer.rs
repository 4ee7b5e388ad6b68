use super::*;
use anyhow::{Context, Result};
use common::GameReplay;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write a replay dataset in the `.replay` format: gzip-compressed
/// newline-delimited JSON, metadata first, then one snapshot per line in
/// global time order.
pub fn write_replay(path: &Path, replay: &GameReplay) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create replay output directory")?;
    }

    let metadata = ReplayMetadata {
        game_id: replay.game_id,
        description: replay.description.clone(),
        game_length_ms: replay.game_length_ms,
        recorded_at: SystemTime::now(),
        teams: replay
            .teams
            .iter()
            .map(|team| TeamRecord {
                index: team.index,
                name: team.name.clone(),
                ui_color: team.ui_color.clone(),
                score: team.score,
            })
            .collect(),
        players: replay
            .teams
            .iter()
            .flat_map(|team| {
                team.players.iter().map(move |player| PlayerRecord {
                    id: player.id,
                    team_index: team.index,
                    name: player.name.clone(),
                    position: player.position,
                })
            })
            .collect(),
    };

    let mut entries: Vec<TimestampedSnapshot> = replay
        .players()
        .flat_map(|(_, player)| {
            player.snapshots.iter().map(move |snapshot| TimestampedSnapshot {
                player_id: player.id,
                snapshot: snapshot.clone(),
            })
        })
        .collect();
    // Stable by state_time, so each player's recording order is preserved
    entries.sort_by_key(|entry| entry.snapshot.state_time);

    let file = fs::File::create(path).context("Failed to create replay file")?;
    let mut encoder = GzEncoder::new(file, Compression::default());

    let metadata_json = serde_json::to_string(&metadata)?;
    writeln!(encoder, "{}", metadata_json)?;

    for entry in &entries {
        let entry_json = serde_json::to_string(entry)?;
        writeln!(encoder, "{}", entry_json)?;
    }

    encoder.finish()?;

    info!("Saved replay for game {} to {:?}", replay.game_id, path);
    Ok(())
}
