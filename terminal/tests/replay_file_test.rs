use anyhow::Result;
use common::{EntitySnapshot, GamePlayer, GameReplay, GameTeam, Position};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::SystemTime;
use terminal::replay::{
    write_replay, PlayerRecord, ReplayMetadata, ReplayReader, TeamRecord, TimestampedSnapshot,
};

fn snapshot_at(state_time: u64, score: i64) -> EntitySnapshot {
    EntitySnapshot {
        state_time,
        is_active: true,
        score,
        lives: 15,
        shots: 30,
        ..EntitySnapshot::default()
    }
}

fn sample_replay() -> GameReplay {
    let mut replay = GameReplay::new(42, "League Night Game 3".to_string());
    replay.teams.push(GameTeam {
        index: 0,
        name: "Red Team".to_string(),
        ui_color: "red".to_string(),
        score: 12050,
        players: vec![
            GamePlayer {
                id: 101,
                name: "Ace".to_string(),
                position: Position::Commander,
                snapshots: vec![snapshot_at(0, 0), snapshot_at(5000, 400), snapshot_at(12000, 900)],
            },
            GamePlayer {
                id: 102,
                name: "Bolt".to_string(),
                position: Position::Scout,
                snapshots: vec![snapshot_at(0, 0), snapshot_at(8000, 250)],
            },
        ],
    });
    replay.teams.push(GameTeam {
        index: 1,
        name: "Green Team".to_string(),
        ui_color: "green".to_string(),
        score: 11800,
        players: vec![GamePlayer {
            id: 201,
            name: "Crux".to_string(),
            position: Position::Medic,
            snapshots: vec![snapshot_at(3000, 100)],
        }],
    });
    replay
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lfstats_test_{}_{}", tag, std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn write_then_read_preserves_dataset() -> Result<()> {
    let dir = temp_dir("roundtrip");
    let path = dir.join("game_42.replay");

    let original = sample_replay();
    write_replay(&path, &original)?;
    let loaded = ReplayReader::load_replay(&path)?;

    assert_eq!(loaded, original);

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn list_replays_finds_written_files() -> Result<()> {
    let dir = temp_dir("listing");
    write_replay(&dir.join("game_1.replay"), &sample_replay())?;
    write_replay(&dir.join("nested").join("game_2.replay"), &sample_replay())?;
    fs::write(dir.join("notes.txt"), "not a replay")?;

    let found = ReplayReader::list_replays(&dir)?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap() == "replay"));

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn loader_restores_per_player_time_order() -> Result<()> {
    let dir = temp_dir("ordering");
    let path = dir.join("game_7.replay");

    // Hand-write a file whose snapshot stream is out of order for player 101
    let metadata = ReplayMetadata {
        game_id: 7,
        description: "Scrambled".to_string(),
        game_length_ms: 900_000,
        recorded_at: SystemTime::now(),
        teams: vec![TeamRecord {
            index: 0,
            name: "Red Team".to_string(),
            ui_color: "red".to_string(),
            score: 0,
        }],
        players: vec![PlayerRecord {
            id: 101,
            team_index: 0,
            name: "Ace".to_string(),
            position: Position::Commander,
        }],
    };
    let entries = vec![
        TimestampedSnapshot { player_id: 101, snapshot: snapshot_at(9000, 300) },
        TimestampedSnapshot { player_id: 101, snapshot: snapshot_at(1000, 50) },
        TimestampedSnapshot { player_id: 101, snapshot: snapshot_at(4000, 120) },
    ];

    let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
    writeln!(encoder, "{}", serde_json::to_string(&metadata)?)?;
    for entry in &entries {
        writeln!(encoder, "{}", serde_json::to_string(entry)?)?;
    }
    encoder.finish()?;

    let loaded = ReplayReader::load_replay(&path)?;
    let times: Vec<u64> = loaded.teams[0].players[0]
        .snapshots
        .iter()
        .map(|s| s.state_time)
        .collect();
    assert_eq!(times, vec![1000, 4000, 9000]);

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn snapshots_for_unknown_players_are_skipped() -> Result<()> {
    let dir = temp_dir("unknown");
    let path = dir.join("game_8.replay");

    let metadata = ReplayMetadata {
        game_id: 8,
        description: "Stray states".to_string(),
        game_length_ms: 900_000,
        recorded_at: SystemTime::now(),
        teams: vec![TeamRecord {
            index: 0,
            name: "Red Team".to_string(),
            ui_color: "red".to_string(),
            score: 0,
        }],
        players: vec![PlayerRecord {
            id: 101,
            team_index: 0,
            name: "Ace".to_string(),
            position: Position::Scout,
        }],
    };

    let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
    writeln!(encoder, "{}", serde_json::to_string(&metadata)?)?;
    let known = TimestampedSnapshot { player_id: 101, snapshot: snapshot_at(1000, 50) };
    let stray = TimestampedSnapshot { player_id: 999, snapshot: snapshot_at(2000, 75) };
    writeln!(encoder, "{}", serde_json::to_string(&known)?)?;
    writeln!(encoder, "{}", serde_json::to_string(&stray)?)?;
    encoder.finish()?;

    let loaded = ReplayReader::load_replay(&path)?;
    assert_eq!(loaded.snapshot_count(), 1);
    assert_eq!(loaded.teams[0].players[0].snapshots[0].state_time, 1000);

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn corrupt_file_is_a_load_error() -> Result<()> {
    let dir = temp_dir("corrupt");
    let path = dir.join("game_9.replay");
    fs::write(&path, b"plainly not gzip")?;

    assert!(ReplayReader::load_replay(&path).is_err());

    fs::remove_dir_all(&dir).ok();
    Ok(())
}
