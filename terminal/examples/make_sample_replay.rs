//! Writes a synthetic .replay file so the viewer can be exercised without
//! data from a center. Usage: cargo run --example make_sample_replay [dir]

use anyhow::Result;
use common::{DeacType, EntitySnapshot, GamePlayer, GameReplay, GameTeam, Position};
use std::path::PathBuf;
use terminal::replay::write_replay;

fn synth_snapshots(seed: u64) -> Vec<EntitySnapshot> {
    let mut snapshots = Vec::new();
    let mut score: i64 = 0;
    let mut shots: u32 = 300;
    let mut lives: u32 = 15;

    // One state every 15 seconds for the first 12 minutes of the game
    for step in 0..48u64 {
        let state_time = step * 15_000;
        score += 100 + ((seed + step) % 7) as i64 * 25;
        shots = shots.saturating_sub(5 + ((seed + step) % 4) as u32);
        if step % 9 == 8 {
            lives = lives.saturating_sub(1);
        }

        let downed = step % 6 == 5;
        snapshots.push(EntitySnapshot {
            state_time,
            is_active: !downed,
            is_eliminated: false,
            last_deac_type: downed.then_some(DeacType::Opponent),
            score,
            lives,
            shots,
            accuracy: 0.25 + (seed as f64 % 10.0) / 50.0,
            hit_diff: 1.1 + seed as f64 / 20.0,
            assists: (step / 10) as u32,
            medic_hits: (step / 16) as u32,
            shots_fired: (step * 9) as u32,
            shots_hit: (step * 3) as u32,
            shot_opponent: (step * 2) as u32,
            deac_opponent: step as u32,
            self_hit: (step / 2) as u32,
            self_deac: (step / 5) as u32,
            sp_earned: step as u32,
            sp_spent: (step / 3) as u32 * 2,
            resupply_shots: (step / 8) as u32,
            resupply_lives: (step / 12) as u32,
            penalties: 0,
        });
    }
    snapshots
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp/lfstats_replays"));

    let mut replay = GameReplay::new(42, "Sample League Game".to_string());
    replay.teams.push(GameTeam {
        index: 0,
        name: "Red Team".to_string(),
        ui_color: "red".to_string(),
        score: 14250,
        players: vec![
            GamePlayer {
                id: 101,
                name: "Ace".to_string(),
                position: Position::Commander,
                snapshots: synth_snapshots(3),
            },
            GamePlayer {
                id: 102,
                name: "Bolt".to_string(),
                position: Position::Scout,
                snapshots: synth_snapshots(5),
            },
            GamePlayer {
                id: 103,
                name: "Patch".to_string(),
                position: Position::Medic,
                snapshots: synth_snapshots(8),
            },
        ],
    });
    replay.teams.push(GameTeam {
        index: 1,
        name: "Green Team".to_string(),
        ui_color: "green".to_string(),
        score: 13900,
        players: vec![
            GamePlayer {
                id: 201,
                name: "Crux".to_string(),
                position: Position::HeavyWeapons,
                snapshots: synth_snapshots(2),
            },
            GamePlayer {
                id: 202,
                name: "Dart".to_string(),
                position: Position::AmmoCarrier,
                snapshots: synth_snapshots(7),
            },
        ],
    });

    let path = dir.join("game_42.replay");
    write_replay(&path, &replay)?;
    println!("Wrote sample replay to {:?}", path);
    Ok(())
}
