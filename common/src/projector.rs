use std::collections::HashMap;

use crate::game::{EntitySnapshot, GameReplay};

/// As-of queries over the per-player snapshot sequences of one game.
///
/// Built once from a loaded replay and read-only afterwards. Projection is a
/// pure function of the dataset and the query time: it never mutates, never
/// synthesizes data, and is safe to call for different players concurrently.
pub struct StateProjector {
    by_player: HashMap<u32, Vec<EntitySnapshot>>,
    watermark: Option<u64>,
}

impl StateProjector {
    pub fn new(replay: &GameReplay) -> Self {
        let mut by_player = HashMap::new();
        for (_, player) in replay.players() {
            by_player.insert(player.id, player.snapshots.clone());
        }
        StateProjector {
            by_player,
            watermark: replay.latest_state_time(),
        }
    }

    /// Latest snapshot for `player_id` whose `state_time` does not exceed
    /// `query_ms`, or `None` when the player has no data that early.
    ///
    /// Ties on `state_time` resolve to the later-recorded snapshot.
    pub fn project(&self, player_id: u32, query_ms: u64) -> Option<&EntitySnapshot> {
        let snapshots = self.by_player.get(&player_id)?;
        let idx = snapshots.partition_point(|s| s.state_time <= query_ms);
        idx.checked_sub(1).map(|i| &snapshots[i])
    }

    /// Latest `state_time` loaded for any player. Queries beyond this point
    /// cannot be answered with fresher data.
    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }

    /// True when `query_ms` has advanced past all loaded data. The caller is
    /// expected to pause playback and surface a warning; this type never
    /// extrapolates.
    pub fn is_exhausted(&self, query_ms: u64) -> bool {
        match self.watermark {
            Some(watermark) => query_ms > watermark,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GamePlayer, GameTeam, Position};

    fn snapshot_at(state_time: u64, score: i64) -> EntitySnapshot {
        EntitySnapshot {
            state_time,
            score,
            ..EntitySnapshot::default()
        }
    }

    fn replay_with_one_player(snapshots: Vec<EntitySnapshot>) -> GameReplay {
        let mut replay = GameReplay::new(1, "Test Game".to_string());
        replay.teams.push(GameTeam {
            index: 0,
            name: "Red".to_string(),
            ui_color: "red".to_string(),
            score: 0,
            players: vec![GamePlayer {
                id: 7,
                name: "Alpha".to_string(),
                position: Position::Scout,
                snapshots,
            }],
        });
        replay
    }

    #[test]
    fn selects_greatest_snapshot_not_after_query() {
        let replay = replay_with_one_player(vec![
            snapshot_at(0, 0),
            snapshot_at(5000, 100),
            snapshot_at(12000, 250),
        ]);
        let projector = StateProjector::new(&replay);

        let state = projector.project(7, 7000).expect("snapshot at 5000");
        assert_eq!(state.state_time, 5000);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn exact_timestamp_match_is_included() {
        let replay = replay_with_one_player(vec![snapshot_at(0, 0), snapshot_at(5000, 100)]);
        let projector = StateProjector::new(&replay);

        assert_eq!(projector.project(7, 5000).map(|s| s.state_time), Some(5000));
    }

    #[test]
    fn absent_before_first_snapshot() {
        let replay = replay_with_one_player(vec![snapshot_at(1000, 10)]);
        let projector = StateProjector::new(&replay);

        assert!(projector.project(7, 0).is_none());
        assert!(projector.project(7, 999).is_none());
        assert!(projector.project(7, 1000).is_some());
    }

    #[test]
    fn absent_for_unknown_player() {
        let replay = replay_with_one_player(vec![snapshot_at(0, 0)]);
        let projector = StateProjector::new(&replay);

        assert!(projector.project(99, 10000).is_none());
    }

    #[test]
    fn later_recorded_snapshot_wins_timestamp_ties() {
        let replay = replay_with_one_player(vec![
            snapshot_at(5000, 100),
            snapshot_at(5000, 110),
        ]);
        let projector = StateProjector::new(&replay);

        assert_eq!(projector.project(7, 5000).map(|s| s.score), Some(110));
    }

    #[test]
    fn projection_is_monotonic_in_query_time() {
        let replay = replay_with_one_player(vec![
            snapshot_at(0, 0),
            snapshot_at(5000, 100),
            snapshot_at(12000, 250),
        ]);
        let projector = StateProjector::new(&replay);

        let mut previous = 0u64;
        for query in (0..15000).step_by(500) {
            if let Some(state) = projector.project(7, query) {
                assert!(state.state_time >= previous);
                previous = state.state_time;
            }
        }
    }

    #[test]
    fn watermark_spans_all_players() {
        let mut replay = replay_with_one_player(vec![snapshot_at(0, 0), snapshot_at(8000, 50)]);
        replay.teams.push(GameTeam {
            index: 1,
            name: "Green".to_string(),
            ui_color: "green".to_string(),
            score: 0,
            players: vec![GamePlayer {
                id: 8,
                name: "Bravo".to_string(),
                position: Position::Medic,
                snapshots: vec![snapshot_at(0, 0), snapshot_at(12000, 75)],
            }],
        });
        let projector = StateProjector::new(&replay);

        assert_eq!(projector.watermark(), Some(12000));
        assert!(!projector.is_exhausted(12000));
        assert!(projector.is_exhausted(12001));
    }

    #[test]
    fn empty_dataset_is_always_exhausted() {
        let replay = replay_with_one_player(Vec::new());
        let projector = StateProjector::new(&replay);

        assert_eq!(projector.watermark(), None);
        assert!(projector.is_exhausted(0));
        assert!(projector.project(7, 0).is_none());
    }
}
