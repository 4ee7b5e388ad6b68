use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::constants::{
    CLOCK_TICK_INTERVAL_MS, CLOCK_TICK_STEP_SECONDS, MAX_GAME_SECONDS, RATE_PALETTE,
};

/// Copy of the clock state for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSnapshot {
    /// Synthetic seconds since game start, always within [0, 900]
    pub elapsed: f64,
    pub running: bool,
    pub rate: f64,
}

#[derive(Debug)]
struct ClockState {
    elapsed: f64,
    running: bool,
    rate: f64,
    rate_index: usize,
}

/// Virtual timeline controller for replay playback.
///
/// While running, a ticker task fires every 100ms of wall time and advances
/// `elapsed` by 0.1s of synthetic time times the current rate. The ticker is
/// a scoped resource: the cancel handle lives next to the running flag, is
/// replaced on every start and cancelled on stop/reset/drop, so at most one
/// ticker is live and none fires after teardown.
///
/// Every mutation reapplies the clamp to [0, 900] seconds; reaching the top
/// of the range pins `elapsed` and stops the clock. None of the operations
/// can fail and nothing is persisted across sessions.
pub struct ReplayClock {
    state: Arc<Mutex<ClockState>>,
    cancel: Option<CancellationToken>,
}

impl ReplayClock {
    pub fn new() -> Self {
        ReplayClock {
            state: Arc::new(Mutex::new(ClockState {
                elapsed: 0.0,
                running: false,
                rate: RATE_PALETTE[0],
                rate_index: 0,
            })),
            cancel: None,
        }
    }

    /// Start advancing. No-op if already running.
    pub fn start(&mut self) {
        {
            let mut state = self.lock_state();
            if state.running {
                return;
            }
            state.running = true;
        }

        // Replace any handle left behind by a ticker that stopped itself
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        tokio::spawn(run_ticker(Arc::clone(&self.state), token));
    }

    /// Stop advancing. Idempotent. A tick already in flight may still
    /// complete, but no further ticks are observed after this returns.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.lock_state().running = false;
    }

    /// Stop and rewind to the start of the game
    pub fn reset(&mut self) {
        self.stop();
        self.lock_state().elapsed = 0.0;
    }

    /// Scrub to an absolute position, clamped to the valid range
    pub fn set_elapsed(&self, seconds: f64) {
        let mut state = self.lock_state();
        state.elapsed = seconds.clamp(0.0, MAX_GAME_SECONDS);
    }

    /// Scrub relative to the current position
    pub fn seek_by(&self, delta_seconds: f64) {
        let mut state = self.lock_state();
        state.elapsed = (state.elapsed + delta_seconds).clamp(0.0, MAX_GAME_SECONDS);
    }

    /// Replace the playback rate multiplier
    pub fn set_rate(&self, rate: f64) {
        self.lock_state().rate = rate;
    }

    /// Advance round-robin through the rate palette, returning the new rate
    pub fn cycle_rate(&self) -> f64 {
        let mut state = self.lock_state();
        state.rate_index = (state.rate_index + 1) % RATE_PALETTE.len();
        state.rate = RATE_PALETTE[state.rate_index];
        state.rate
    }

    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        let state = self.lock_state();
        ClockSnapshot {
            elapsed: state.elapsed,
            running: state.running,
            rate: state.rate,
        }
    }

    /// Current position in milliseconds, for as-of queries
    pub fn elapsed_millis(&self) -> u64 {
        (self.lock_state().elapsed * 1000.0) as u64
    }

    fn lock_state(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().expect("clock state lock poisoned")
    }
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReplayClock {
    fn drop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

async fn run_ticker(state: Arc<Mutex<ClockState>>, token: CancellationToken) {
    let period = Duration::from_millis(CLOCK_TICK_INTERVAL_MS);
    // interval_at so the first firing lands one full cadence after start
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            _ = ticker.tick() => {
                let mut state = state.lock().expect("clock state lock poisoned");
                if !state.running || token.is_cancelled() {
                    break;
                }

                state.elapsed += CLOCK_TICK_STEP_SECONDS * state.rate;

                // TODO: clamp to the recorded game length for elimination
                // games instead of assuming the full 15 minutes.
                if state.elapsed >= MAX_GAME_SECONDS {
                    state.elapsed = MAX_GAME_SECONDS;
                    state.running = false;
                    debug!("clock reached end of game, stopping");
                    break;
                }
                if state.elapsed < 0.0 {
                    state.elapsed = 0.0;
                }
            }
        }
    }
}
