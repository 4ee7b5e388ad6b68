/// Wall-clock cadence of the replay clock ticker in milliseconds
pub const CLOCK_TICK_INTERVAL_MS: u64 = 100;

/// Synthetic time added per ticker firing at 1x rate, in seconds
pub const CLOCK_TICK_STEP_SECONDS: f64 = 0.1;

/// Maximum game length in seconds. Standard games run 15 minutes.
pub const MAX_GAME_SECONDS: f64 = 900.0;

/// Default game length in milliseconds for metadata that omits it
pub const DEFAULT_GAME_LENGTH_MS: u64 = 900_000;

/// Playback rate multipliers, cycled round-robin by the rate control
pub const RATE_PALETTE: [f64; 5] = [1.0, 2.0, 5.0, 10.0, 0.5];
