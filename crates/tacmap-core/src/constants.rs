//! Radar tuning parameters.

/// Logic frames per second of the simulation step.
pub const LOGIC_FRAMES_PER_SECOND: u64 = 30;

// --- Logical grid ---

/// Width of the logical radar grid in cells.
pub const GRID_WIDTH: i32 = 128;

/// Height of the logical radar grid in cells.
pub const GRID_HEIGHT: i32 = 128;

// --- Pulses ---

/// Capacity of the pulse ring buffer. The oldest pulse is overwritten
/// once the buffer wraps, active or not.
pub const MAX_PULSES: usize = 64;

/// Seconds before its die frame that a pulse starts fading.
pub const PULSE_FADE_LEAD_SECS: f32 = 0.5;

/// Default lifetime of a throttled pulse, in seconds.
pub const PULSE_DEFAULT_TTL_SECS: f32 = 5.0;

/// Squared world-distance inside which a same-kind pulse suppresses a new one.
pub const PULSE_SUPPRESS_DIST_SQ: f32 = 250.0 * 250.0;

/// Frames inside which a nearby same-kind pulse suppresses a new one.
pub const PULSE_SUPPRESS_FRAMES: u64 = LOGIC_FRAMES_PER_SECOND * 10;

/// Scale applied to a player color to derive the secondary pulse color.
pub const PLAYER_PULSE_DARK_SCALE: f32 = 0.75;

// --- Terrain sampling ---

/// Frames a queued terrain refresh waits before it is applied.
pub const TERRAIN_REFRESH_DELAY_FRAMES: u64 = LOGIC_FRAMES_PER_SECOND * 3;

/// Row/column stride of the elevation averaging sweep in `new_map`.
pub const ELEVATION_SAMPLE_STRIDE: i32 = 2;
