//! Constants for board geometry, region bucketing, and the console.
//!
//! The board itself is unbounded, so unlike a fixed-size Go board there is
//! no padding or array layout here. What remains are the neighbour offsets,
//! the default notification granularity, and a few console limits.

// =============================================================================
// Board Geometry
// =============================================================================

/// Offsets to the orthogonal neighbours of a point.
/// Order: East, West, North, South
pub const ORTHOGONAL: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// =============================================================================
// Region Bucketing
// =============================================================================

/// Default side length of a notification region.
pub const DEFAULT_REGION_SIZE: u32 = 256;

// =============================================================================
// Console
// =============================================================================

/// Owner recorded for stones placed from the console without an explicit owner.
pub const CONSOLE_OWNER: &str = "console";

/// Largest rectangle side the console will `retrieve` in one call.
pub const MAX_RETRIEVE_SPAN: u64 = 4096;

// =============================================================================
// Stress Run Defaults
// =============================================================================

/// Number of player threads.
pub const STRESS_PLAYERS: usize = 8;

/// Placement attempts per player.
pub const STRESS_ATTEMPTS: usize = 2000;

/// Stones are scattered over `[-STRESS_SPREAD, STRESS_SPREAD]` on both axes.
pub const STRESS_SPREAD: i64 = 24;

/// Milliseconds between ticks.
pub const STRESS_TICK_MS: u64 = 2;
