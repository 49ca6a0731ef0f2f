//! Default tuning values for a session.
//!
//! These only seed [`GameConfig::default`](crate::config::GameConfig); nothing
//! reads them directly once a session is running.

/// Countdown seconds granted per required item generated.
pub const SECONDS_PER_SYSTEM: u64 = 8;

/// Chance that a neighbor scan fails, in [0, 1].
pub const SCAN_FAIL_CHANCE: f64 = 0.1;

/// Steps one map walk may spend before giving up on placing an item. Higher
/// values make placement more likely at the cost of generation time.
pub const MAX_STEPS: u32 = 100;

/// Chance that a walk step moves to an existing system instead of branching a
/// new one. Larger values make spikier maps.
pub const MOVE_CHANCE: f64 = 0.7;

/// Base health for all fighters.
pub const FIGHTER_BASE_HEALTH: i32 = 50;

/// Base damage for all fighters.
pub const FIGHTER_BASE_DAMAGE: i32 = 10;

/// Additional damage the player always gets. Must be >= 0 for the player to
/// win at all.
pub const PLAYER_DAMAGE_BOOST: i32 = 5;

/// Additional health the RANSOMWARE gets per missing code fragment.
pub const CODE_FRAGMENT_HEALTH_BOOST: i32 = 25;

/// Additional damage the RANSOMWARE gets per missing vulnerability.
pub const VULNERABILITY_DAMAGE_BOOST: i32 = 10;

/// Most duplicate code fragments / vulnerabilities rolled into the required
/// set (the roll is 1..=this).
pub const MAX_DUPLICATE_ITEMS: u32 = 3;
