//! Session configuration.
//!
//! One explicit value threaded into map generation, the battle, and the
//! session loop, so tests can parameterize all of them deterministically.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Rejections from [`GameConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ChanceOutOfRange { name: &'static str, value: f64 },

    #[error("max_steps must be nonzero")]
    ZeroStepBudget,

    #[error("max_duplicate_items must be nonzero")]
    ZeroDuplicateRange,

    #[error("seconds_per_system must be nonzero")]
    ZeroCountdown,
}

/// Tuning knobs for one game session.
///
/// Unknown fields in a config file are rejected; missing fields fall back to
/// the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Countdown seconds granted per required item.
    pub seconds_per_system: u64,
    /// Chance a neighbor scan fails.
    pub scan_fail_chance: f64,
    /// Step budget for each item-placing walk.
    pub max_steps: u32,
    /// Chance a walk step moves instead of branching.
    pub move_chance: f64,
    /// Upper bound on duplicate code fragments and vulnerabilities.
    pub max_duplicate_items: u32,
    /// Base health for both fighters.
    pub base_health: i32,
    /// Base damage for both fighters.
    pub base_damage: i32,
    /// Flat damage bonus for the player.
    pub player_damage_boost: i32,
    /// RANSOMWARE health bonus per missing code fragment.
    pub code_fragment_health_boost: i32,
    /// RANSOMWARE damage bonus per missing vulnerability.
    pub vulnerability_damage_boost: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seconds_per_system: consts::SECONDS_PER_SYSTEM,
            scan_fail_chance: consts::SCAN_FAIL_CHANCE,
            max_steps: consts::MAX_STEPS,
            move_chance: consts::MOVE_CHANCE,
            max_duplicate_items: consts::MAX_DUPLICATE_ITEMS,
            base_health: consts::FIGHTER_BASE_HEALTH,
            base_damage: consts::FIGHTER_BASE_DAMAGE,
            player_damage_boost: consts::PLAYER_DAMAGE_BOOST,
            code_fragment_health_boost: consts::CODE_FRAGMENT_HEALTH_BOOST,
            vulnerability_damage_boost: consts::VULNERABILITY_DAMAGE_BOOST,
        }
    }
}

impl GameConfig {
    /// Checks the tuning values before a session starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_chance("scan_fail_chance", self.scan_fail_chance)?;
        check_chance("move_chance", self.move_chance)?;
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepBudget);
        }
        if self.max_duplicate_items == 0 {
            return Err(ConfigError::ZeroDuplicateRange);
        }
        if self.seconds_per_system == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        Ok(())
    }
}

fn check_chance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ChanceOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_chances() {
        let mut config = GameConfig::default();
        config.move_chance = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ChanceOutOfRange {
                name: "move_chance",
                value: 1.5
            })
        );

        let mut config = GameConfig::default();
        config.scan_fail_chance = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_budgets() {
        let mut config = GameConfig::default();
        config.max_steps = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStepBudget));

        let mut config = GameConfig::default();
        config.seconds_per_system = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCountdown));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"max_steps": 10}"#).unwrap();
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.move_chance, consts::MOVE_CHANCE);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<GameConfig, _> = serde_json::from_str(r#"{"move_chanse": 0.5}"#);
        assert!(result.is_err());
    }
}
