//! Gameplay tuning and top-level game configuration.
//!
//! [`Tuning`] gathers every numeric constant the behaviors, contact rules and
//! orchestrator depend on. The defaults reproduce the shipped game; hosts may
//! override any of them through a JSON document loaded with
//! [`GameConfig::from_json`].
//!
//! # Example
//!
//! ```
//! use skyward_core::config::{GameConfig, Tuning};
//!
//! let tuning = Tuning::default();
//! assert_eq!(tuning.enemy_damage, 25);
//! assert_eq!(tuning.flicker_duration, 90);
//! assert!(tuning.validate().is_ok());
//!
//! let config = GameConfig::from_json(r#"{ "tuning": { "collectible_reward": 50 } }"#).unwrap();
//! assert_eq!(config.tuning.collectible_reward, 50);
//! assert_eq!(config.tuning.enemy_damage, 25);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::level::LevelSet;

/// Fixed simulation timestep (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Maximum (and initial) player health.
pub const MAX_HEALTH: u32 = 100;

/// Numeric constants that drive the gameplay rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Health removed per enemy contact.
    pub enemy_damage: u32,
    /// Upward velocity added to the player on enemy contact.
    pub knockback_bump: f32,
    /// Score awarded per collectible.
    pub collectible_reward: u32,
    /// Horizontal speed applied by the move-left / move-right controls.
    pub move_speed: f32,
    /// Impulse applied to the player on a successful jump.
    pub jump_impulse: Vec2,
    /// Horizontal speed of chasing enemies.
    pub chaser_speed: f32,
    /// Horizontal speed of patrolling enemies.
    pub patrol_speed: f32,
    /// Armed ticks between hazard visibility toggles.
    pub flicker_interval: u32,
    /// Armed ticks after which a hazard is destroyed.
    pub flicker_duration: u32,
    /// Distance under which an oscillating platform counts as arrived.
    pub arrival_epsilon: f32,
    /// Player height that clears level 1.
    pub level_one_exit: f32,
    /// Player height that clears level 2.
    pub level_two_exit: f32,
    /// Player height that wins the game in level 3.
    pub win_height: f32,
    /// Simulation timestep handed to the physics engine.
    pub dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_damage: 25,
            knockback_bump: 2.0,
            collectible_reward: 10,
            move_speed: 10.0,
            jump_impulse: Vec2::new(0.0, 3.0),
            chaser_speed: 7.5,
            patrol_speed: 5.0,
            flicker_interval: 10,
            flicker_duration: 90,
            arrival_epsilon: 0.1,
            level_one_exit: 25.0,
            level_two_exit: 35.0,
            win_height: 69.0,
            dt: FIXED_DT,
        }
    }
}

impl Tuning {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("chaser", self.chaser_speed)?;
        positive("patroller", self.patrol_speed)?;
        positive("player", self.move_speed)?;
        finite("knockback_bump", self.knockback_bump)?;
        finite("jump_impulse.x", self.jump_impulse.x)?;
        finite("jump_impulse.y", self.jump_impulse.y)?;

        if self.flicker_interval == 0 {
            return Err(ConfigError::ZeroFlickerInterval);
        }
        if self.flicker_duration < self.flicker_interval {
            return Err(ConfigError::FlickerTooShort {
                duration: self.flicker_duration,
                interval: self.flicker_interval,
            });
        }
        if !(self.arrival_epsilon.is_finite() && self.arrival_epsilon > 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "arrival_epsilon",
                reason: "must be positive",
            });
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "dt",
                reason: "must be positive",
            });
        }
        if self.enemy_damage == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "enemy_damage",
                reason: "must be non-zero",
            });
        }

        finite("level_one_exit", self.level_one_exit)?;
        finite("level_two_exit", self.level_two_exit)?;
        finite("win_height", self.win_height)?;
        Ok(())
    }
}

pub(crate) fn positive(entity: &'static str, speed: f32) -> ConfigResult<f32> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(ConfigError::InvalidSpeed { entity, speed })
    }
}

pub(crate) fn finite(field: &'static str, value: f32) -> ConfigResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Complete game configuration: tuning plus the three level layouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gameplay constants.
    pub tuning: Tuning,
    /// Level geometry for levels 1 to 3.
    pub levels: LevelSet,
}

impl GameConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and any
    /// validation error raised by [`Tuning::validate`].
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.tuning.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tuning_tests {
        use super::*;

        #[test]
        fn defaults_match_shipped_game() {
            let t = Tuning::default();
            assert_eq!(t.enemy_damage, 25);
            assert_eq!(t.collectible_reward, 10);
            assert!((t.knockback_bump - 2.0).abs() < f32::EPSILON);
            assert!((t.chaser_speed - 7.5).abs() < f32::EPSILON);
            assert!((t.patrol_speed - 5.0).abs() < f32::EPSILON);
            assert_eq!(t.flicker_interval, 10);
            assert_eq!(t.flicker_duration, 90);
            assert_eq!(t.jump_impulse, Vec2::new(0.0, 3.0));
        }

        #[test]
        fn defaults_validate() {
            assert!(Tuning::default().validate().is_ok());
        }

        #[test]
        fn zero_chaser_speed_rejected() {
            let t = Tuning {
                chaser_speed: 0.0,
                ..Tuning::default()
            };
            assert!(matches!(
                t.validate(),
                Err(ConfigError::InvalidSpeed {
                    entity: "chaser",
                    ..
                })
            ));
        }

        #[test]
        fn nan_patrol_speed_rejected() {
            let t = Tuning {
                patrol_speed: f32::NAN,
                ..Tuning::default()
            };
            assert!(t.validate().is_err());
        }

        #[test]
        fn zero_flicker_interval_rejected() {
            let t = Tuning {
                flicker_interval: 0,
                ..Tuning::default()
            };
            assert!(matches!(t.validate(), Err(ConfigError::ZeroFlickerInterval)));
        }

        #[test]
        fn flicker_duration_shorter_than_interval_rejected() {
            let t = Tuning {
                flicker_interval: 20,
                flicker_duration: 10,
                ..Tuning::default()
            };
            assert!(matches!(
                t.validate(),
                Err(ConfigError::FlickerTooShort { .. })
            ));
        }
    }

    mod game_config_tests {
        use super::*;

        #[test]
        fn empty_document_yields_defaults() {
            let config = GameConfig::from_json("{}").unwrap();
            assert_eq!(config, GameConfig::default());
        }

        #[test]
        fn partial_tuning_override() {
            let config =
                GameConfig::from_json(r#"{ "tuning": { "enemy_damage": 50 } }"#).unwrap();
            assert_eq!(config.tuning.enemy_damage, 50);
            assert_eq!(config.tuning.collectible_reward, 10);
        }

        #[test]
        fn malformed_document_is_parse_error() {
            let err = GameConfig::from_json("{ tuning: ").unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
        }

        #[test]
        fn invalid_override_is_rejected() {
            let err = GameConfig::from_json(r#"{ "tuning": { "patrol_speed": -1.0 } }"#)
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSpeed { .. }));
        }
    }
}
