//! Behavior state carried by entities.
//!
//! Each struct is validated at construction: a state that exists is a state
//! the tick functions in [`crate::behavior`] can run without further checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{finite, positive};
use crate::error::{ConfigError, ConfigResult};

/// State of an enemy walking between two horizontal limits.
///
/// Invariant: `left_limit <= right_limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolState {
    left_limit: f32,
    right_limit: f32,
    speed: f32,
    /// Current walking direction.
    pub moving_right: bool,
}

impl PatrolState {
    /// Creates a patrol starting to the right.
    ///
    /// Inverted limits are swapped. Equal limits are accepted; the patroller
    /// then turns around every tick without net motion.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite limits or a speed that is not positive.
    pub fn new(left_limit: f32, right_limit: f32, speed: f32) -> ConfigResult<Self> {
        finite("patrol left limit", left_limit)?;
        finite("patrol right limit", right_limit)?;
        let speed = positive("patroller", speed)?;

        let (left_limit, right_limit) = if left_limit > right_limit {
            warn!(left_limit, right_limit, "patrol limits inverted, swapping");
            (right_limit, left_limit)
        } else {
            (left_limit, right_limit)
        };

        Ok(Self {
            left_limit,
            right_limit,
            speed,
            moving_right: true,
        })
    }

    /// Left turning point.
    #[must_use]
    pub const fn left_limit(&self) -> f32 {
        self.left_limit
    }

    /// Right turning point.
    #[must_use]
    pub const fn right_limit(&self) -> f32 {
        self.right_limit
    }

    /// Walking speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }
}

/// State of an enemy following the player along the x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseState {
    speed: f32,
}

impl ChaseState {
    /// Creates a chaser moving at `speed` world units per second.
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` is not positive and finite.
    pub fn new(speed: f32) -> ConfigResult<Self> {
        Ok(Self {
            speed: positive("chaser", speed)?,
        })
    }

    /// Horizontal chasing speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }
}

/// State of a platform shuttling between two points.
///
/// Invariant: `speed > 0`. A zero speed is rejected rather than treated as a
/// stationary platform; a stationary platform is a plain
/// [`EntityKind::Platform`](crate::entity::EntityKind::Platform).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillationState {
    start: Vec2,
    end: Vec2,
    speed: f32,
    epsilon: f32,
    /// `true` while heading for `end`, `false` while heading for `start`.
    pub forward: bool,
}

impl OscillationState {
    /// Creates an oscillation heading towards `end`.
    ///
    /// `epsilon` is the arrival distance under which the direction flips.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite endpoints, or a speed or epsilon that
    /// is not positive.
    pub fn new(start: Vec2, end: Vec2, speed: f32, epsilon: f32) -> ConfigResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "oscillation endpoint",
                value: f32::NAN,
            });
        }
        let speed = positive("oscillating platform", speed)?;
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "arrival_epsilon",
                reason: "must be positive",
            });
        }
        Ok(Self {
            start,
            end,
            speed,
            epsilon,
            forward: true,
        })
    }

    /// The point the platform is currently heading for.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        if self.forward {
            self.end
        } else {
            self.start
        }
    }

    /// First endpoint (also the spawn position).
    #[must_use]
    pub const fn start(&self) -> Vec2 {
        self.start
    }

    /// Second endpoint.
    #[must_use]
    pub const fn end(&self) -> Vec2 {
        self.end
    }

    /// Maximum distance covered per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Arrival distance.
    #[must_use]
    pub const fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

/// Lifecycle of a disappearing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardPhase {
    /// Untouched; solid and drawn.
    Idle,
    /// Touched; counting down while flickering.
    Armed {
        /// Ticks elapsed since arming.
        ticks: u32,
        /// Whether the platform currently has collision and an image.
        visible: bool,
    },
    /// Removed from the level. Terminal.
    Destroyed,
}

/// What a single armed tick did to a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardStep {
    /// Not armed; nothing happened.
    Dormant,
    /// Counter advanced without a visibility change.
    Counting,
    /// Visibility flipped to the contained value.
    Toggled(bool),
    /// Lifetime reached; the platform must be removed.
    Expired,
}

/// State of a disappearing platform.
///
/// Invariant: once armed the tick counter only grows until the hazard is
/// destroyed, and an armed hazard can never be re-armed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardState {
    phase: HazardPhase,
    interval: u32,
    duration: u32,
}

impl HazardState {
    /// Creates an idle hazard that toggles every `interval` armed ticks and
    /// expires after `duration` armed ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if `interval` is zero or `duration < interval`.
    pub fn new(interval: u32, duration: u32) -> ConfigResult<Self> {
        if interval == 0 {
            return Err(ConfigError::ZeroFlickerInterval);
        }
        if duration < interval {
            return Err(ConfigError::FlickerTooShort { duration, interval });
        }
        Ok(Self {
            phase: HazardPhase::Idle,
            interval,
            duration,
        })
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> HazardPhase {
        self.phase
    }

    /// Ticks since arming, or `None` while idle or after destruction.
    #[must_use]
    pub const fn flicker_ticks(&self) -> Option<u32> {
        match self.phase {
            HazardPhase::Armed { ticks, .. } => Some(ticks),
            HazardPhase::Idle | HazardPhase::Destroyed => None,
        }
    }

    /// Whether the platform is currently solid and drawn.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        match self.phase {
            HazardPhase::Idle => true,
            HazardPhase::Armed { visible, .. } => visible,
            HazardPhase::Destroyed => false,
        }
    }

    /// Returns `true` once the hazard has been armed (including destroyed).
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        !matches!(self.phase, HazardPhase::Idle)
    }

    /// Arms an idle hazard. Returns `true` only on the transition.
    pub fn arm(&mut self) -> bool {
        if matches!(self.phase, HazardPhase::Idle) {
            self.phase = HazardPhase::Armed {
                ticks: 0,
                visible: true,
            };
            true
        } else {
            false
        }
    }

    /// Advances an armed hazard by one tick.
    pub fn advance(&mut self) -> HazardStep {
        let HazardPhase::Armed { ticks, visible } = self.phase else {
            return HazardStep::Dormant;
        };

        let ticks = ticks + 1;
        if ticks >= self.duration {
            self.phase = HazardPhase::Destroyed;
            return HazardStep::Expired;
        }

        if ticks % self.interval == 0 {
            self.phase = HazardPhase::Armed {
                ticks,
                visible: !visible,
            };
            HazardStep::Toggled(!visible)
        } else {
            self.phase = HazardPhase::Armed { ticks, visible };
            HazardStep::Counting
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod patrol_tests {
        use super::*;

        #[test]
        fn starts_moving_right() {
            let p = PatrolState::new(-2.0, 2.0, 5.0).unwrap();
            assert!(p.moving_right);
            assert_eq!(p.left_limit(), -2.0);
            assert_eq!(p.right_limit(), 2.0);
        }

        #[test]
        fn inverted_limits_are_swapped() {
            let p = PatrolState::new(8.0, 4.0, 5.0).unwrap();
            assert_eq!(p.left_limit(), 4.0);
            assert_eq!(p.right_limit(), 8.0);
        }

        #[test]
        fn equal_limits_accepted() {
            assert!(PatrolState::new(1.0, 1.0, 5.0).is_ok());
        }

        #[test]
        fn zero_speed_rejected() {
            assert!(matches!(
                PatrolState::new(0.0, 1.0, 0.0),
                Err(ConfigError::InvalidSpeed { .. })
            ));
        }

        #[test]
        fn infinite_limit_rejected() {
            assert!(PatrolState::new(f32::NEG_INFINITY, 1.0, 5.0).is_err());
        }
    }

    mod chase_tests {
        use super::*;

        #[test]
        fn keeps_speed() {
            assert_eq!(ChaseState::new(7.5).unwrap().speed(), 7.5);
        }

        #[test]
        fn negative_speed_rejected() {
            assert!(ChaseState::new(-1.0).is_err());
        }
    }

    mod oscillation_tests {
        use super::*;

        #[test]
        fn target_follows_direction() {
            let mut o =
                OscillationState::new(Vec2::new(-4.0, 12.0), Vec2::new(4.0, 12.0), 0.1, 0.1)
                    .unwrap();
            assert_eq!(o.target(), Vec2::new(4.0, 12.0));
            o.forward = false;
            assert_eq!(o.target(), Vec2::new(-4.0, 12.0));
        }

        #[test]
        fn zero_speed_rejected() {
            let err = OscillationState::new(Vec2::ZERO, Vec2::X, 0.0, 0.1).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidSpeed {
                    entity: "oscillating platform",
                    ..
                }
            ));
        }

        #[test]
        fn nan_endpoint_rejected() {
            assert!(OscillationState::new(Vec2::new(f32::NAN, 0.0), Vec2::X, 1.0, 0.1).is_err());
        }
    }

    mod hazard_tests {
        use super::*;

        #[test]
        fn starts_idle_and_visible() {
            let h = HazardState::new(10, 90).unwrap();
            assert_eq!(h.phase(), HazardPhase::Idle);
            assert!(h.is_visible());
            assert_eq!(h.flicker_ticks(), None);
        }

        #[test]
        fn arms_exactly_once() {
            let mut h = HazardState::new(10, 90).unwrap();
            assert!(h.arm());
            assert!(!h.arm());
            assert_eq!(h.flicker_ticks(), Some(0));
        }

        #[test]
        fn idle_hazard_does_not_count() {
            let mut h = HazardState::new(10, 90).unwrap();
            assert_eq!(h.advance(), HazardStep::Dormant);
            assert_eq!(h.phase(), HazardPhase::Idle);
        }

        #[test]
        fn toggles_every_interval_and_expires() {
            let mut h = HazardState::new(10, 90).unwrap();
            h.arm();

            let mut toggles = Vec::new();
            for tick in 1..=90 {
                match h.advance() {
                    HazardStep::Toggled(visible) => toggles.push((tick, visible)),
                    HazardStep::Expired => {
                        assert_eq!(tick, 90);
                    }
                    HazardStep::Counting => {}
                    HazardStep::Dormant => panic!("armed hazard reported dormant"),
                }
            }

            assert_eq!(
                toggles,
                vec![
                    (10, false),
                    (20, true),
                    (30, false),
                    (40, true),
                    (50, false),
                    (60, true),
                    (70, false),
                    (80, true),
                ]
            );
            assert_eq!(h.phase(), HazardPhase::Destroyed);
            assert!(!h.is_visible());
        }

        #[test]
        fn destroyed_hazard_cannot_rearm_or_count() {
            let mut h = HazardState::new(1, 1).unwrap();
            h.arm();
            assert_eq!(h.advance(), HazardStep::Expired);
            assert!(!h.arm());
            assert_eq!(h.advance(), HazardStep::Dormant);
            assert_eq!(h.phase(), HazardPhase::Destroyed);
        }

        #[test]
        fn counter_is_monotonic() {
            let mut h = HazardState::new(10, 90).unwrap();
            h.arm();
            let mut last = 0;
            for _ in 0..89 {
                h.advance();
                let now = h.flicker_ticks().unwrap();
                assert!(now > last);
                last = now;
            }
        }

        #[test]
        fn invalid_timing_rejected() {
            assert!(matches!(
                HazardState::new(0, 90),
                Err(ConfigError::ZeroFlickerInterval)
            ));
            assert!(matches!(
                HazardState::new(10, 5),
                Err(ConfigError::FlickerTooShort { .. })
            ));
        }
    }
}
