//! Player identity and control gating.
//!
//! [`PlayerState`] is the only gameplay state that survives a level swap. It
//! is mutated by contact rules (health, score, grounding) and by the
//! controls in this module (jumping).
//!
//! # Example
//!
//! ```
//! use skyward_core::player::PlayerState;
//!
//! let mut player = PlayerState::new();
//! assert_eq!(player.health(), 100);
//!
//! assert!(!player.take_damage(25));
//! assert_eq!(player.health(), 75);
//!
//! player.add_score(10);
//! assert_eq!(player.score(), 10);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MAX_HEALTH;
use crate::engine::{AudioSink, PhysicsPort, SoundKind};
use crate::entity::BodyId;

// =============================================================================
// PlayerState
// =============================================================================

/// Health, score and jump gating of the player.
///
/// Invariants: `health <= MAX_HEALTH`; `score` never decreases except
/// through [`PlayerState::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    health: u32,
    score: u32,
    /// Resting on a platform-like surface since the last jump.
    pub grounded: bool,
    /// A jump is in flight.
    pub jumping: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    /// Full health, zero score, airborne and not jumping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            health: MAX_HEALTH,
            score: 0,
            grounded: false,
            jumping: false,
        }
    }

    /// Current health in `[0, MAX_HEALTH]`.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Returns `true` once health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Removes health, saturating at zero.
    ///
    /// Returns `true` only for the hit that brings health to zero; hits on an
    /// already dead player return `false`.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.is_dead()
    }

    /// Adds to the score, saturating at `u32::MAX`.
    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Records a landing on a platform-like surface.
    pub fn land(&mut self) {
        self.grounded = true;
        self.jumping = false;
    }

    /// Returns `true` if a jump would currently be accepted.
    #[must_use]
    pub const fn can_jump(&self) -> bool {
        self.grounded && !self.jumping
    }

    /// Clears both jump flags, as when the player is respawned.
    pub fn clear_footing(&mut self) {
        self.grounded = false;
        self.jumping = false;
    }

    /// Restores the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// Controls
// =============================================================================

/// Horizontal control input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    /// Move left at full speed.
    Left,
    /// Move right at full speed.
    Right,
    /// Stop horizontal motion.
    Stop,
}

/// Applies a horizontal control to the player body, keeping vertical velocity.
pub fn steer<P: PhysicsPort + ?Sized>(engine: &mut P, body: BodyId, input: Steer, speed: f32) {
    let Some(velocity) = engine.linear_velocity(body) else {
        return;
    };
    let vx = match input {
        Steer::Left => -speed,
        Steer::Right => speed,
        Steer::Stop => 0.0,
    };
    engine.set_linear_velocity(body, Vec2::new(vx, velocity.y));
}

/// Attempts a jump.
///
/// Accepted only while grounded and not already jumping. An accepted jump
/// applies `impulse`, sets `jumping`, clears `grounded` and plays the jump
/// sound. Returns whether the jump happened.
pub fn jump<P, A>(
    state: &mut PlayerState,
    engine: &mut P,
    audio: &mut A,
    body: BodyId,
    impulse: Vec2,
) -> bool
where
    P: PhysicsPort + ?Sized,
    A: AudioSink + ?Sized,
{
    if !state.can_jump() {
        debug!(grounded = state.grounded, jumping = state.jumping, "jump rejected");
        return false;
    }
    engine.apply_impulse(body, impulse);
    state.jumping = true;
    state.grounded = false;
    audio.play_sound(SoundKind::Jump);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BodyDesc, RecordingAudio};
    use crate::world::HeadlessWorld;

    mod state_tests {
        use super::*;

        #[test]
        fn initial_state() {
            let p = PlayerState::new();
            assert_eq!(p.health(), 100);
            assert_eq!(p.score(), 0);
            assert!(!p.grounded);
            assert!(!p.jumping);
            assert_eq!(p, PlayerState::default());
        }

        #[test]
        fn damage_saturates_at_zero() {
            let mut p = PlayerState::new();
            p.take_damage(90);
            assert!(p.take_damage(25));
            assert_eq!(p.health(), 0);
        }

        #[test]
        fn death_reported_once() {
            let mut p = PlayerState::new();
            let deaths = (0..10).filter(|_| p.take_damage(25)).count();
            assert_eq!(deaths, 1);
            assert!(p.is_dead());
        }

        #[test]
        fn landing_clears_jump() {
            let mut p = PlayerState::new();
            p.jumping = true;
            p.land();
            assert!(p.grounded);
            assert!(!p.jumping);
            assert!(p.can_jump());
        }

        #[test]
        fn reset_restores_initial() {
            let mut p = PlayerState::new();
            p.take_damage(50);
            p.add_score(30);
            p.land();
            p.reset();
            assert_eq!(p, PlayerState::new());
        }
    }

    mod control_tests {
        use super::*;

        fn setup() -> (HeadlessWorld, BodyId) {
            let mut world = HeadlessWorld::new();
            let body = world.spawn(BodyDesc::dynamic(Vec2::new(4.0, -5.0), Vec2::splat(0.25)));
            world.set_linear_velocity(body, Vec2::new(0.0, -3.0));
            (world, body)
        }

        #[test]
        fn steering_keeps_vertical_velocity() {
            let (mut world, body) = setup();
            steer(&mut world, body, Steer::Left, 10.0);
            assert_eq!(world.linear_velocity(body), Some(Vec2::new(-10.0, -3.0)));
            steer(&mut world, body, Steer::Right, 10.0);
            assert_eq!(world.linear_velocity(body), Some(Vec2::new(10.0, -3.0)));
            steer(&mut world, body, Steer::Stop, 10.0);
            assert_eq!(world.linear_velocity(body), Some(Vec2::new(0.0, -3.0)));
        }

        #[test]
        fn jump_requires_ground() {
            let (mut world, body) = setup();
            let mut audio = RecordingAudio::new();
            let mut p = PlayerState::new();

            assert!(!jump(&mut p, &mut world, &mut audio, body, Vec2::new(0.0, 3.0)));
            assert!(audio.played().is_empty());

            p.land();
            assert!(jump(&mut p, &mut world, &mut audio, body, Vec2::new(0.0, 3.0)));
            assert!(p.jumping);
            assert!(!p.grounded);
            assert_eq!(audio.played(), &[SoundKind::Jump]);

            // 0.5 x 0.5 box: mass 0.25, impulse 3 -> +12 y-velocity
            assert_eq!(world.linear_velocity(body), Some(Vec2::new(0.0, 9.0)));
        }

        #[test]
        fn no_double_jump() {
            let (mut world, body) = setup();
            let mut audio = RecordingAudio::new();
            let mut p = PlayerState::new();
            p.land();
            assert!(jump(&mut p, &mut world, &mut audio, body, Vec2::new(0.0, 3.0)));
            assert!(!jump(&mut p, &mut world, &mut audio, body, Vec2::new(0.0, 3.0)));
            assert_eq!(audio.played().len(), 1);
        }
    }
}
