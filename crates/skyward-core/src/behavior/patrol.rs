//! Patrolling enemy: walks between two horizontal limits.

use glam::Vec2;

use crate::engine::PhysicsPort;
use crate::entity::{BodyId, PatrolState};

use super::TickOutcome;

/// Updates the walking direction for horizontal position `x` and returns the
/// horizontal velocity to apply.
///
/// The direction flips when `x` reaches the limit it is walking towards
/// (boundary inclusive). The returned velocity always matches the updated
/// direction.
pub fn steer(state: &mut PatrolState, x: f32) -> f32 {
    if state.moving_right && x >= state.right_limit() {
        state.moving_right = false;
    } else if !state.moving_right && x <= state.left_limit() {
        state.moving_right = true;
    }

    if state.moving_right {
        state.speed()
    } else {
        -state.speed()
    }
}

/// Runs one patrol tick against the engine. Vertical velocity is preserved.
pub fn tick<P: PhysicsPort + ?Sized>(
    state: &mut PatrolState,
    body: BodyId,
    engine: &mut P,
) -> TickOutcome {
    let Some(position) = engine.position(body) else {
        return TickOutcome::Continue;
    };
    let vy = engine.linear_velocity(body).map_or(0.0, |v| v.y);
    let vx = steer(state, position.x);
    engine.set_linear_velocity(body, Vec2::new(vx, vy));
    TickOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BodyDesc;
    use crate::world::HeadlessWorld;
    use proptest::prelude::*;

    fn patrol() -> PatrolState {
        PatrolState::new(-2.0, 2.0, 5.0).unwrap()
    }

    #[test]
    fn walks_right_inside_limits() {
        let mut state = patrol();
        assert_eq!(steer(&mut state, 0.0), 5.0);
        assert!(state.moving_right);
    }

    #[test]
    fn flips_at_right_limit_inclusive() {
        let mut state = patrol();
        assert_eq!(steer(&mut state, 2.0), -5.0);
        assert!(!state.moving_right);
    }

    #[test]
    fn flips_at_left_limit_inclusive() {
        let mut state = patrol();
        state.moving_right = false;
        assert_eq!(steer(&mut state, -2.0), 5.0);
        assert!(state.moving_right);
    }

    #[test]
    fn does_not_flip_when_walking_away_from_limit() {
        let mut state = patrol();
        state.moving_right = false;
        assert_eq!(steer(&mut state, 3.0), -5.0);
        assert!(!state.moving_right);
    }

    #[test]
    fn degenerate_limits_turn_every_tick() {
        let mut state = PatrolState::new(1.0, 1.0, 5.0).unwrap();
        assert_eq!(steer(&mut state, 1.0), -5.0);
        assert_eq!(steer(&mut state, 1.0), 5.0);
        assert_eq!(steer(&mut state, 1.0), -5.0);
    }

    #[test]
    fn tick_preserves_vertical_velocity() {
        let mut world = HeadlessWorld::new();
        let body = world.spawn(BodyDesc::dynamic(Vec2::ZERO, Vec2::splat(0.25)));
        world.set_linear_velocity(body, Vec2::new(0.0, -3.0));

        let mut state = patrol();
        tick(&mut state, body, &mut world);
        assert_eq!(world.linear_velocity(body), Some(Vec2::new(5.0, -3.0)));
    }

    #[test]
    fn tick_on_missing_body_is_noop() {
        let mut world = HeadlessWorld::new();
        let mut state = patrol();
        let outcome = tick(&mut state, BodyId::new(99), &mut world);
        assert_eq!(outcome, TickOutcome::Continue);
        assert!(state.moving_right);
    }

    proptest! {
        #[test]
        fn velocity_sign_matches_direction(
            left in -50.0f32..50.0,
            width in 0.0f32..20.0,
            xs in prop::collection::vec(-100.0f32..100.0, 1..40),
        ) {
            let mut state = PatrolState::new(left, left + width, 5.0).unwrap();
            for x in xs {
                let before = state.moving_right;
                let vx = steer(&mut state, x);
                prop_assert_eq!(vx > 0.0, state.moving_right);

                let crossed = if before {
                    x >= state.right_limit()
                } else {
                    x <= state.left_limit()
                };
                prop_assert_eq!(before != state.moving_right, crossed);
            }
        }

        #[test]
        fn steering_is_deterministic(x in -100.0f32..100.0, moving_right: bool) {
            let mut a = patrol();
            a.moving_right = moving_right;
            let mut b = a.clone();
            prop_assert_eq!(steer(&mut a, x), steer(&mut b, x));
            prop_assert_eq!(a, b);
        }
    }
}
