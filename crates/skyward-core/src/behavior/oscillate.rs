//! Moving platform: shuttles between two points at a fixed speed.

use crate::engine::PhysicsPort;
use crate::entity::{BodyId, OscillationState};
use glam::Vec2;

use super::TickOutcome;

/// Computes the next position from `current`.
///
/// Returns `None` when the platform is within the arrival distance of its
/// target; the direction is flipped and the platform stays put for this
/// tick. Otherwise the platform moves towards the target by at most `speed`
/// and never past it.
pub fn advance(state: &mut OscillationState, current: Vec2) -> Option<Vec2> {
    let delta = state.target() - current;
    let distance = delta.length();
    if distance < state.epsilon() {
        state.forward = !state.forward;
        return None;
    }
    let step = distance.min(state.speed());
    Some(current + delta / distance * step)
}

/// Runs one oscillation tick against the engine.
pub fn tick<P: PhysicsPort + ?Sized>(
    state: &mut OscillationState,
    body: BodyId,
    engine: &mut P,
) -> TickOutcome {
    if let Some(current) = engine.position(body) {
        if let Some(next) = advance(state, current) {
            engine.set_position(body, next);
        }
    }
    TickOutcome::Continue
}
