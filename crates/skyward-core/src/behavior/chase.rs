//! Chasing enemy: follows the player along the x axis.

use glam::Vec2;

use crate::engine::PhysicsPort;
use crate::entity::{BodyId, ChaseState};

use super::{TickContext, TickOutcome};

/// Velocity that moves `enemy` horizontally towards `player` at `speed`,
/// keeping the vertical component of `current`.
///
/// When both share the same x the horizontal component is zero.
#[must_use]
pub fn chase_velocity(enemy: Vec2, player: Vec2, current: Vec2, speed: f32) -> Vec2 {
    let direction = Vec2::new(player.x - enemy.x, 0.0).normalize_or_zero();
    Vec2::new(direction.x * speed, current.y)
}

/// Runs one chase tick. Does nothing while the player position is unknown.
pub fn tick<P: PhysicsPort + ?Sized>(
    state: &ChaseState,
    body: BodyId,
    ctx: &TickContext,
    engine: &mut P,
) -> TickOutcome {
    let (Some(player), Some(enemy), Some(current)) = (
        ctx.player_position,
        engine.position(body),
        engine.linear_velocity(body),
    ) else {
        return TickOutcome::Continue;
    };
    engine.set_linear_velocity(body, chase_velocity(enemy, player, current, state.speed()));
    TickOutcome::Continue
}
