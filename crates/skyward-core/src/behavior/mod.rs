//! Per-entity behaviors driven by the fixed simulation tick.
//!
//! Each behavior is a small state machine that mutates exactly one body
//! through the [`PhysicsPort`] and its own state, once per tick:
//!
//! - [`patrol`]: walks between two limits
//! - [`oscillate`]: shuttles a platform between two points
//! - [`hazard`]: flickers a touched platform and then removes it
//! - [`chase`]: follows the player along the x axis
//!
//! # Dispatch
//!
//! [`EntityBehavior`] is a closed sum type over the four behaviors. The level
//! calls [`EntityBehavior::tick`] for every registered entity; a behavior
//! never touches another entity's state.
//!
//! # Example
//!
//! ```
//! use skyward_core::behavior::{EntityBehavior, TickContext, TickOutcome};
//! use skyward_core::engine::{BodyDesc, PhysicsPort};
//! use skyward_core::entity::PatrolState;
//! use skyward_core::world::HeadlessWorld;
//! use glam::Vec2;
//!
//! let mut world = HeadlessWorld::new();
//! let body = world.spawn(BodyDesc::dynamic(Vec2::new(0.0, 26.0), Vec2::splat(0.25)));
//!
//! let mut behavior = EntityBehavior::Patroller(PatrolState::new(-2.0, 2.0, 5.0).unwrap());
//! let ctx = TickContext { tick: 0, player_position: None };
//!
//! assert_eq!(behavior.tick(body, &ctx, &mut world), TickOutcome::Continue);
//! assert_eq!(world.linear_velocity(body), Some(Vec2::new(5.0, 0.0)));
//! ```

pub mod chase;
pub mod hazard;
pub mod oscillate;
pub mod patrol;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::PhysicsPort;
use crate::entity::{
    BodyId, ChaseState, EntityKind, HazardState, OscillationState, PatrolState,
};

/// Read-only information shared by every behavior during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Index of the current tick within the level.
    pub tick: u64,
    /// Player position sampled at the start of the tick.
    pub player_position: Option<Vec2>,
}

/// What the scheduler should do with an entity after its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// Remove the entity from the level once the tick completes.
    Destroy,
}

/// Behavior attached to a level entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityBehavior {
    /// Patrolling enemy.
    Patroller(PatrolState),
    /// Moving platform.
    OscillatingPlatform(OscillationState),
    /// Disappearing platform.
    DisappearingHazard(HazardState),
    /// Chasing enemy.
    Chaser(ChaseState),
}

impl EntityBehavior {
    /// The entity kind this behavior belongs to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Patroller(_) => EntityKind::Patroller,
            Self::OscillatingPlatform(_) => EntityKind::MovingPlatform,
            Self::DisappearingHazard(_) => EntityKind::DisappearingPlatform,
            Self::Chaser(_) => EntityKind::Chaser,
        }
    }

    /// Runs the behavior for one tick against `body`.
    pub fn tick<P: PhysicsPort + ?Sized>(
        &mut self,
        body: BodyId,
        ctx: &TickContext,
        engine: &mut P,
    ) -> TickOutcome {
        match self {
            Self::Patroller(state) => patrol::tick(state, body, engine),
            Self::OscillatingPlatform(state) => oscillate::tick(state, body, engine),
            Self::DisappearingHazard(state) => hazard::tick(state, body, engine),
            Self::Chaser(state) => chase::tick(state, body, ctx, engine),
        }
    }

    /// Hazard state, if this is a disappearing platform.
    #[must_use]
    pub const fn as_hazard(&self) -> Option<&HazardState> {
        match self {
            Self::DisappearingHazard(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable hazard state, if this is a disappearing platform.
    #[must_use]
    pub fn as_hazard_mut(&mut self) -> Option<&mut HazardState> {
        match self {
            Self::DisappearingHazard(state) => Some(state),
            _ => None,
        }
    }

    /// Patrol state, if this is a patrolling enemy.
    #[must_use]
    pub const fn as_patrol(&self) -> Option<&PatrolState> {
        match self {
            Self::Patroller(state) => Some(state),
            _ => None,
        }
    }

    /// Oscillation state, if this is a moving platform.
    #[must_use]
    pub const fn as_oscillation(&self) -> Option<&OscillationState> {
        match self {
            Self::OscillatingPlatform(state) => Some(state),
            _ => None,
        }
    }
}
