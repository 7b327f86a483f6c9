//! Levels: population, lifecycle and per-tick behavior dispatch.
//!
//! A [`Level`] is spawned from a [`LevelBlueprint`] and owns everything it
//! spawned: the player body, platforms, enemies, hazards and its
//! [`CollectibleManager`]. The engine owns the bodies themselves; the level
//! records which [`EntityKind`] each body is and which behavior drives it.
//!
//! # Lifecycle
//!
//! ```text
//! spawn ──► start ──► tick* ──► stop ──► teardown
//! ```
//!
//! - `start` registers every behavior-bearing body with the level's
//!   [`TickSchedule`]. A second call is ignored.
//! - `tick` runs behaviors in ascending body-id order. Behaviors that ask to
//!   be destroyed are queued and only removed by `flush`.
//! - `stop` drops every registration; later ticks do nothing.
//! - `teardown` destroys every body the level still owns.
//!
//! # Example
//!
//! ```
//! use skyward_core::config::Tuning;
//! use skyward_core::level::{Level, LevelBlueprint, LevelId, LevelLayout};
//! use skyward_core::world::HeadlessWorld;
//!
//! let tuning = Tuning::default();
//! let blueprint =
//!     LevelBlueprint::from_layout(LevelId::One, &LevelLayout::builtin(LevelId::One), &tuning)
//!         .unwrap();
//!
//! let mut world = HeadlessWorld::new();
//! let mut level = Level::spawn(&blueprint, 1, &mut world);
//! level.start();
//! assert!(level.is_running());
//!
//! level.stop();
//! level.teardown(&mut world);
//! assert!(world.is_empty());
//! ```

pub mod collectibles;
pub mod layout;
pub mod schedule;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::behavior::{EntityBehavior, TickContext, TickOutcome};
use crate::engine::PhysicsPort;
use crate::entity::{BodyId, EntityKind};

pub use collectibles::{CollectibleManager, COLLECTIBLE_HALF_EXTENTS};
pub use layout::{
    BlueprintBody, BoxSpec, LevelBlueprint, LevelLayout, LevelSet, MoverSpec, PatrolSpec,
    ACTOR_HALF_EXTENTS,
};
pub use schedule::TickSchedule;

// =============================================================================
// LevelId
// =============================================================================

/// Identity of one of the three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelId {
    /// First level.
    One,
    /// Second level.
    Two,
    /// Final level.
    Three,
}

impl LevelId {
    /// Every level in play order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// One-based level number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// The level that follows, or `None` after the final level.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}

// =============================================================================
// Level
// =============================================================================

/// A body owned by the level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEntity {
    /// Gameplay classification.
    pub kind: EntityKind,
    /// Behavior run every tick, if any.
    pub behavior: Option<EntityBehavior>,
}

/// A populated level.
#[derive(Debug)]
pub struct Level {
    id: LevelId,
    instance: u64,
    player: BodyId,
    entities: BTreeMap<BodyId, LevelEntity>,
    collectibles: CollectibleManager,
    schedule: TickSchedule,
    started: bool,
    stopped: bool,
}

impl Level {
    /// Spawns every body of `blueprint` into `engine`.
    ///
    /// `instance` distinguishes successive constructions of the same level.
    pub fn spawn<P: PhysicsPort + ?Sized>(
        blueprint: &LevelBlueprint,
        instance: u64,
        engine: &mut P,
    ) -> Self {
        let player = engine.spawn(blueprint.player().clone());

        let mut entities = BTreeMap::new();
        entities.insert(
            player,
            LevelEntity {
                kind: EntityKind::Player,
                behavior: None,
            },
        );
        for body in blueprint.bodies() {
            let id = engine.spawn(body.desc.clone());
            entities.insert(
                id,
                LevelEntity {
                    kind: body.kind,
                    behavior: body.behavior.clone(),
                },
            );
        }

        let mut collectibles = CollectibleManager::new();
        for &position in blueprint.collectibles() {
            collectibles.spawn(engine, position);
        }

        debug!(
            level = %blueprint.id(),
            instance,
            bodies = entities.len(),
            collectibles = collectibles.len(),
            "level populated"
        );

        Self {
            id: blueprint.id(),
            instance,
            player,
            entities,
            collectibles,
            schedule: TickSchedule::new(),
            started: false,
            stopped: false,
        }
    }

    /// Registers every behavior with the tick schedule.
    ///
    /// Only the first call has an effect; a stopped level cannot restart.
    pub fn start(&mut self) {
        if self.started {
            warn!(level = %self.id, instance = self.instance, "level already started");
            return;
        }
        self.started = true;
        for (&id, entity) in &self.entities {
            if entity.behavior.is_some() {
                self.schedule.register(id);
            }
        }
        info!(
            level = %self.id,
            instance = self.instance,
            behaviors = self.schedule.len(),
            "level started"
        );
    }

    /// Unregisters every behavior. No behavior runs after this call.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.schedule.clear();
        info!(level = %self.id, instance = self.instance, "level stopped");
    }

    /// Returns `true` between `start` and `stop`.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started && !self.stopped
    }

    /// Runs every scheduled behavior once.
    ///
    /// Behaviors that finish are queued for removal; call
    /// [`flush`](Self::flush) at the end of the tick.
    pub fn tick<P: PhysicsPort + ?Sized>(&mut self, ctx: &TickContext, engine: &mut P) {
        if !self.is_running() {
            return;
        }
        let order: Vec<BodyId> = self.schedule.active().collect();
        for id in order {
            if !self.schedule.is_active(id) {
                continue;
            }
            let Some(behavior) = self
                .entities
                .get_mut(&id)
                .and_then(|e| e.behavior.as_mut())
            else {
                continue;
            };
            if behavior.tick(id, ctx, engine) == TickOutcome::Destroy {
                self.schedule.unregister(id);
            }
        }
    }

    /// Destroys the bodies whose behaviors finished this tick and returns
    /// them in the order they finished.
    pub fn flush<P: PhysicsPort + ?Sized>(&mut self, engine: &mut P) -> Vec<BodyId> {
        let removed = self.schedule.flush();
        for &id in &removed {
            if let Some(entity) = self.entities.remove(&id) {
                debug!(body = %id, kind = %entity.kind, "entity removed");
            }
            engine.destroy(id);
        }
        removed
    }

    /// Destroys every body the level still owns.
    pub fn teardown<P: PhysicsPort + ?Sized>(mut self, engine: &mut P) {
        self.schedule.clear();
        for id in std::mem::take(&mut self.entities).into_keys() {
            engine.destroy(id);
        }
        self.collectibles.clear(engine);
        debug!(level = %self.id, instance = self.instance, "level torn down");
    }

    /// Kind of a body, or `None` if the level does not own it.
    #[must_use]
    pub fn kind_of(&self, body: BodyId) -> Option<EntityKind> {
        if let Some(entity) = self.entities.get(&body) {
            Some(entity.kind)
        } else if self.collectibles.contains(body) {
            Some(EntityKind::Collectible)
        } else {
            None
        }
    }

    /// Returns `false` only for a disappearing platform in a hidden phase.
    #[must_use]
    pub fn is_solid(&self, body: BodyId) -> bool {
        self.entities
            .get(&body)
            .and_then(|e| e.behavior.as_ref())
            .and_then(EntityBehavior::as_hazard)
            .map_or(true, |h| h.is_visible())
    }

    /// Arms a disappearing platform. Returns `true` only on the first arming.
    pub fn arm_hazard(&mut self, body: BodyId) -> bool {
        let armed = self
            .entities
            .get_mut(&body)
            .and_then(|e| e.behavior.as_mut())
            .and_then(EntityBehavior::as_hazard_mut)
            .is_some_and(|h| h.arm());
        if armed {
            debug!(body = %body, "hazard armed");
        }
        armed
    }

    /// Which level this is.
    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Construction counter value for this instance.
    #[must_use]
    pub const fn instance(&self) -> u64 {
        self.instance
    }

    /// The player body.
    #[must_use]
    pub const fn player(&self) -> BodyId {
        self.player
    }

    /// Entity record of a body.
    #[must_use]
    pub fn entity(&self, body: BodyId) -> Option<&LevelEntity> {
        self.entities.get(&body)
    }

    /// Bodies of a given kind, in ascending id order.
    pub fn bodies_of(&self, kind: EntityKind) -> impl Iterator<Item = BodyId> + '_ {
        self.entities
            .iter()
            .filter(move |(_, e)| e.kind == kind)
            .map(|(id, _)| *id)
    }

    /// The level's collectibles.
    #[must_use]
    pub const fn collectibles(&self) -> &CollectibleManager {
        &self.collectibles
    }

    /// Mutable access to the level's collectibles.
    pub fn collectibles_mut(&mut self) -> &mut CollectibleManager {
        &mut self.collectibles
    }

    /// The tick schedule.
    #[must_use]
    pub const fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::world::HeadlessWorld;
    use glam::Vec2;

    fn blueprint(id: LevelId) -> LevelBlueprint {
        LevelBlueprint::from_layout(id, &LevelLayout::builtin(id), &Tuning::default()).unwrap()
    }

    fn ctx() -> TickContext {
        TickContext {
            tick: 0,
            player_position: None,
        }
    }

    mod level_id_tests {
        use super::*;

        #[test]
        fn sequence() {
            assert_eq!(LevelId::One.next(), Some(LevelId::Two));
            assert_eq!(LevelId::Two.next(), Some(LevelId::Three));
            assert_eq!(LevelId::Three.next(), None);
            assert_eq!(LevelId::Three.to_string(), "Level 3");
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn spawn_populates_engine() {
            let mut world = HeadlessWorld::new();
            let level = Level::spawn(&blueprint(LevelId::One), 1, &mut world);

            // player + 9 platforms + 2 walls + 1 chaser + 5 collectibles
            assert_eq!(world.body_count(), 18);
            assert_eq!(level.kind_of(level.player()), Some(EntityKind::Player));
            assert_eq!(level.collectibles().len(), 5);
            assert_eq!(level.bodies_of(EntityKind::Chaser).count(), 1);
            assert!(!level.is_running());
        }

        #[test]
        fn start_registers_behaviors_once() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Two), 1, &mut world);
            level.start();
            // chaser + 2 patrollers + 2 moving platforms
            assert_eq!(level.schedule().len(), 5);
            level.start();
            assert_eq!(level.schedule().len(), 5);
        }

        #[test]
        fn stopped_level_does_not_tick() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Two), 1, &mut world);
            level.start();
            level.stop();

            let patroller = level.bodies_of(EntityKind::Patroller).next().unwrap();
            level.tick(&ctx(), &mut world);
            assert_eq!(world.linear_velocity(patroller), Some(Vec2::ZERO));
            assert!(level.schedule().is_empty());
        }

        #[test]
        fn unstarted_level_does_not_tick() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Two), 1, &mut world);
            let patroller = level.bodies_of(EntityKind::Patroller).next().unwrap();
            level.tick(&ctx(), &mut world);
            assert_eq!(world.linear_velocity(patroller), Some(Vec2::ZERO));
        }

        #[test]
        fn running_level_drives_behaviors() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Two), 1, &mut world);
            level.start();
            level.tick(&ctx(), &mut world);
            for patroller in level.bodies_of(EntityKind::Patroller) {
                assert_eq!(world.linear_velocity(patroller).unwrap().x, 5.0);
            }
        }

        #[test]
        fn teardown_destroys_everything() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Three), 1, &mut world);
            level.start();
            level.stop();
            level.teardown(&mut world);
            assert!(world.is_empty());
        }
    }

    mod hazard_tests {
        use super::*;

        #[test]
        fn hazard_arms_once_and_is_flushed_after_lifetime() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Three), 1, &mut world);
            level.start();
            let hazard = level.bodies_of(EntityKind::DisappearingPlatform).next().unwrap();

            assert!(level.arm_hazard(hazard));
            assert!(!level.arm_hazard(hazard));

            for _ in 0..89 {
                level.tick(&ctx(), &mut world);
                assert!(level.flush(&mut world).is_empty());
            }
            level.tick(&ctx(), &mut world);
            assert_eq!(level.flush(&mut world), vec![hazard]);
            assert!(!world.contains(hazard));
            assert_eq!(level.kind_of(hazard), None);
            assert!(!level.arm_hazard(hazard));
        }

        #[test]
        fn hidden_hazard_is_not_solid() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::Three), 1, &mut world);
            level.start();
            let hazard = level.bodies_of(EntityKind::DisappearingPlatform).next().unwrap();
            assert!(level.is_solid(hazard));

            level.arm_hazard(hazard);
            for _ in 0..10 {
                level.tick(&ctx(), &mut world);
            }
            assert!(!level.is_solid(hazard));
        }

        #[test]
        fn only_hazards_can_be_armed() {
            let mut world = HeadlessWorld::new();
            let mut level = Level::spawn(&blueprint(LevelId::One), 1, &mut world);
            let player = level.player();
            assert!(!level.arm_hazard(player));
            assert!(level.is_solid(player));
        }
    }
}
