//! Collectible ownership for a level.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::engine::{BodyDesc, PhysicsPort, Visual};
use crate::entity::BodyId;

/// Half extents of a collectible box.
pub const COLLECTIBLE_HALF_EXTENTS: Vec2 = Vec2::splat(0.5);

/// Owns the collectibles of one level.
///
/// [`CollectibleManager::remove`] is the only way to retire a collectible:
/// it unregisters the id and destroys the body in one step, so the set never
/// names a destroyed body.
#[derive(Debug, Clone, Default)]
pub struct CollectibleManager {
    live: BTreeSet<BodyId>,
}

impl CollectibleManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a collectible at `position` and starts tracking it.
    pub fn spawn<P: PhysicsPort + ?Sized>(&mut self, engine: &mut P, position: Vec2) -> BodyId {
        let body = engine.spawn(
            BodyDesc::dynamic(position, COLLECTIBLE_HALF_EXTENTS).with_visual(Visual::Collectible),
        );
        self.live.insert(body);
        body
    }

    /// Retires a collectible. Returns `false` if it was not tracked, in which
    /// case the engine is not touched.
    pub fn remove<P: PhysicsPort + ?Sized>(&mut self, engine: &mut P, body: BodyId) -> bool {
        if self.live.remove(&body) {
            engine.destroy(body);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the collectible is still in play.
    #[must_use]
    pub fn contains(&self, body: BodyId) -> bool {
        self.live.contains(&body)
    }

    /// Collectibles still in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if every collectible has been picked up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live collectible ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.live.iter().copied()
    }

    /// Destroys every remaining collectible.
    pub fn clear<P: PhysicsPort + ?Sized>(&mut self, engine: &mut P) {
        for body in std::mem::take(&mut self.live) {
            engine.destroy(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::HeadlessWorld;

    #[test]
    fn spawn_tracks_and_creates_body() {
        let mut world = HeadlessWorld::new();
        let mut manager = CollectibleManager::new();
        let coin = manager.spawn(&mut world, Vec2::new(5.0, 4.0));

        assert!(manager.contains(coin));
        assert_eq!(world.position(coin), Some(Vec2::new(5.0, 4.0)));
        assert_eq!(world.body(coin).unwrap().visuals, vec![Visual::Collectible]);
    }

    #[test]
    fn second_remove_is_noop() {
        let mut world = HeadlessWorld::new();
        let mut manager = CollectibleManager::new();
        let coin = manager.spawn(&mut world, Vec2::ZERO);
        let other = manager.spawn(&mut world, Vec2::X);

        assert!(manager.remove(&mut world, coin));
        assert!(!manager.contains(coin));
        assert!(!world.contains(coin));

        assert!(!manager.remove(&mut world, coin));
        assert_eq!(manager.len(), 1);
        assert!(world.contains(other));
    }

    #[test]
    fn unknown_body_is_not_destroyed() {
        let mut world = HeadlessWorld::new();
        let platform = world.spawn(BodyDesc::fixed(Vec2::ZERO, Vec2::ONE));
        let mut manager = CollectibleManager::new();

        assert!(!manager.remove(&mut world, platform));
        assert!(world.contains(platform));
    }

    #[test]
    fn clear_destroys_remaining() {
        let mut world = HeadlessWorld::new();
        let mut manager = CollectibleManager::new();
        manager.spawn(&mut world, Vec2::ZERO);
        manager.spawn(&mut world, Vec2::X);

        manager.clear(&mut world);
        assert!(manager.is_empty());
        assert!(world.is_empty());
    }
}
