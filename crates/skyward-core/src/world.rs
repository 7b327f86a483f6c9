//! In-memory reference engine.
//!
//! [`HeadlessWorld`] implements [`PhysicsPort`] without any rendering and
//! without contact resolution. It exists so the gameplay core can be driven
//! by tests, benches and the headless runner.
//!
//! # Behavior
//!
//! - Bodies live in a `BTreeMap` keyed by [`BodyId`], so every iteration is
//!   in ascending id order.
//! - `step(dt)` integrates `velocity += gravity * dt` for dynamic bodies and
//!   `position += velocity * dt` for dynamic and kinematic bodies.
//! - Contact-begin pairs are detected by axis-aligned box overlap between
//!   collidable bodies where at least one side is dynamic. A pair is reported
//!   once when it starts overlapping, and again only after it separated.
//! - Bodies never push each other apart. Hosts that need real physics plug
//!   in their own engine.
//! - Tests can inject contacts with [`HeadlessWorld::inject_contact`]; they
//!   are reported by the next `step`.
//!
//! # Example
//!
//! ```
//! use skyward_core::engine::{BodyDesc, PhysicsPort};
//! use skyward_core::world::HeadlessWorld;
//! use glam::Vec2;
//!
//! let mut world = HeadlessWorld::new();
//! let ground = world.spawn(BodyDesc::fixed(Vec2::new(0.0, -1.0), Vec2::new(5.0, 0.5)));
//! let ball = world.spawn(BodyDesc::dynamic(Vec2::new(0.0, -0.6), Vec2::splat(0.25)));
//!
//! let contacts = world.step(1.0 / 60.0);
//! assert_eq!(contacts.len(), 1);
//! assert!(world.position(ball).is_some());
//! assert!(world.contains(ground));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::{BodyDesc, BodyFlags, Contact, PhysicsPort, Visual};
use crate::entity::BodyId;

/// State of a single body in the headless world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    /// Centre position.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Half width and half height.
    pub half_extents: Vec2,
    /// Creation flags.
    pub flags: BodyFlags,
    /// Whether the collision fixture is enabled.
    pub collidable: bool,
    /// Images currently attached.
    pub visuals: Vec<Visual>,
}

impl BodyRecord {
    fn from_desc(desc: BodyDesc) -> Self {
        Self {
            position: desc.position,
            velocity: Vec2::ZERO,
            half_extents: desc.half_extents,
            flags: desc.flags,
            collidable: desc.flags.contains(BodyFlags::SOLID),
            visuals: desc.visual.into_iter().collect(),
        }
    }

    /// Mass of the body at unit density.
    #[must_use]
    pub fn mass(&self) -> f32 {
        (4.0 * self.half_extents.x * self.half_extents.y).max(f32::EPSILON)
    }

    fn overlaps(&self, other: &Self) -> bool {
        let delta = (self.position - other.position).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x < reach.x && delta.y < reach.y
    }

    fn is_dynamic(&self) -> bool {
        self.flags.contains(BodyFlags::DYNAMIC)
    }
}

/// Reference engine used for tests and headless runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadlessWorld {
    next_id: u64,
    bodies: BTreeMap<BodyId, BodyRecord>,
    gravity: Vec2,
    touching: BTreeSet<(BodyId, BodyId)>,
    injected: Vec<Contact>,
    steps: u64,
}

impl HeadlessWorld {
    /// Creates an empty world without gravity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world with the given gravity.
    #[must_use]
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Looks up a body record.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&BodyRecord> {
        self.bodies.get(&id)
    }

    /// Returns `true` if the body exists.
    #[must_use]
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Number of live bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the world has no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Live body ids in ascending order.
    pub fn body_ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.keys().copied()
    }

    /// Number of completed steps.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Queues a contact to be reported by the next step.
    pub fn inject_contact(&mut self, a: BodyId, b: BodyId) {
        self.injected.push(Contact::new(a, b));
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            if body.is_dynamic() {
                body.velocity += gravity * dt;
            }
            if body.is_dynamic() || body.flags.contains(BodyFlags::KINEMATIC) {
                body.position += body.velocity * dt;
            }
        }
    }

    fn detect_contacts(&mut self) -> Vec<Contact> {
        let bodies: Vec<(BodyId, &BodyRecord)> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.collidable)
            .map(|(id, b)| (*id, b))
            .collect();

        let mut now_touching = BTreeSet::new();
        for (i, (id_a, a)) in bodies.iter().enumerate() {
            for (id_b, b) in &bodies[i + 1..] {
                if (a.is_dynamic() || b.is_dynamic()) && a.overlaps(b) {
                    now_touching.insert((*id_a, *id_b));
                }
            }
        }

        let began = now_touching
            .difference(&self.touching)
            .map(|(a, b)| Contact::new(*a, *b))
            .collect();
        self.touching = now_touching;
        began
    }
}

impl PhysicsPort for HeadlessWorld {
    fn spawn(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, BodyRecord::from_desc(desc));
        id
    }

    fn destroy(&mut self, body: BodyId) {
        self.bodies.remove(&body);
        self.touching.retain(|(a, b)| *a != body && *b != body);
        self.injected.retain(|c| c.a != body && c.b != body);
    }

    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn set_position(&mut self, body: BodyId, position: Vec2) {
        if let Some(record) = self.bodies.get_mut(&body) {
            record.position = position;
        }
    }

    fn linear_velocity(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(record) = self.bodies.get_mut(&body) {
            record.velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) {
        if let Some(record) = self.bodies.get_mut(&body) {
            if record.is_dynamic() {
                record.velocity += impulse / record.mass();
            }
        }
    }

    fn set_collidable(&mut self, body: BodyId, collidable: bool) {
        if let Some(record) = self.bodies.get_mut(&body) {
            record.collidable = collidable;
        }
    }

    fn attach_visual(&mut self, body: BodyId, visual: Visual) {
        if let Some(record) = self.bodies.get_mut(&body) {
            record.visuals.push(visual);
        }
    }

    fn detach_all_visuals(&mut self, body: BodyId) {
        if let Some(record) = self.bodies.get_mut(&body) {
            record.visuals.clear();
        }
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.integrate(dt);
        let mut contacts = std::mem::take(&mut self.injected);
        contacts.extend(self.detect_contacts());
        self.steps += 1;
        contacts
    }
}
