//! Entity identity and classification.
//!
//! This module provides the core entity types for the gameplay core:
//! - [`BodyId`]: Opaque handle to a body owned by the physics engine
//! - [`EntityKind`]: Classification attached to every body at creation
//! - [`components`]: Per-behavior state structs
//!
//! # Kinds instead of type checks
//!
//! Every body a level spawns is recorded with an [`EntityKind`]. Contact
//! dispatch matches on kind pairs, so a collectible is never mistaken for an
//! enemy even though both are dynamic bodies.
//!
//! # Example
//!
//! ```
//! use skyward_core::entity::{BodyId, EntityKind};
//!
//! let id = BodyId::new(7);
//! assert_eq!(id.as_u64(), 7);
//!
//! assert!(EntityKind::Patroller.is_enemy());
//! assert!(EntityKind::Collectible.is_dynamic());
//! assert!(!EntityKind::Collectible.arms_hazards());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    ChaseState, HazardPhase, HazardState, HazardStep, OscillationState, PatrolState,
};

/// Handle to a body owned by the physics engine.
///
/// Behaviors and levels reference bodies through this handle and never own
/// them. Handles are ordered by their numeric value, which the level uses
/// for a stable tick order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(u64);

impl BodyId {
    /// Creates a handle from a raw engine value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw engine value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<BodyId> for u64 {
    fn from(id: BodyId) -> Self {
        id.0
    }
}

/// What a body is, as far as gameplay rules are concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled body.
    Player,
    /// Static ground, ledge or wall.
    Platform,
    /// Platform shuttling between two points.
    MovingPlatform,
    /// Platform that flickers and vanishes after being touched.
    DisappearingPlatform,
    /// Enemy that follows the player horizontally.
    Chaser,
    /// Enemy that walks back and forth between two limits.
    Patroller,
    /// Pickup that awards score.
    Collectible,
}

impl EntityKind {
    /// Returns `true` for bodies simulated as dynamic by the engine.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(
            self,
            Self::Player | Self::Chaser | Self::Patroller | Self::Collectible
        )
    }

    /// Returns `true` for kinds that hurt the player on contact.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Chaser | Self::Patroller)
    }

    /// Returns `true` for kinds the player can stand on.
    #[must_use]
    pub const fn is_platform_like(self) -> bool {
        matches!(
            self,
            Self::Platform | Self::MovingPlatform | Self::DisappearingPlatform
        )
    }

    /// Returns `true` for kinds whose touch arms a disappearing platform.
    ///
    /// Any dynamic body qualifies except collectibles.
    #[must_use]
    pub const fn arms_hazards(self) -> bool {
        self.is_dynamic() && !matches!(self, Self::Collectible)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "Player",
            Self::Platform => "Platform",
            Self::MovingPlatform => "MovingPlatform",
            Self::DisappearingPlatform => "DisappearingPlatform",
            Self::Chaser => "Chaser",
            Self::Patroller => "Patroller",
            Self::Collectible => "Collectible",
        };
        f.write_str(name)
    }
}
