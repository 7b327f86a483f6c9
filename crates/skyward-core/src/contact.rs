//! Contact rule table.
//!
//! A contact-begin pair reported by the engine is dispatched twice, once in
//! each orientation. For every orientation [`classify`] maps the
//! `(subject, other)` kind pair to exactly one [`ContactRule`]:
//!
//! | Subject | Other | Rule |
//! |---|---|---|
//! | Player | Chaser / Patroller | [`ContactRule::Damage`] |
//! | Player | Collectible | [`ContactRule::Pickup`] |
//! | Player | Platform / MovingPlatform / solid DisappearingPlatform | [`ContactRule::Ground`] |
//! | DisappearingPlatform | any dynamic kind except Collectible | [`ContactRule::ArmHazard`] |
//! | anything else | | [`ContactRule::Ignore`] |
//!
//! Kinds are mutually exclusive, so the table never has to break ties
//! between overlapping rules.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Effect of one oriented contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactRule {
    /// Hurt the player and knock it upwards.
    Damage,
    /// Award score and retire the collectible.
    Pickup,
    /// Mark the player as grounded.
    Ground,
    /// Arm the disappearing platform that is the subject.
    ArmHazard,
    /// No effect.
    Ignore,
}

/// Looks up the rule for `subject` touching `other`.
///
/// `other_solid` is `false` for a disappearing platform in its hidden flicker
/// phase; landing on it does not ground the player.
#[must_use]
pub const fn classify(subject: EntityKind, other: EntityKind, other_solid: bool) -> ContactRule {
    match subject {
        EntityKind::Player => {
            if other.is_enemy() {
                ContactRule::Damage
            } else if matches!(other, EntityKind::Collectible) {
                ContactRule::Pickup
            } else if other.is_platform_like() && other_solid {
                ContactRule::Ground
            } else {
                ContactRule::Ignore
            }
        }
        EntityKind::DisappearingPlatform if other.arms_hazards() => ContactRule::ArmHazard,
        _ => ContactRule::Ignore,
    }
}

/// Velocity after an enemy hit: horizontal unchanged, vertical bumped.
#[must_use]
pub fn knockback(velocity: Vec2, bump: f32) -> Vec2 {
    Vec2::new(velocity.x, velocity.y + bump)
}
