//! Ports to the external physics/render engine and audio backend.
//!
//! The gameplay core never integrates bodies or resolves contacts itself. It
//! talks to an engine through [`PhysicsPort`]:
//!
//! - Bodies are created from a [`BodyDesc`] and referenced by
//!   [`BodyId`]. The engine owns them.
//! - Position and velocity are authoritative only between ticks; callers read
//!   them fresh every tick instead of caching.
//! - [`PhysicsPort::step`] advances the engine by one fixed step and reports
//!   the contact-begin pairs of that step.
//!
//! Sound effects go through the fire-and-forget [`AudioSink`] port. Playback
//! failures belong to the backend and are never surfaced to gameplay.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::BodyId;

bitflags! {
    /// Traits of a body handed to the engine at creation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BodyFlags: u8 {
        /// Simulated by the engine (gravity, impulses).
        const DYNAMIC = 1 << 0;
        /// Has a solid collision fixture.
        const SOLID = 1 << 1;
        /// Angular velocity is locked to zero.
        const FIXED_ROTATION = 1 << 2;
        /// Moved only by explicit position writes.
        const KINEMATIC = 1 << 3;
    }
}

/// Image attached to a body for rendering.
///
/// The mapping from visual to asset file is the renderer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visual {
    /// Player sprite.
    Player,
    /// Enemy sprite (chasers and patrollers).
    Enemy,
    /// Coin sprite.
    Collectible,
    /// Platform texture.
    Platform,
}

/// Everything the engine needs to create a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Initial centre position.
    pub position: Vec2,
    /// Half width and half height of the box shape.
    pub half_extents: Vec2,
    /// Body traits.
    pub flags: BodyFlags,
    /// Image attached at creation, if any.
    pub visual: Option<Visual>,
}

impl BodyDesc {
    /// A solid static box.
    #[must_use]
    pub fn fixed(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
            flags: BodyFlags::SOLID,
            visual: None,
        }
    }

    /// A solid box moved only through position writes.
    #[must_use]
    pub fn kinematic(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
            flags: BodyFlags::SOLID | BodyFlags::KINEMATIC,
            visual: None,
        }
    }

    /// A solid dynamic box.
    #[must_use]
    pub fn dynamic(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
            flags: BodyFlags::SOLID | BodyFlags::DYNAMIC,
            visual: None,
        }
    }

    /// Adds flags to the descriptor.
    #[must_use]
    pub fn with_flags(mut self, flags: BodyFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Attaches an image at creation.
    #[must_use]
    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }
}

/// Two bodies that began touching during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    /// First body of the pair.
    pub a: BodyId,
    /// Second body of the pair.
    pub b: BodyId,
}

impl Contact {
    /// Creates a contact pair.
    #[must_use]
    pub const fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }
}

/// The physics/render engine as seen by the gameplay core.
///
/// Getters return `None` for unknown or destroyed bodies; setters on such
/// bodies are silently ignored.
pub trait PhysicsPort {
    /// Creates a body and returns its handle.
    fn spawn(&mut self, desc: BodyDesc) -> BodyId;

    /// Removes a body from simulation and rendering.
    fn destroy(&mut self, body: BodyId);

    /// Current centre position.
    fn position(&self, body: BodyId) -> Option<Vec2>;

    /// Teleports a body.
    fn set_position(&mut self, body: BodyId, position: Vec2);

    /// Current linear velocity.
    fn linear_velocity(&self, body: BodyId) -> Option<Vec2>;

    /// Overwrites the linear velocity.
    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec2);

    /// Applies an impulse at the centre of mass.
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2);

    /// Enables or disables the collision fixture.
    fn set_collidable(&mut self, body: BodyId, collidable: bool);

    /// Attaches an image.
    fn attach_visual(&mut self, body: BodyId, visual: Visual);

    /// Removes every image from a body.
    fn detach_all_visuals(&mut self, body: BodyId);

    /// Advances one fixed step and returns the contacts that began in it.
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}

/// Sound effects the core can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// Successful jump.
    Jump,
    /// Player hurt by an enemy.
    Hurt,
    /// Collectible picked up.
    Collect,
}

/// Fire-and-forget audio playback.
pub trait AudioSink {
    /// Requests playback of a sound effect.
    fn play_sound(&mut self, sound: SoundKind);
}

/// Audio sink that discards every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sound(&mut self, sound: SoundKind) {
        tracing::trace!(?sound, "audio disabled, dropping sound");
    }
}

/// Audio sink that records every request, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    played: Vec<SoundKind>,
}

impl RecordingAudio {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds requested so far.
    #[must_use]
    pub fn played(&self) -> &[SoundKind] {
        &self.played
    }
}

impl AudioSink for RecordingAudio {
    fn play_sound(&mut self, sound: SoundKind) {
        self.played.push(sound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_constructors_set_flags() {
        let fixed = BodyDesc::fixed(Vec2::ZERO, Vec2::ONE);
        assert_eq!(fixed.flags, BodyFlags::SOLID);

        let moving = BodyDesc::kinematic(Vec2::ZERO, Vec2::ONE);
        assert!(moving.flags.contains(BodyFlags::KINEMATIC));
        assert!(!moving.flags.contains(BodyFlags::DYNAMIC));

        let player = BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE)
            .with_flags(BodyFlags::FIXED_ROTATION)
            .with_visual(Visual::Player);
        assert!(player.flags.contains(BodyFlags::DYNAMIC | BodyFlags::FIXED_ROTATION));
        assert_eq!(player.visual, Some(Visual::Player));
    }

    #[test]
    fn body_flags_serialization_roundtrip() {
        let flags = BodyFlags::SOLID | BodyFlags::DYNAMIC;
        let json = serde_json::to_string(&flags).unwrap();
        let back: BodyFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(flags, back);
    }

    #[test]
    fn recording_audio_keeps_order() {
        let mut audio = RecordingAudio::new();
        audio.play_sound(SoundKind::Jump);
        audio.play_sound(SoundKind::Collect);
        assert_eq!(audio.played(), &[SoundKind::Jump, SoundKind::Collect]);
    }

    #[test]
    fn ports_are_object_safe() {
        fn _accepts_physics(_port: &mut dyn PhysicsPort) {}
        fn _accepts_audio(_sink: Box<dyn AudioSink>) {}
    }
}
