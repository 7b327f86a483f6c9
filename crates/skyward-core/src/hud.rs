//! Read-only views for the presentation layer.
//!
//! Nothing here feeds back into gameplay. [`HudSnapshot`] carries what the
//! health bar and score line draw; [`CameraRig`] computes the view centre
//! that keeps the player vertically framed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MAX_HEALTH;
use crate::game::GamePhase;
use crate::level::LevelId;
use crate::player::PlayerState;

/// Everything the HUD draws for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Score.
    pub score: u32,
    /// Active level.
    pub level: LevelId,
    /// The win banner is shown.
    pub won: bool,
    /// The game-over prompt is shown.
    pub game_over: bool,
}

impl HudSnapshot {
    /// Builds a snapshot from the orchestrator state.
    #[must_use]
    pub fn capture(player: &PlayerState, level: LevelId, phase: GamePhase) -> Self {
        Self {
            health: player.health().min(MAX_HEALTH),
            max_health: MAX_HEALTH,
            score: player.score(),
            level,
            won: phase == GamePhase::Won,
            game_over: phase == GamePhase::GameOver,
        }
    }

    /// Filled share of the health bar, in `[0, 1]`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.health as f32 / self.max_health as f32;
        fraction.clamp(0.0, 1.0)
    }

    /// Filled width of a health bar `width` pixels wide, rounded down.
    #[must_use]
    pub fn health_bar_fill(&self, width: u32) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        let filled = u64::from(self.health.min(self.max_health)) * u64::from(width)
            / u64::from(self.max_health);
        u32::try_from(filled).unwrap_or(width)
    }
}

/// Camera that keeps its x fixed and follows the player's height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraRig {
    /// Added to the player's y to get the view centre.
    pub offset_y: f32,
}

impl CameraRig {
    /// Creates a rig with the given vertical offset.
    #[must_use]
    pub const fn new(offset_y: f32) -> Self {
        Self { offset_y }
    }

    /// New view centre for a view currently centred on `centre`.
    #[must_use]
    pub fn focus(&self, centre: Vec2, player: Vec2) -> Vec2 {
        Vec2::new(centre.x, player.y + self.offset_y)
    }
}
