//! # Skyward Core
//!
//! Gameplay core for Skyward, a vertical 2D platformer.
//!
//! The crate decides how enemies move, how hazards behave, when the player
//! takes damage or scores, and when a level ends. Rigid-body physics,
//! rendering and audio playback belong to an external engine reached through
//! the ports in [`engine`].
//!
//! ## Architecture
//!
//! - **Entities**: bodies classified by [`entity::EntityKind`]
//! - **Behaviors**: per-tick state machines in [`behavior`]
//! - **Contacts**: a kind-pair rule table in [`contact`]
//! - **Levels**: population and lifecycle in [`level`]
//! - **Orchestrator**: phases, transitions and player identity in [`game`]
//!
//! ## Usage
//!
//! ```
//! use skyward_core::game::Game;
//! use skyward_core::world::HeadlessWorld;
//!
//! let mut game = Game::new(HeadlessWorld::new())?;
//! game.request_move_right();
//! for _ in 0..60 {
//!     game.tick();
//! }
//! assert_eq!(game.player_state().health(), 100);
//! # Ok::<(), skyward_core::error::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod behavior;
pub mod config;
pub mod contact;
pub mod engine;
pub mod entity;
pub mod error;
pub mod game;
pub mod hud;
pub mod level;
pub mod player;
pub mod world;

pub use config::{GameConfig, Tuning};
pub use engine::{AudioSink, PhysicsPort};
pub use entity::{BodyId, EntityKind};
pub use error::{ConfigError, ConfigResult};
pub use game::{Game, GameEvent, GamePhase};
pub use level::LevelId;
pub use player::PlayerState;

#[cfg(test)]
mod tests;
