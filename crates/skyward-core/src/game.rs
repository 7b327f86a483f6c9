//! Top-level orchestration: level lifecycle, contacts, transitions.
//!
//! [`Game`] owns the physics engine, the audio sink, the active [`Level`]
//! and the [`PlayerState`]. Hosts drive it with one [`Game::tick`] per fixed
//! simulation step and forward player input through the `request_*` methods.
//!
//! # Phases
//!
//! ```text
//!            ┌──────────── restart ─────────────┐
//!            ▼                                  │
//! Building ─► Running ─► Transitioning ─► Running ...
//!               │  │     (one tick)
//!               │  └───► Won        (terminal)
//!               └──────► GameOver ──┘
//! ```
//!
//! # Tick order
//!
//! 1. `Transitioning`: swap to the next level, enter `Running`, end the tick.
//! 2. `Won` / `GameOver`: nothing happens.
//! 3. Behaviors run in schedule order against the player position sampled
//!    at the start of the tick.
//! 4. The engine steps and reports contact-begin pairs.
//! 5. Each pair is resolved in both orientations through
//!    [`contact::classify`](crate::contact::classify).
//! 6. Finished behaviors are removed from the level.
//! 7. The exit rule for the current level is checked. At most one
//!    transition fires per tick.
//!
//! # Example
//!
//! ```
//! use skyward_core::game::{Game, GamePhase};
//! use skyward_core::engine::PhysicsPort;
//! use skyward_core::level::LevelId;
//! use skyward_core::world::HeadlessWorld;
//! use glam::Vec2;
//!
//! let mut game = Game::new(HeadlessWorld::new()).unwrap();
//! assert_eq!(game.phase(), GamePhase::Running);
//! assert_eq!(game.current_level(), LevelId::One);
//!
//! let player = game.player_body();
//! game.engine_mut().set_position(player, Vec2::new(0.0, 25.1));
//! game.tick();
//! assert_eq!(game.phase(), GamePhase::Transitioning { to: LevelId::Two });
//!
//! game.tick();
//! assert_eq!(game.current_level(), LevelId::Two);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::behavior::TickContext;
use crate::config::{GameConfig, Tuning};
use crate::contact::{classify, knockback, ContactRule};
use crate::engine::{AudioSink, NullAudio, PhysicsPort, SoundKind};
use crate::entity::BodyId;
use crate::error::ConfigResult;
use crate::hud::HudSnapshot;
use crate::level::{Level, LevelBlueprint, LevelId};
use crate::player::{self, PlayerState, Steer};

// =============================================================================
// Phases, events, exits
// =============================================================================

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// A level is being populated.
    Building,
    /// Gameplay is live.
    Running,
    /// The current level was cleared; the swap happens on the next tick.
    Transitioning {
        /// Level about to be loaded.
        to: LevelId,
    },
    /// The final height was reached. Terminal.
    Won,
    /// Health reached zero. Left only through [`Game::restart`].
    GameOver,
}

impl GamePhase {
    /// Returns `true` for `Won` and `GameOver`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::GameOver)
    }
}

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A level instance started running.
    LevelStarted {
        /// Which level.
        level: LevelId,
        /// Construction counter of the instance.
        instance: u64,
    },
    /// The player crossed the exit height of a level.
    LevelCleared {
        /// The level that was cleared.
        level: LevelId,
    },
    /// An enemy hit the player.
    PlayerDamaged {
        /// The enemy body.
        by: BodyId,
        /// Health after the hit.
        health: u32,
    },
    /// A collectible was picked up.
    CollectiblePicked {
        /// The collectible body.
        body: BodyId,
        /// Score after the pickup.
        score: u32,
    },
    /// A disappearing platform started flickering.
    HazardArmed {
        /// The platform body.
        body: BodyId,
    },
    /// A disappearing platform was removed.
    HazardDestroyed {
        /// The platform body.
        body: BodyId,
    },
    /// The final height was reached.
    GameWon {
        /// Final score.
        score: u32,
    },
    /// Health reached zero.
    GameOver {
        /// Final score.
        score: u32,
    },
    /// The game was reset to a fresh level 1.
    Restarted,
}

/// Outcome of crossing a level's exit height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelExit {
    /// Load the given level.
    Advance(LevelId),
    /// End the game as won.
    Win,
}

/// Exit rule for a player at height `y` in `level`.
///
/// The rules are checked lowest threshold first and only the rule of the
/// current level can match, so a single tick never skips a level. The
/// comparison is strict.
#[must_use]
pub fn exit_rule(level: LevelId, y: f32, tuning: &Tuning) -> Option<LevelExit> {
    let table = [
        (LevelId::One, tuning.level_one_exit, LevelExit::Advance(LevelId::Two)),
        (LevelId::Two, tuning.level_two_exit, LevelExit::Advance(LevelId::Three)),
        (LevelId::Three, tuning.win_height, LevelExit::Win),
    ];
    table
        .into_iter()
        .find(|&(id, threshold, _)| id == level && y > threshold)
        .map(|(_, _, exit)| exit)
}

// =============================================================================
// Game
// =============================================================================

#[derive(Debug, Clone)]
struct Blueprints {
    one: LevelBlueprint,
    two: LevelBlueprint,
    three: LevelBlueprint,
}

impl Blueprints {
    fn from_config(config: &GameConfig) -> ConfigResult<Self> {
        let build = |id| LevelBlueprint::from_layout(id, config.levels.get(id), &config.tuning);
        Ok(Self {
            one: build(LevelId::One)?,
            two: build(LevelId::Two)?,
            three: build(LevelId::Three)?,
        })
    }

    const fn get(&self, id: LevelId) -> &LevelBlueprint {
        match id {
            LevelId::One => &self.one,
            LevelId::Two => &self.two,
            LevelId::Three => &self.three,
        }
    }
}

/// The orchestrator.
///
/// Player identity (health, score) lives here and survives level swaps; the
/// active [`Level`] is replaced wholesale on every transition and restart.
pub struct Game<P: PhysicsPort, A: AudioSink = NullAudio> {
    engine: P,
    audio: A,
    tuning: Tuning,
    blueprints: Blueprints,
    level: Level,
    player: PlayerState,
    phase: GamePhase,
    tick: u64,
    instances: u64,
    events: Vec<GameEvent>,
}

impl<P: PhysicsPort, A: AudioSink> fmt::Debug for Game<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("level", &self.level.id())
            .field("instance", &self.level.instance())
            .field("player", &self.player)
            .field("phase", &self.phase)
            .field("tick", &self.tick)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<P: PhysicsPort> Game<P, NullAudio> {
    /// Creates a game with the shipped tuning and layouts and no audio.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in configuration is invalid.
    pub fn new(engine: P) -> ConfigResult<Self> {
        Self::with_config(engine, NullAudio, GameConfig::default())
    }
}

impl<P: PhysicsPort, A: AudioSink> Game<P, A> {
    /// Validates `config`, builds level 1 and starts it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::error::ConfigError) if the tuning or
    /// any of the three layouts is invalid. Nothing is spawned in that case.
    pub fn with_config(mut engine: P, audio: A, config: GameConfig) -> ConfigResult<Self> {
        config.tuning.validate()?;
        let blueprints = Blueprints::from_config(&config)?;
        let level = Level::spawn(blueprints.get(LevelId::One), 1, &mut engine);

        let mut game = Self {
            engine,
            audio,
            tuning: config.tuning,
            blueprints,
            level,
            player: PlayerState::new(),
            phase: GamePhase::Building,
            tick: 0,
            instances: 1,
            events: Vec::new(),
        };
        game.begin_level();
        Ok(game)
    }

    /// Advances the game by one fixed step.
    pub fn tick(&mut self) {
        match self.phase {
            GamePhase::Transitioning { to } => {
                self.load_level(to);
                self.tick += 1;
                return;
            }
            GamePhase::Building | GamePhase::Won | GamePhase::GameOver => return,
            GamePhase::Running => {}
        }

        let ctx = TickContext {
            tick: self.tick,
            player_position: self.engine.position(self.level.player()),
        };
        self.level.tick(&ctx, &mut self.engine);

        let contacts = self.engine.step(self.tuning.dt);
        for contact in contacts {
            self.resolve_contact(contact.a, contact.b);
            self.resolve_contact(contact.b, contact.a);
        }

        for body in self.level.flush(&mut self.engine) {
            info!(body = %body, "hazard destroyed");
            self.events.push(GameEvent::HazardDestroyed { body });
        }

        if self.phase == GamePhase::Running {
            self.check_exit();
        }
        self.tick += 1;
    }

    /// Resets health and score and replaces the current level with a fresh
    /// level 1.
    ///
    /// Ignored once the game is won. Returns whether the restart happened.
    pub fn restart(&mut self) -> bool {
        if self.phase == GamePhase::Won {
            warn!("restart ignored, game already won");
            return false;
        }
        info!(from = ?self.phase, "restarting game");
        self.player.reset();
        self.events.push(GameEvent::Restarted);
        self.load_level(LevelId::One);
        true
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Starts moving left, keeping vertical velocity.
    pub fn request_move_left(&mut self) {
        self.steer(Steer::Left);
    }

    /// Starts moving right, keeping vertical velocity.
    pub fn request_move_right(&mut self) {
        self.steer(Steer::Right);
    }

    /// Stops horizontal motion, keeping vertical velocity.
    pub fn request_stop_horizontal(&mut self) {
        self.steer(Steer::Stop);
    }

    /// Jumps if the player is grounded and not already jumping.
    ///
    /// Returns whether the jump happened.
    pub fn request_jump(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        let body = self.level.player();
        player::jump(
            &mut self.player,
            &mut self.engine,
            &mut self.audio,
            body,
            self.tuning.jump_impulse,
        )
    }

    fn steer(&mut self, input: Steer) {
        if self.phase != GamePhase::Running {
            debug!(?input, phase = ?self.phase, "input ignored");
            return;
        }
        let body = self.level.player();
        player::steer(&mut self.engine, body, input, self.tuning.move_speed);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns `true` once the final height was reached.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// Returns `true` while waiting for a restart.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Health, score and jump flags.
    #[must_use]
    pub const fn player_state(&self) -> &PlayerState {
        &self.player
    }

    /// The player body of the active level.
    #[must_use]
    pub const fn player_body(&self) -> BodyId {
        self.level.player()
    }

    /// Which level is active.
    #[must_use]
    pub const fn current_level(&self) -> LevelId {
        self.level.id()
    }

    /// The active level.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Ticks processed so far, across levels and restarts.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The engine.
    #[must_use]
    pub const fn engine(&self) -> &P {
        &self.engine
    }

    /// Mutable access to the engine, for hosts and tests that move bodies.
    pub fn engine_mut(&mut self) -> &mut P {
        &mut self.engine
    }

    /// The audio sink.
    #[must_use]
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// Presentation snapshot for the HUD.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.player, self.level.id(), self.phase)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drains and returns the recorded events, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn begin_level(&mut self) {
        self.level.start();
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::LevelStarted {
            level: self.level.id(),
            instance: self.level.instance(),
        });
    }

    fn load_level(&mut self, id: LevelId) {
        self.phase = GamePhase::Building;
        self.level.stop();

        self.instances += 1;
        let next = Level::spawn(self.blueprints.get(id), self.instances, &mut self.engine);
        let previous = std::mem::replace(&mut self.level, next);
        let from = previous.id();
        previous.teardown(&mut self.engine);

        self.player.clear_footing();
        info!(from = %from, to = %id, instance = self.instances, "level loaded");
        self.begin_level();
    }

    fn resolve_contact(&mut self, subject: BodyId, other: BodyId) {
        if self.phase != GamePhase::Running {
            return;
        }
        let (Some(subject_kind), Some(other_kind)) =
            (self.level.kind_of(subject), self.level.kind_of(other))
        else {
            trace!(subject = %subject, other = %other, "contact with unknown body ignored");
            return;
        };

        match classify(subject_kind, other_kind, self.level.is_solid(other)) {
            ContactRule::Damage => self.damage_player(other),
            ContactRule::Pickup => self.pick_up(other),
            ContactRule::Ground => self.player.land(),
            ContactRule::ArmHazard => {
                if self.level.arm_hazard(subject) {
                    self.events.push(GameEvent::HazardArmed { body: subject });
                }
            }
            ContactRule::Ignore => {
                trace!(subject = %subject_kind, other = %other_kind, "contact ignored");
            }
        }
    }

    fn damage_player(&mut self, enemy: BodyId) {
        let body = self.level.player();
        let fatal = self.player.take_damage(self.tuning.enemy_damage);
        if let Some(velocity) = self.engine.linear_velocity(body) {
            self.engine
                .set_linear_velocity(body, knockback(velocity, self.tuning.knockback_bump));
        }
        self.audio.play_sound(SoundKind::Hurt);

        let health = self.player.health();
        info!(enemy = %enemy, health, "player damaged");
        self.events.push(GameEvent::PlayerDamaged { by: enemy, health });

        if fatal {
            self.game_over();
        }
    }

    fn pick_up(&mut self, collectible: BodyId) {
        if !self
            .level
            .collectibles_mut()
            .remove(&mut self.engine, collectible)
        {
            return;
        }
        self.player.add_score(self.tuning.collectible_reward);
        self.audio.play_sound(SoundKind::Collect);

        let score = self.player.score();
        debug!(body = %collectible, score, "collectible picked");
        self.events.push(GameEvent::CollectiblePicked {
            body: collectible,
            score,
        });
    }

    fn check_exit(&mut self) {
        let Some(position) = self.engine.position(self.level.player()) else {
            return;
        };
        let level = self.level.id();
        match exit_rule(level, position.y, &self.tuning) {
            Some(LevelExit::Advance(to)) => {
                info!(level = %level, to = %to, y = position.y, "level cleared");
                self.events.push(GameEvent::LevelCleared { level });
                self.phase = GamePhase::Transitioning { to };
            }
            Some(LevelExit::Win) => {
                self.level.stop();
                self.phase = GamePhase::Won;
                let score = self.player.score();
                info!(score, "game won");
                self.events.push(GameEvent::LevelCleared { level });
                self.events.push(GameEvent::GameWon { score });
            }
            None => {}
        }
    }

    fn game_over(&mut self) {
        self.level.stop();
        self.phase = GamePhase::GameOver;
        let score = self.player.score();
        info!(level = %self.level.id(), score, "game over");
        self.events.push(GameEvent::GameOver { score });
    }
}
