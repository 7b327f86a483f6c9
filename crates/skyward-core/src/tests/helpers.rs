//! Test helper functions for setting up games and poking at bodies.

use glam::Vec2;

use crate::config::{GameConfig, Tuning};
use crate::engine::{PhysicsPort, RecordingAudio};
use crate::entity::{BodyId, EntityKind};
use crate::game::{Game, GameEvent, GamePhase};
use crate::level::LevelId;
use crate::world::HeadlessWorld;

/// Game type used throughout the crate tests.
pub type TestGame = Game<HeadlessWorld, RecordingAudio>;

// =============================================================================
// Construction
// =============================================================================

/// A game with the shipped configuration and a recording audio sink.
pub fn new_game() -> TestGame {
    game_with_tuning(Tuning::default())
}

/// A game with custom tuning and the shipped layouts.
pub fn game_with_tuning(tuning: Tuning) -> TestGame {
    let config = GameConfig {
        tuning,
        ..GameConfig::default()
    };
    Game::with_config(HeadlessWorld::new(), RecordingAudio::new(), config)
        .expect("test configuration is valid")
}

/// Moves the player above the exit of each level until `target` is active.
pub fn advance_to(game: &mut TestGame, target: LevelId) {
    while game.current_level() != target {
        let exit = match game.current_level() {
            LevelId::One => game.tuning().level_one_exit,
            LevelId::Two => game.tuning().level_two_exit,
            LevelId::Three => panic!("cannot advance past the final level"),
        };
        place_player(game, Vec2::new(0.0, exit + 1.0));
        game.tick();
        assert!(matches!(game.phase(), GamePhase::Transitioning { .. }));
        game.tick();
        assert_eq!(game.phase(), GamePhase::Running);
    }
}

// =============================================================================
// Body access
// =============================================================================

/// Teleports the player.
pub fn place_player(game: &mut TestGame, position: Vec2) {
    let player = game.player_body();
    game.engine_mut().set_position(player, position);
}

/// Current player position.
pub fn player_position(game: &TestGame) -> Vec2 {
    game.engine()
        .position(game.player_body())
        .expect("player body exists")
}

/// First body of the given kind in the active level.
pub fn first_of(game: &TestGame, kind: EntityKind) -> BodyId {
    if kind == EntityKind::Collectible {
        return game
            .level()
            .collectibles()
            .iter()
            .next()
            .expect("level has a collectible");
    }
    game.level()
        .bodies_of(kind)
        .next()
        .unwrap_or_else(|| panic!("level has no {kind}"))
}

/// Queues a contact between the player and `other` for the next tick.
pub fn touch_player(game: &mut TestGame, other: BodyId) {
    let player = game.player_body();
    game.engine_mut().inject_contact(player, other);
}

/// Runs `n` ticks.
pub fn run_ticks(game: &mut TestGame, n: usize) {
    for _ in 0..n {
        game.tick();
    }
}

/// Counts recorded events matching a predicate.
pub fn count_events(game: &TestGame, pred: impl Fn(&GameEvent) -> bool) -> usize {
    game.events().iter().filter(|e| pred(e)).count()
}
