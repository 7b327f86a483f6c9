//! Headless runner: plays a scripted climb through every level on the
//! reference engine and prints the final HUD as JSON.
//!
//! Usage: `skyward-headless [config.json]`. Set `RUST_LOG=debug` for
//! per-contact logging.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skyward_core::engine::{PhysicsPort, RecordingAudio};
use skyward_core::game::{Game, GameEvent};
use skyward_core::world::HeadlessWorld;
use skyward_core::{GameConfig, LevelId};

/// Ticks spent walking around each level before climbing out.
const WANDER_TICKS: u32 = 120;

/// Upper bound on ticks before the run is abandoned.
const MAX_TICKS: u32 = 10_000;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    let mut game = Game::with_config(HeadlessWorld::new(), RecordingAudio::new(), config)
        .context("building level one")?;

    let mut ticks = 0;
    while !game.phase().is_terminal() && ticks < MAX_TICKS {
        let level = game.current_level();
        wander(&mut game);
        ticks += WANDER_TICKS;
        log_events(&mut game);

        if game.phase().is_terminal() {
            break;
        }
        climb_out(&mut game, level);
        ticks += 2;
        log_events(&mut game);
    }

    if !game.phase().is_terminal() {
        warn!(ticks, "run abandoned before reaching a terminal phase");
    }

    info!(
        phase = ?game.phase(),
        ticks = game.ticks(),
        sounds = game.audio().played().len(),
        "run finished"
    );
    println!("{}", serde_json::to_string_pretty(&game.hud())?);
    Ok(())
}

/// Steers back and forth, jumping at each turn.
fn wander(game: &mut Game<HeadlessWorld, RecordingAudio>) {
    for t in 0..WANDER_TICKS {
        match t % 40 {
            0 => game.request_move_right(),
            20 => game.request_move_left(),
            _ => {}
        }
        if t % 20 == 0 {
            game.request_jump();
        }
        game.tick();
        if game.phase().is_terminal() {
            return;
        }
    }
    game.request_stop_horizontal();
}

/// Lifts the player just past the current level's exit and ticks until
/// the next level is running or the game is won.
fn climb_out(game: &mut Game<HeadlessWorld, RecordingAudio>, level: LevelId) {
    let tuning = game.tuning();
    let exit = match level {
        LevelId::One => tuning.level_one_exit,
        LevelId::Two => tuning.level_two_exit,
        LevelId::Three => tuning.win_height,
    };
    let player = game.player_body();
    game.engine_mut()
        .set_position(player, Vec2::new(0.0, exit + 1.0));
    game.tick();
    game.tick();
}

fn log_events(game: &mut Game<HeadlessWorld, RecordingAudio>) {
    for event in game.take_events() {
        match event {
            GameEvent::LevelStarted { level, instance } => {
                info!(%level, instance, "level started");
            }
            GameEvent::GameWon { score } => info!(score, "game won"),
            GameEvent::GameOver { score } => info!(score, "game over"),
            other => info!(event = ?other, "event"),
        }
    }
}
