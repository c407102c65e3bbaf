//! RPS Arena entry point
//!
//! Headless demo: places a wager, runs one battle at a simulated 60 Hz
//! and logs the result and rewards.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use rps_arena::persistence::KeyValueStore;
use rps_arena::{Game, GamePhase};
use rps_arena::platform::{LogHooks, PlatformHooks};
use rps_arena::sim::{SimEvent, Species};

/// Simulated frame length (ms)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn run_demo<S: KeyValueStore, H: PlatformHooks>(
    game: &mut Game<S, H>,
    wager: Species,
    start: f64,
) {
    if let Err(e) = game.place_wager(wager, start) {
        log::warn!("Wager rejected: {}", e);
        return;
    }

    let mut now = start;
    for _ in 0..MAX_FRAMES {
        now += FRAME_MS;
        for event in game.update(now) {
            match event {
                SimEvent::MegaCombo { combo } => log::info!("MEGA COMBO x{}!", combo),
                SimEvent::SlowMotion => log::info!("Slow motion!"),
                SimEvent::LeaderChanged(species) => {
                    log::debug!("{} {} takes the lead", species.emoji(), species.as_str())
                }
                _ => {}
            }
        }
        if game.phase() == GamePhase::Victory {
            break;
        }
    }

    let Some(outcome) = game.last_outcome() else {
        log::warn!("Battle did not finish within {} frames", MAX_FRAMES);
        return;
    };
    let stats = &game.progression.stats;
    log::info!(
        "Result: {} {} won (bet on {}), max combo {}, {} conversions",
        outcome.winner.emoji(),
        outcome.winner.as_str(),
        outcome.wager.as_str(),
        outcome.max_combo,
        outcome.total_collisions
    );
    log::info!(
        "Career: {} games, {:.0}% wins, {} coins, streak {}, {}/{} achievements",
        stats.total_games,
        stats.win_rate(),
        stats.total_coins,
        game.streak,
        game.progression.unlocked_count(),
        game.progression.achievements.len()
    );
    if let Some(tx) = game.ledger.latest() {
        log::info!("Last grant: +{} coins ({})", tx.amount, tx.reason);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use rps_arena::persistence::LocalStorage;

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("RPS Arena starting...");
    let mut game = Game::load(LocalStorage, LogHooks);
    let wager = Species::ALL[rand::random_range(0..Species::ALL.len())];
    run_demo(&mut game, wager, rps_arena::platform::now_ms());
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rps_arena::persistence::{FileStorage, MemoryStorage};

    env_logger::init();
    log::info!("RPS Arena (native) starting...");

    let wager = match std::env::var("RPS_ARENA_WAGER") {
        Ok(s) => s.parse().unwrap_or_else(|e| {
            log::warn!("{}, betting on rock", e);
            Species::Rock
        }),
        Err(_) => Species::ALL[rand::random_range(0..Species::ALL.len())],
    };
    let speed = std::env::var("RPS_ARENA_SPEED")
        .ok()
        .and_then(|s| match s.parse::<f32>() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("Invalid RPS_ARENA_SPEED '{}', ignoring", s);
                None
            }
        });
    let now = rps_arena::platform::now_ms();

    match std::env::var("RPS_ARENA_SAVE_DIR") {
        Ok(dir) => match FileStorage::open(&dir) {
            Ok(storage) => {
                log::info!("Saving progress to {}", dir);
                let mut game = Game::load(storage, LogHooks);
                apply_speed(&mut game, speed);
                run_demo(&mut game, wager, now);
                return;
            }
            Err(e) => log::warn!("Cannot use save dir '{}': {}, progress not saved", dir, e),
        },
        Err(_) => log::info!("RPS_ARENA_SAVE_DIR not set, progress not saved"),
    }

    let mut game = Game::load(MemoryStorage::new(), LogHooks);
    apply_speed(&mut game, speed);
    run_demo(&mut game, wager, now);
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_speed<S: KeyValueStore, H: PlatformHooks>(game: &mut Game<S, H>, speed: Option<f32>) {
    if let Some(speed) = speed
        && let Err(e) = game.set_speed(speed)
    {
        log::warn!("{}, keeping speed {}", e, game.settings.speed);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
