//! Tzedakah Run entry point
//!
//! Headless runner: plays one autopilot session and logs what happens.
//!
//! Usage: `tzedakah-run [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
use tzedakah_run::consts::FRAMES_PER_SECOND;
#[cfg(not(target_arch = "wasm32"))]
use tzedakah_run::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use tzedakah_run::{Loadout, Tuning};

/// Hard stop for runs the bot never loses (ten minutes of play)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 10 * 60 * FRAMES_PER_SECOND as u64;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            log::warn!("Ignoring invalid seed: {err}");
            1
        }
        None => 1,
    };
    let tuning = args
        .next()
        .map(|path| Tuning::load(std::path::Path::new(&path)))
        .unwrap_or_default();

    log::info!("Tzedakah Run (headless) starting with seed {seed}");

    let mut state = GameState::new(seed, tuning, Loadout::default());
    state.set_active(true);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    while state.phase == GamePhase::Running && state.frame < MAX_FRAMES {
        tick(&mut state, &input);
        for event in state.drain_events() {
            log_event(state.frame, &event);
        }
    }

    let snapshot = state.snapshot();
    println!(
        "seed {seed}: score {} coins {} distance {:.0}m missions {}/{} ({} frames)",
        snapshot.score,
        snapshot.coins,
        state.distance,
        state.missions.completed_count(),
        state.missions.missions.len(),
        state.frame
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::ScoreUpdate(_) | GameEvent::MissionsUpdated(_) => {
            log::trace!("[{frame}] {event:?}")
        }
        GameEvent::Feedback(cue) => log::debug!("[{frame}] {cue:?}"),
        GameEvent::GameOver {
            final_score,
            final_coins,
        } => log::info!("[{frame}] Crashed: score {final_score}, coins {final_coins}"),
        GameEvent::StageChanged(name) => log::info!("[{frame}] Stage: {name}"),
        GameEvent::Reward(coins) => log::info!("[{frame}] Mission reward: {coins} coins"),
        GameEvent::PowerupExpired(kind) => log::debug!("[{frame}] {kind:?} expired"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core is driven by the host page on wasm
}
