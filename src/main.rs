//! Block Hopper entry point
//!
//! Headless demo driver: boots the deterministic sim, autopilots one run at
//! the fixed timestep, and reports the final score. A real presentation
//! layer drives the same `tick` with live input, renders the state
//! accessors, and maps the drained events onto audio and scene loads.

use std::time::{SystemTime, UNIX_EPOCH};

use block_hopper::consts::SIM_DT;
use block_hopper::persistence::JsonFileStore;
use block_hopper::sim::{GamePhase, GameState, TickInput, builtin_catalog, tick};
use block_hopper::tuning::Tuning;

/// Two simulated minutes; plenty for one demo run
const MAX_TICKS: u64 = 60 * 120;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    let mut store = JsonFileStore::open("block-hopper-save.json");
    let mut state = match GameState::new(seed, Tuning::default(), builtin_catalog()) {
        Ok(state) => state,
        Err(err) => {
            log::error!("refusing to start: {err}");
            std::process::exit(1);
        }
    };

    log::info!("demo run, seed {seed}");

    // Autopilot: start immediately, then hop whenever grounded, holding the
    // button long enough that most jumps reach full height.
    let mut started = false;
    let mut held_ticks = 0u32;
    let mut ticks = 0u64;

    while ticks < MAX_TICKS && !state.quit_requested() {
        let mut input = TickInput::default();
        match state.phase() {
            GamePhase::Title if !started => {
                input.start = true;
                started = true;
            }
            // Back on the title screen means the game-over sequence finished
            GamePhase::Title => break,
            GamePhase::Playing => {
                if state.grounded() && held_ticks == 0 {
                    input.jump_pressed = true;
                    held_ticks = 40;
                }
                if held_ticks > 0 {
                    held_ticks -= 1;
                    input.jump_held = true;
                    if held_ticks == 0 {
                        input.jump_released = true;
                    }
                }
            }
            _ => {}
        }

        tick(&mut state, &input, &mut store, SIM_DT);
        for event in state.take_events() {
            log::debug!("event: {event:?}");
        }
        ticks += 1;
    }

    println!(
        "demo finished after {:.1}s: score {} best {}",
        ticks as f32 * SIM_DT,
        state.score(),
        state.best_score(),
    );
}
