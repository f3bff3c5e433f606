//! Fixed timestep simulation tick
//!
//! Advances the whole game one frame in a fixed order: run control
//! (title/start/game-over sequencing), player motion, collision response,
//! coin pickup, level generation, camera, despawn, fall check. Collision
//! contacts are queued during integration and drained once per tick.

use super::collision::{Contact, World};
use super::state::{
    GAME_OVER_DELAY_TICKS, GameEvent, GamePhase, GameState, START_DELAY_TICKS, Scene,
};
use crate::persistence::KvStore;

/// Input signals for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump edge: pressed this tick
    pub jump_pressed: bool,
    /// Jump edge: released this tick
    pub jump_released: bool,
    /// Jump level: held through this tick
    pub jump_held: bool,
    /// Start press on the title screen
    pub start: bool,
    /// Quit request
    pub quit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, store: &mut dyn KvStore, dt: f32) {
    if input.quit && !state.quit {
        state.quit = true;
        state.events.push(GameEvent::QuitRequested);
    }

    state.time_ticks += 1;

    match state.phase {
        GamePhase::Title => {
            if input.start {
                state.events.push(GameEvent::StartChime);
                state.phase = GamePhase::Starting;
                state.sequence_ticks = START_DELAY_TICKS;
            }
        }
        GamePhase::Starting => {
            state.sequence_ticks = state.sequence_ticks.saturating_sub(1);
            if state.sequence_ticks == 0 {
                state.begin_run(store);
                state.events.push(GameEvent::SceneChange(Scene::Game));
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Playing => playing_tick(state, input, store, dt),
        GamePhase::GameOver => {
            state.sequence_ticks = state.sequence_ticks.saturating_sub(1);
            if state.sequence_ticks == 0 {
                state.events.push(GameEvent::SceneChange(Scene::Title));
                state.phase = GamePhase::Title;
            }
        }
    }
}

/// One frame of the active run
fn playing_tick(state: &mut GameState, input: &TickInput, store: &mut dyn KvStore, dt: f32) {
    let mut contacts: Vec<Contact> = Vec::new();
    {
        let world = World::new(state.level.blocks());
        state
            .player
            .update(input, &world, &state.tuning, &mut state.events, dt);
        state.player.integrate(&world, dt, &mut contacts);
        state.player.handle_contacts(
            &contacts,
            &world,
            &mut state.ledger,
            &state.tuning,
            &mut state.events,
        );
    }

    state.player.collect_coins(
        state.level.coins_mut(),
        &mut state.ledger,
        &state.tuning,
        &mut state.events,
    );

    state.level.tick(state.player.position().y);

    state.update_camera();
    let camera_y = state.camera_y;
    state.level.despawn_below(camera_y);

    let frustum = state.frustum();
    state.player.check_visibility(&frustum);

    if state.player.fallen() {
        // Edge-triggered exactly once: the phase switch below keeps this
        // sequence from re-entering
        log::info!(
            "run ended: score {} best {}",
            state.ledger.score(),
            state.ledger.best()
        );
        state.ledger.save(store);
        state.events.push(GameEvent::MusicStopped);
        state.events.push(GameEvent::Fell);
        state.phase = GamePhase::GameOver;
        state.sequence_ticks = GAME_OVER_DELAY_TICKS;
    }
}
