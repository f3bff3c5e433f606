//! Game state and run orchestration types
//!
//! Everything a frame needs to advance lives here; the presentation layer
//! reads it back through accessors and the drained event queue, never through
//! mutable fields.

use glam::Vec2;

use super::collision::Aabb;
use super::level::{Block, Coin, FloorPattern, Level, PatternTemplate};
use super::player::Player;
use crate::consts::*;
use crate::persistence::KvStore;
use crate::score::ScoreLedger;
use crate::tuning::{ConfigError, Tuning};

/// Scenes the host can be asked to present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Title,
    Game,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting on the title screen for a start press
    Title,
    /// Start accepted, short delay before the run begins
    Starting,
    /// Active run
    Playing,
    /// Player fell, short delay before returning to the title
    GameOver,
}

/// One-shot signals for the audio/presentation/scene collaborators, drained
/// once per frame via [`GameState::take_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Start press accepted on the title screen
    StartChime,
    Jumped,
    WallHit,
    CoinCollected { points: u32 },
    Climbed { points: u32 },
    /// Stop the ambient music loop (the game-over sequence began)
    MusicStopped,
    /// Play the fall cue
    Fell,
    /// Ask the host to present a scene
    SceneChange(Scene),
    QuitRequested,
}

/// Start-sequence delay in ticks (0.4 seconds at 60 Hz)
pub const START_DELAY_TICKS: u32 = 24;
/// Game-over delay in ticks (1.0 second at 60 Hz)
pub const GAME_OVER_DELAY_TICKS: u32 = 60;

/// Complete game state, advanced by [`super::tick::tick`]
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) seed: u64,
    pub(crate) tuning: Tuning,
    pub(crate) phase: GamePhase,
    /// Countdown driving the Starting and GameOver waits
    pub(crate) sequence_ticks: u32,
    pub(crate) time_ticks: u64,
    pub(crate) player: Player,
    pub(crate) level: Level,
    pub(crate) ledger: ScoreLedger,
    /// Vertical center of the camera frustum
    pub(crate) camera_y: f32,
    /// Added to the player's grounded height when raising the camera
    pub(crate) camera_offset: f32,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) quit: bool,
}

impl GameState {
    /// Validate the config and build a session sitting on the title screen
    pub fn new(
        seed: u64,
        tuning: Tuning,
        catalog: Vec<PatternTemplate>,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let level = Level::new(seed, catalog)?;
        let player = Player::new(&tuning);
        // Initial camera-to-player delta, minus margin so the player keeps
        // some room below; applied only once the player has climbed
        let camera_offset = (0.0 - player.position().y) - CAMERA_MARGIN;
        Ok(Self {
            seed,
            tuning,
            phase: GamePhase::Title,
            sequence_ticks: 0,
            time_ticks: 0,
            player,
            level,
            ledger: ScoreLedger::new(),
            camera_y: 0.0,
            camera_offset,
            events: Vec::new(),
            quit: false,
        })
    }

    /// Reset the run: fresh player, fresh level content, stored best pulled
    pub(crate) fn begin_run(&mut self, store: &dyn KvStore) {
        self.player = Player::new(&self.tuning);
        self.level.reset();
        self.ledger.load(store);
        self.camera_y = 0.0;
        log::info!("run started (seed {})", self.seed);
    }

    /// The camera follows the player upward only, and only while grounded.
    /// It never moves back down.
    pub(crate) fn update_camera(&mut self) {
        if self.player.grounded() {
            let target = self.player.position().y + self.camera_offset;
            if target > self.camera_y {
                self.camera_y = target;
            }
        }
    }

    /// The camera's visible area
    pub fn frustum(&self) -> Aabb {
        Aabb::new(
            Vec2::new(SCREEN_WIDTH / 2.0, self.camera_y),
            Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.ledger.score()
    }

    pub fn best_score(&self) -> u32 {
        self.ledger.best()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn grounded(&self) -> bool {
        self.player.grounded()
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.player.velocity().y
    }

    pub fn blocks(&self) -> &[Block] {
        self.level.blocks()
    }

    pub fn coins(&self) -> &[Coin] {
        self.level.coins()
    }

    pub fn patterns(&self) -> &[FloorPattern] {
        self.level.patterns()
    }

    pub fn current_altitude(&self) -> u32 {
        self.level.current_altitude()
    }

    pub fn camera_y(&self) -> f32 {
        self.camera_y
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Drain the frame's one-shot events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::level::builtin_catalog;

    #[test]
    fn test_new_rejects_bad_tuning() {
        let tuning = Tuning {
            coin_points: 0,
            ..Default::default()
        };
        assert!(GameState::new(1, tuning, builtin_catalog()).is_err());
    }

    #[test]
    fn test_new_rejects_empty_catalog() {
        assert_eq!(
            GameState::new(1, Tuning::default(), Vec::new()).unwrap_err(),
            ConfigError::EmptyPatternCatalog
        );
    }

    #[test]
    fn test_camera_rises_while_grounded_and_never_drops() {
        let store = MemoryStore::new();
        let mut state = GameState::new(1, Tuning::default(), builtin_catalog()).unwrap();
        state.begin_run(&store);
        assert_eq!(state.camera_y(), 0.0);

        // A freshly spawned player is grounded; climbing raises the camera
        state.player.pos = Vec2::new(9.0, 10.0);
        state.update_camera();
        let raised = state.camera_y();
        assert!(raised > 0.0);

        // Standing lower never pulls the camera back down
        state.player.pos = Vec2::new(9.0, 5.0);
        state.update_camera();
        assert_eq!(state.camera_y(), raised);
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = GameState::new(1, Tuning::default(), builtin_catalog()).unwrap();
        state.events.push(GameEvent::Jumped);
        assert_eq!(state.take_events(), vec![GameEvent::Jumped]);
        assert!(state.take_events().is_empty());
    }
}
