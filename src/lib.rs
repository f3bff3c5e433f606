//! Block Hopper - an endless vertical platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player motion, level generation, collisions)
//! - `score`: Score ledger with persistent high score
//! - `persistence`: Key-value high-score storage
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod score;
pub mod sim;
pub mod tuning;

pub use persistence::{JsonFileStore, KvStore, MemoryStore, PersistError};
pub use score::ScoreLedger;
pub use sim::{GameEvent, GamePhase, GameState, Scene, TickInput, tick};
pub use tuning::{ConfigError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible playfield, in block-grid units
    pub const SCREEN_WIDTH: f32 = 18.0;
    pub const SCREEN_HEIGHT: f32 = 31.0;

    /// Floor block dimensions
    pub const BLOCK_WIDTH: f32 = 2.0;
    pub const BLOCK_HEIGHT: f32 = 1.0;

    /// Vertical gap between the two rows of a pattern; consecutive patterns
    /// are anchored two of these apart
    pub const PATTERN_VERTICAL_DISTANCE: f32 = 5.0;

    /// Downward acceleration while airborne
    pub const GRAVITY: f32 = 9.8;

    /// An early jump press still registers on landing within this window
    pub const JUMP_GRACE_TIME: f32 = 0.25;
    /// Grounded probe hits are ignored for this long after a jump starts
    pub const JUMP_LIFTOFF_TIME: f32 = 0.45;
    /// Releasing the jump input mid-ascent scales vertical velocity by this
    pub const JUMP_RELEASE_REDUCE: f32 = 0.4;

    /// Short-range shape-cast distance for ground and wall probes
    pub const PROBE_DISTANCE: f32 = 0.1;

    /// Player collider size; its center sits half a unit above the position
    pub const PLAYER_WIDTH: f32 = 1.0;
    pub const PLAYER_HEIGHT: f32 = 1.0;
    pub const COLLIDER_OFFSET_Y: f32 = 0.5;

    /// Coin pickup collider size
    pub const COIN_SIZE: f32 = 0.5;

    /// Landing must top the previous best height by more than this to score
    pub const CLIMB_EPSILON: f32 = 1.0;

    /// Patterns despawn once this far below the bottom of the screen
    pub const DESPAWN_MARGIN: f32 = 7.0;

    /// The camera keeps this much extra room below the player
    pub const CAMERA_MARGIN: f32 = 5.5;

    /// Y center of the start floor row (half-screen down, half a block up)
    pub const START_FLOOR_Y: f32 = -SCREEN_HEIGHT / 2.0 + 0.5;
}
