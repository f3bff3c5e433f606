//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The per-frame entry point is [`tick::tick`]; everything the presentation
//! layer needs comes out through [`state::GameState`] accessors and the
//! drained [`state::GameEvent`] queue.

pub mod collision;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Contact, World};
pub use level::{Block, Coin, FloorPattern, Level, PatternTemplate, builtin_catalog};
pub use player::{Facing, Player, Step};
pub use state::{GameEvent, GamePhase, GameState, Scene};
pub use tick::{TickInput, tick};
