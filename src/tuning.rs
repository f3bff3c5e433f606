//! Data-driven game balance
//!
//! Everything a designer would tweak between builds lives here. Values are
//! validated once at startup; a bad config refuses to start a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup configuration errors. All of these are fatal: the game refuses to
/// start a run rather than generate degenerate content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pattern catalog is empty")]
    EmptyPatternCatalog,
    #[error("pattern template '{0}' has no blocks")]
    EmptyPattern(&'static str),
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}

/// Gameplay tuning values
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tuning {
    /// Horizontal auto-run speed (units/sec, sign comes from facing)
    pub move_speed: f32,
    /// Target apex height of a full jump (units)
    pub jump_height: f32,
    /// Points awarded per collected coin
    pub coin_points: u32,
    /// Points awarded for landing above the previous best height
    pub climb_points: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_height: 20.0,
            coin_points: 10,
            climb_points: 100,
        }
    }
}

impl Tuning {
    /// Launch velocity for the target apex height under gravity:
    /// `v = sqrt(2 * g * h)`
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * crate::consts::GRAVITY * self.jump_height).sqrt()
    }

    /// Validate the config. Called once from [`crate::sim::GameState::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_speed <= 0.0 {
            return Err(ConfigError::NonPositive("move_speed"));
        }
        if self.jump_height <= 0.0 {
            return Err(ConfigError::NonPositive("jump_height"));
        }
        if self.coin_points == 0 {
            return Err(ConfigError::NonPositive("coin_points"));
        }
        if self.climb_points == 0 {
            return Err(ConfigError::NonPositive("climb_points"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_points() {
        let tuning = Tuning {
            climb_points: 0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::NonPositive("climb_points"))
        );
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let tuning = Tuning {
            move_speed: -1.0,
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Err(ConfigError::NonPositive("move_speed")));
    }

    #[test]
    fn test_jump_velocity_closed_form() {
        let tuning = Tuning::default();
        // sqrt(2 * 9.8 * 20) = 19.7989...
        assert!((tuning.jump_velocity() - 19.799).abs() < 0.001);
    }
}
