//! Arena geometry configuration
//!
//! Defaults reproduce the fixed display constants. A config is handed to a
//! session when it is created and checked every time the session starts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Upper bound on bricks in one grid
pub const MAX_BRICKS: usize = 4096;

/// Complete geometry and motion description of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Where the ball is placed on Start
    pub ball_start: Vec2,
    /// Velocity the ball is given on Start (units per tick)
    pub ball_velocity: Vec2,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance moved per tick while a direction key is held
    pub paddle_step: f32,

    // === Bricks ===
    pub brick_columns: u32,
    pub brick_rows: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_left: f32,
    pub brick_offset_top: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_start: Vec2::new(BALL_START_X, BALL_START_Y),
            ball_velocity: Vec2::new(BALL_START_DX, BALL_START_DY),

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_step: PADDLE_STEP,

            brick_columns: BRICK_COLUMNS,
            brick_rows: BRICK_ROWS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_offset_left: BRICK_OFFSET_LEFT,
            brick_offset_top: BRICK_OFFSET_TOP,
        }
    }
}

impl GameConfig {
    /// Arena size as a vector
    #[inline]
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Largest legal paddle x (left edge)
    #[inline]
    pub fn paddle_max_x(&self) -> f32 {
        self.arena_width - self.paddle_width
    }

    /// Paddle x that centers it horizontally
    #[inline]
    pub fn paddle_start_x(&self) -> f32 {
        (self.arena_width - self.paddle_width) / 2.0
    }

    /// Fixed paddle y (top edge), flush with the bottom of the arena
    #[inline]
    pub fn paddle_y(&self) -> f32 {
        self.arena_height - self.paddle_height
    }

    /// Top-left corner of the brick at (column, row)
    pub fn brick_origin(&self, column: u32, row: u32) -> Vec2 {
        Vec2::new(
            column as f32 * (self.brick_width + self.brick_padding) + self.brick_offset_left,
            row as f32 * (self.brick_height + self.brick_padding) + self.brick_offset_top,
        )
    }

    /// Number of grid cells, or `None` if it does not fit in a `usize`
    pub fn brick_count(&self) -> Option<usize> {
        (self.brick_columns as usize).checked_mul(self.brick_rows as usize)
    }

    /// Bottom-right corner of the whole brick grid
    fn grid_extent(&self) -> Vec2 {
        let last = self.brick_origin(
            self.brick_columns.saturating_sub(1),
            self.brick_rows.saturating_sub(1),
        );
        last + Vec2::new(self.brick_width, self.brick_height)
    }

    /// Check every geometric invariant; the first violation wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ball_radius", self.ball_radius),
            ("ball_start.x", self.ball_start.x),
            ("ball_start.y", self.ball_start.y),
            ("ball_velocity.x", self.ball_velocity.x),
            ("ball_velocity.y", self.ball_velocity.y),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_step", self.paddle_step),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
            ("brick_padding", self.brick_padding),
            ("brick_offset_left", self.brick_offset_left),
            ("brick_offset_top", self.brick_offset_top),
        ];
        if let Some(&(field, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field });
        }

        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ball_radius", self.ball_radius),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_step", self.paddle_step),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
        ];
        if let Some(&(field, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::NonPositive { field, value });
        }

        let non_negative = [
            ("brick_padding", self.brick_padding),
            ("brick_offset_left", self.brick_offset_left),
            ("brick_offset_top", self.brick_offset_top),
        ];
        if let Some(&(field, value)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::Negative { field, value });
        }

        if self.brick_columns == 0 || self.brick_rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.brick_columns,
                rows: self.brick_rows,
            });
        }
        if self
            .brick_count()
            .is_none_or(|count| count > MAX_BRICKS)
        {
            return Err(ConfigError::GridTooLarge {
                columns: self.brick_columns,
                rows: self.brick_rows,
                max: MAX_BRICKS,
            });
        }

        if self.paddle_width > self.arena_width {
            return Err(ConfigError::PaddleTooWide {
                paddle_width: self.paddle_width,
                arena_width: self.arena_width,
            });
        }
        if self.paddle_height > self.arena_height {
            return Err(ConfigError::PaddleTooTall {
                paddle_height: self.paddle_height,
                arena_height: self.arena_height,
            });
        }

        let extent = self.grid_extent();
        if extent.x > self.arena_width || extent.y > self.arena_height {
            return Err(ConfigError::GridOutsideArena {
                right: extent.x,
                bottom: extent.y,
                arena_width: self.arena_width,
                arena_height: self.arena_height,
            });
        }

        let r = self.ball_radius;
        let Vec2 { x, y } = self.ball_start;
        if x < r || x > self.arena_width - r || y < r || y > self.arena_height - r {
            return Err(ConfigError::BallStartOutOfBounds { x, y });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_geometry() {
        let config = GameConfig::default();
        assert_eq!(config.paddle_start_x(), 202.5);
        assert_eq!(config.paddle_max_x(), 405.0);
        assert_eq!(config.paddle_y(), 310.0);
        assert_eq!(config.brick_origin(0, 0), Vec2::new(35.0, 30.0));
        assert_eq!(config.brick_origin(6, 4), Vec2::new(395.0, 150.0));
        assert_eq!(config.grid_extent(), Vec2::new(445.0, 170.0));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let config = GameConfig {
            paddle_width: -75.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "paddle_width",
                value: -75.0
            })
        );

        let config = GameConfig {
            ball_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "ball_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let config = GameConfig {
            arena_height: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite {
                field: "arena_height"
            })
        );
    }

    #[test]
    fn test_rejects_negative_padding() {
        let config = GameConfig {
            brick_padding: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "brick_padding",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GameConfig {
            brick_rows: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                columns: 7,
                rows: 0
            })
        );
    }

    #[test]
    fn test_rejects_grid_overflow() {
        let config = GameConfig {
            brick_columns: 8,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridOutsideArena { .. })
        ));
    }

    #[test]
    fn test_rejects_wide_paddle() {
        let config = GameConfig {
            paddle_width: 500.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PaddleTooWide { .. })
        ));
    }

    #[test]
    fn test_rejects_ball_in_wall() {
        let config = GameConfig {
            ball_start: Vec2::new(5.0, 290.0),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BallStartOutOfBounds { x: 5.0, y: 290.0 })
        );
    }

    #[test]
    fn test_rejects_oversized_grid() {
        // Huge arena so the extent check alone would accept it
        let config = GameConfig {
            arena_width: 1e30,
            arena_height: 1e30,
            brick_columns: 70_000,
            brick_rows: 70_000,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                columns: 70_000,
                rows: 70_000,
                max: MAX_BRICKS
            })
        );

        let config = GameConfig {
            brick_columns: u32::MAX,
            brick_rows: u32::MAX,
            ..config
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_tall_paddle() {
        let config = GameConfig {
            paddle_height: 400.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PaddleTooTall {
                paddle_height: 400.0,
                arena_height: 320.0
            })
        );
    }
}
