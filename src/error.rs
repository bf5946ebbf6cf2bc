//! Configuration errors
//!
//! Everything that can go wrong in this crate is a bad geometry description,
//! caught when a session starts. Gameplay outcomes are phase transitions, not
//! errors.

use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A value is NaN or infinite
    NonFinite { field: &'static str },
    /// A size, radius or step must be strictly positive
    NonPositive { field: &'static str, value: f32 },
    /// A padding or offset must not be negative
    Negative { field: &'static str, value: f32 },
    /// The brick grid has no cells
    EmptyGrid { columns: u32, rows: u32 },
    /// The brick grid has more cells than a session will build
    GridTooLarge { columns: u32, rows: u32, max: usize },
    /// The paddle cannot fit between the side walls
    PaddleTooWide { paddle_width: f32, arena_width: f32 },
    /// The paddle is taller than the arena
    PaddleTooTall { paddle_height: f32, arena_height: f32 },
    /// The brick grid extends past the arena edges
    GridOutsideArena {
        right: f32,
        bottom: f32,
        arena_width: f32,
        arena_height: f32,
    },
    /// The ball would start overlapping a wall
    BallStartOutOfBounds { x: f32, y: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be greater than zero (got {value})")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            Self::EmptyGrid { columns, rows } => {
                write!(f, "brick grid must have at least one cell (got {columns}x{rows})")
            }
            Self::GridTooLarge { columns, rows, max } => {
                write!(f, "brick grid {columns}x{rows} exceeds {max} bricks")
            }
            Self::PaddleTooWide {
                paddle_width,
                arena_width,
            } => write!(
                f,
                "paddle width {paddle_width} does not fit in arena width {arena_width}"
            ),
            Self::PaddleTooTall {
                paddle_height,
                arena_height,
            } => write!(
                f,
                "paddle height {paddle_height} does not fit in arena height {arena_height}"
            ),
            Self::GridOutsideArena {
                right,
                bottom,
                arena_width,
                arena_height,
            } => write!(
                f,
                "brick grid extends to ({right}, {bottom}) outside the {arena_width}x{arena_height} arena"
            ),
            Self::BallStartOutOfBounds { x, y } => {
                write!(f, "ball start position ({x}, {y}) overlaps the arena walls")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
