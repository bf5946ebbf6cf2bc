//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no sub-stepping
//! - No randomness
//! - Stable brick iteration order (column-major)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{Rect, VerticalContact};
pub use input::{InputState, KeyEvent, MoveKey};
pub use state::{Ball, Brick, BrickGrid, BrickStatus, Paddle, World};
pub use tick::{TickEvent, TickOutcome, TickSignal, move_paddle, tick};
