//! Brick Breaker - a single-screen ball-and-paddle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, input, autopilot)
//! - `session`: Game lifecycle state machine and render snapshots
//! - `scheduler`: Frame driving with cancellable frame requests
//! - `config`: Arena geometry, validated at session start
//! - `renderer`: WebGPU rendering pipeline

pub mod config;
pub mod error;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;
pub use scheduler::{FrameLoop, FrameOutcome, FrameScheduler, FrameToken, QueueScheduler};
pub use session::{Session, SessionPhase, Snapshot, Transition, TransitionCause};

/// Game configuration constants (the fixed display geometry)
pub mod consts {
    /// Arena dimensions (logical units, origin top-left, y grows downward)
    pub const ARENA_WIDTH: f32 = 480.0;
    pub const ARENA_HEIGHT: f32 = 320.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_X: f32 = ARENA_WIDTH / 2.0;
    pub const BALL_START_Y: f32 = ARENA_HEIGHT - 30.0;
    pub const BALL_START_DX: f32 = 2.0;
    pub const BALL_START_DY: f32 = -2.0;

    /// Paddle defaults - sits flush with the bottom edge
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Horizontal paddle travel per tick while a movement key is held
    pub const PADDLE_STEP: f32 = 7.0;

    /// Brick grid layout
    pub const BRICK_COLUMNS: u32 = 7;
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_LEFT: f32 = 35.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;

    /// Nominal frame interval used by paced schedulers (display refresh)
    pub const FRAME_INTERVAL_SECS: f64 = 1.0 / 60.0;
}
