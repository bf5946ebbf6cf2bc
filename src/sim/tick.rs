//! Fixed-step simulation tick
//!
//! One call advances the world by exactly one frame. Step order is
//! significant: bricks, win check, side walls, ceiling/floor, translation,
//! paddle.

use serde::{Deserialize, Serialize};

use super::collision::{VerticalContact, crosses_side_wall, resolve_brick_hits, vertical_contact};
use super::input::InputState;
use super::state::{Paddle, World};
use crate::config::GameConfig;

/// Terminal condition raised by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickSignal {
    #[default]
    None,
    /// The last alive brick was destroyed
    BrickGridCleared,
    /// The ball reached the floor away from the paddle
    BallMissedPaddle,
}

impl TickSignal {
    pub fn is_terminal(&self) -> bool {
        *self != TickSignal::None
    }
}

/// Something that happened during a tick (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    BrickDestroyed { column: u32, row: u32 },
    SideWallBounce,
    CeilingBounce,
    PaddleHit,
}

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub signal: TickSignal,
    pub events: Vec<TickEvent>,
}

impl TickOutcome {
    fn halted(signal: TickSignal, events: Vec<TickEvent>) -> Self {
        Self { signal, events }
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &InputState, config: &GameConfig) -> TickOutcome {
    let mut events: Vec<TickEvent> = resolve_brick_hits(&mut world.ball, &mut world.bricks)
        .into_iter()
        .map(|(column, row)| TickEvent::BrickDestroyed { column, row })
        .collect();

    // Win is evaluated in the same tick the last brick goes
    if world.bricks.is_cleared() {
        return TickOutcome::halted(TickSignal::BrickGridCleared, events);
    }

    let ball = &mut world.ball;

    if crosses_side_wall(ball, config.arena_width) {
        ball.vel.x = -ball.vel.x;
        events.push(TickEvent::SideWallBounce);
    }

    match vertical_contact(ball, config.arena_height) {
        VerticalContact::Ceiling => {
            ball.vel.y = -ball.vel.y;
            events.push(TickEvent::CeilingBounce);
        }
        VerticalContact::Floor => {
            if world.paddle.spans(ball.pos.x) {
                ball.vel.y = -ball.vel.y;
                events.push(TickEvent::PaddleHit);
            } else {
                // Ball stays frozen where it failed
                return TickOutcome::halted(TickSignal::BallMissedPaddle, events);
            }
        }
        VerticalContact::None => {}
    }

    ball.pos += ball.vel;

    move_paddle(&mut world.paddle, input, config);

    TickOutcome {
        signal: TickSignal::None,
        events,
    }
}

/// Step the paddle one notch. Right wins when both keys are held.
pub fn move_paddle(paddle: &mut Paddle, input: &InputState, config: &GameConfig) {
    let max_x = config.paddle_max_x();
    if input.right_pressed && paddle.x < max_x {
        paddle.x = (paddle.x + config.paddle_step).min(max_x);
    } else if input.left_pressed && paddle.x > 0.0 {
        paddle.x = (paddle.x - config.paddle_step).max(0.0);
    }
}
