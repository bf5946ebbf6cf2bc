//! Idle/demo mode - the game plays itself
//!
//! The autopilot never touches the world. It only produces the key events a
//! player would, so it goes through the same input path as a keyboard.

use super::input::{InputState, KeyEvent, MoveKey};
use super::state::World;

/// How close (in arena units) the paddle center must be to its target
/// before the autopilot lets go of the keys
pub const DEAD_ZONE: f32 = 6.0;

/// How many ticks ahead the autopilot leads the ball horizontally
pub const LEAD_TICKS: f32 = 4.0;

/// Key events that steer the paddle under the ball, given what is held now
pub fn steer(world: &World, held: &InputState) -> Vec<KeyEvent> {
    let target = world.ball.pos.x + world.ball.vel.x * LEAD_TICKS;
    let offset = target - world.paddle.center_x();

    let want_right = offset > DEAD_ZONE;
    let want_left = offset < -DEAD_ZONE;

    let mut events = Vec::new();
    for (key, want) in [(MoveKey::Right, want_right), (MoveKey::Left, want_left)] {
        if held.is_pressed(key) != want {
            events.push(if want {
                KeyEvent::Pressed(key)
            } else {
                KeyEvent::Released(key)
            });
        }
    }
    events
}
