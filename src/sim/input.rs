//! Keyboard input tracking
//!
//! Only two keys matter. Browsers report either the modern names
//! (`ArrowLeft`/`ArrowRight`) or the legacy ones (`Left`/`Right`).

use serde::{Deserialize, Serialize};

/// A recognized movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKey {
    Left,
    Right,
}

impl MoveKey {
    /// Map a host key name; anything else is ignored
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(MoveKey::Left),
            "ArrowRight" | "Right" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// A discrete press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(MoveKey),
    Released(MoveKey),
}

impl KeyEvent {
    pub fn key_down(name: &str) -> Option<Self> {
        MoveKey::from_key_name(name).map(KeyEvent::Pressed)
    }

    pub fn key_up(name: &str) -> Option<Self> {
        MoveKey::from_key_name(name).map(KeyEvent::Released)
    }
}

/// Last known state of the movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left_pressed: bool,
    pub right_pressed: bool,
}

impl InputState {
    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(MoveKey::Left) => self.left_pressed = true,
            KeyEvent::Pressed(MoveKey::Right) => self.right_pressed = true,
            KeyEvent::Released(MoveKey::Left) => self.left_pressed = false,
            KeyEvent::Released(MoveKey::Right) => self.right_pressed = false,
        }
    }

    pub fn is_pressed(&self, key: MoveKey) -> bool {
        match key {
            MoveKey::Left => self.left_pressed,
            MoveKey::Right => self.right_pressed,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
