//! Simulation state: ball, paddle and brick grid
//!
//! Everything a playthrough mutates lives in [`World`]. A fresh world is built
//! from a [`GameConfig`] on every Start.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// Position after this tick's velocity is applied
    #[inline]
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }
}

/// The player's paddle. Only `x` moves; `y` stays flush with the bottom wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Centered paddle resting on the bottom wall
    pub fn centered(config: &GameConfig) -> Self {
        Self {
            x: config.paddle_start_x(),
            y: config.paddle_y(),
            width: config.paddle_width,
            height: config.paddle_height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    /// Whether `x` lies over the paddle, edges included
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Brick status. `Destroyed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickStatus {
    #[default]
    Alive,
    Destroyed,
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub column: u32,
    pub row: u32,
    pub rect: Rect,
    pub status: BrickStatus,
}

impl Brick {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == BrickStatus::Alive
    }

    /// Mark destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        let was_alive = self.is_alive();
        self.status = BrickStatus::Destroyed;
        was_alive
    }
}

/// Fixed-size grid of bricks, stored column-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: u32,
    rows: u32,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Fully alive grid laid out per the config
    pub fn new(config: &GameConfig) -> Self {
        let size = Vec2::new(config.brick_width, config.brick_height);
        let mut bricks = Vec::with_capacity(config.brick_count().unwrap_or(0));
        for column in 0..config.brick_columns {
            for row in 0..config.brick_rows {
                bricks.push(Brick {
                    column,
                    row,
                    rect: Rect::new(config.brick_origin(column, row), size),
                    status: BrickStatus::Alive,
                });
            }
        }
        Self {
            columns: config.brick_columns,
            rows: config.brick_rows,
            bricks,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Storage slot of (column, row); column-major
    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        (column as usize)
            .checked_mul(self.rows as usize)?
            .checked_add(row as usize)
    }

    pub fn get(&self, column: u32, row: u32) -> Option<&Brick> {
        self.bricks.get(self.index(column, row)?)
    }

    pub fn get_mut(&mut self, column: u32, row: u32) -> Option<&mut Brick> {
        let index = self.index(column, row)?;
        self.bricks.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.is_alive())
    }
}

/// Everything one playthrough mutates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
}

impl World {
    /// Fresh world: ball at its start point, paddle centered, all bricks alive
    pub fn new(config: &GameConfig) -> Self {
        Self {
            ball: Ball::new(config.ball_start, config.ball_velocity, config.ball_radius),
            paddle: Paddle::centered(config),
            bricks: BrickGrid::new(config),
        }
    }
}
