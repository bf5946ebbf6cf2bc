//! Collision detection for an axis-aligned arena
//!
//! The ball is tested as a point against bricks and as a circle against the
//! walls. Nothing here mutates velocity except [`resolve_brick_hits`], which
//! owns the brick pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, BrickGrid};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Point lies strictly inside; touching an edge is not a hit
    #[inline]
    pub fn contains_strict(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x > self.min.x && point.x < max.x && point.y > self.min.y && point.y < max.y
    }
}

/// Which horizontal boundary the ball is about to cross
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    /// Stays between ceiling and floor
    None,
    /// Next y would rise above the ceiling
    Ceiling,
    /// Next y would sink below the floor line (paddle or miss)
    Floor,
}

/// Flip the ball's vertical velocity once for every alive brick containing
/// its center, destroying each one.
///
/// Every brick is checked, so two overlapping hits in one tick flip twice.
/// Returns the grid coordinates of the destroyed bricks in iteration order.
pub fn resolve_brick_hits(ball: &mut Ball, bricks: &mut BrickGrid) -> Vec<(u32, u32)> {
    let mut destroyed = Vec::new();
    for brick in bricks.iter_mut() {
        if brick.is_alive() && brick.rect.contains_strict(ball.pos) {
            ball.vel.y = -ball.vel.y;
            brick.destroy();
            destroyed.push((brick.column, brick.row));
        }
    }
    destroyed
}

/// Whether the next x position leaves `[radius, arena_width - radius]`
#[inline]
pub fn crosses_side_wall(ball: &Ball, arena_width: f32) -> bool {
    let next_x = ball.pos.x + ball.vel.x;
    next_x > arena_width - ball.radius || next_x < ball.radius
}

/// Classify the next y position against the ceiling and floor.
/// The ceiling wins if both would be crossed.
pub fn vertical_contact(ball: &Ball, arena_height: f32) -> VerticalContact {
    let next_y = ball.pos.y + ball.vel.y;
    if next_y < ball.radius {
        VerticalContact::Ceiling
    } else if next_y > arena_height - ball.radius {
        VerticalContact::Floor
    } else {
        VerticalContact::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::BrickStatus;

    fn ball_at(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(dx, dy), 10.0)
    }

    #[test]
    fn test_contains_strict_excludes_edges() {
        let rect = Rect::new(Vec2::new(35.0, 30.0), Vec2::new(50.0, 20.0));
        assert!(rect.contains_strict(Vec2::new(60.0, 40.0)));
        assert!(!rect.contains_strict(Vec2::new(35.0, 40.0)));
        assert!(!rect.contains_strict(Vec2::new(85.0, 40.0)));
        assert!(!rect.contains_strict(Vec2::new(60.0, 30.0)));
        assert!(!rect.contains_strict(Vec2::new(60.0, 50.0)));
        assert_eq!(rect.max(), Vec2::new(85.0, 50.0));
    }

    #[test]
    fn test_brick_hit_flips_dy_and_destroys() {
        let mut bricks = BrickGrid::new(&GameConfig::default());
        let mut ball = ball_at(60.0, 40.0, 2.0, -2.0);

        let hits = resolve_brick_hits(&mut ball, &mut bricks);
        assert_eq!(hits, vec![(0, 0)]);
        assert_eq!(ball.vel, Vec2::new(2.0, 2.0));
        assert_eq!(
            bricks.get(0, 0).map(|b| b.status),
            Some(BrickStatus::Destroyed)
        );

        // Destroyed bricks no longer collide
        let hits = resolve_brick_hits(&mut ball, &mut bricks);
        assert!(hits.is_empty());
        assert_eq!(ball.vel, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_overlapping_bricks_each_flip() {
        // Zero padding with a shifted second row makes two bricks overlap
        let config = GameConfig {
            brick_columns: 1,
            brick_rows: 2,
            brick_padding: -10.0,
            ..Default::default()
        };
        let mut bricks = BrickGrid::new(&config);
        // Row 1 starts at y = 40, row 0 covers 30..50: (60, 45) is inside both
        let mut ball = ball_at(60.0, 45.0, 2.0, -2.0);

        let hits = resolve_brick_hits(&mut ball, &mut bricks);
        assert_eq!(hits.len(), 2);
        assert_eq!(ball.vel.y, -2.0);
        assert!(bricks.is_cleared());
    }

    #[test]
    fn test_side_wall_crossing() {
        assert!(crosses_side_wall(&ball_at(469.0, 100.0, 2.0, 0.0), 480.0));
        assert!(!crosses_side_wall(&ball_at(468.0, 100.0, 2.0, 0.0), 480.0));
        assert!(crosses_side_wall(&ball_at(11.0, 100.0, -2.0, 0.0), 480.0));
        assert!(!crosses_side_wall(&ball_at(12.0, 100.0, -2.0, 0.0), 480.0));
    }

    #[test]
    fn test_vertical_contact() {
        assert_eq!(
            vertical_contact(&ball_at(100.0, 11.0, 0.0, -2.0), 320.0),
            VerticalContact::Ceiling
        );
        assert_eq!(
            vertical_contact(&ball_at(100.0, 12.0, 0.0, -2.0), 320.0),
            VerticalContact::None
        );
        assert_eq!(
            vertical_contact(&ball_at(100.0, 309.0, 0.0, 2.0), 320.0),
            VerticalContact::Floor
        );
        assert_eq!(
            vertical_contact(&ball_at(100.0, 308.0, 0.0, 2.0), 320.0),
            VerticalContact::None
        );
    }
}
