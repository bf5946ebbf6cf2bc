//! Shape generation for 2D primitives
//!
//! All shapes are emitted in arena coordinates as triangle lists; the
//! pipeline maps them to clip space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::session::Snapshot;
use crate::sim::Rect;

/// Segments used for the ball outline
pub const BALL_SEGMENTS: u32 = 24;

/// Filled circle as a fan of `segments` triangles around the center
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let rim = |i: u32| center + Vec2::from_angle(i as f32 / segments as f32 * TAU) * radius;

    (0..segments)
        .flat_map(|i| [center, rim(i), rim(i + 1)])
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Filled axis-aligned rectangle as two triangles
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (rect.min, rect.max());
    let top_right = Vec2::new(max.x, min.y);
    let bottom_left = Vec2::new(min.x, max.y);

    [min, top_right, bottom_left, bottom_left, top_right, max]
        .into_iter()
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Everything visible in one frame: bricks, then paddle, then ball
pub fn frame_vertices(snapshot: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        snapshot.bricks.len() * 6 + 6 + (BALL_SEGMENTS * 3) as usize,
    );

    for brick in &snapshot.bricks {
        vertices.extend(rect(brick, colors::BRICK));
    }
    if let Some(paddle) = &snapshot.paddle {
        vertices.extend(rect(paddle, colors::PADDLE));
    }
    if let Some(ball) = &snapshot.ball {
        vertices.extend(circle(ball.pos, ball.radius, colors::BALL, BALL_SEGMENTS));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn test_rect_corners() {
        let r = Rect::new(Vec2::new(35.0, 30.0), Vec2::new(50.0, 20.0));
        let vertices = rect(&r, colors::BRICK);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!(v.position[0] == 35.0 || v.position[0] == 85.0);
            assert!(v.position[1] == 30.0 || v.position[1] == 50.0);
        }
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let center = Vec2::new(240.0, 290.0);
        let vertices = circle(center, 10.0, colors::BALL, 12);
        assert_eq!(vertices.len(), 36);
        for v in &vertices {
            assert!(v.pos().distance(center) <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_idle_frame_is_empty() {
        let session = Session::default();
        assert!(frame_vertices(&session.snapshot()).is_empty());
    }

    #[test]
    fn test_running_frame_counts() {
        let mut session = Session::default();
        session.start().expect("valid");
        let vertices = frame_vertices(&session.snapshot());
        assert_eq!(vertices.len(), 35 * 6 + 6 + (BALL_SEGMENTS * 3) as usize);
    }
}
