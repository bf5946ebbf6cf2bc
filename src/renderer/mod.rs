//! WebGPU rendering module
//!
//! Geometry is built on the CPU from a session snapshot each frame and drawn
//! as flat-colored triangles.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc};
