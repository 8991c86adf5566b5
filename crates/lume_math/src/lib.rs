//! Lume math types.
//!
//! Thin layer over glam with the geometric value types shared by the
//! accelerator and the path tracer.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;

/// RGB radiance, stored linearly.
pub type Color = Vec3;
