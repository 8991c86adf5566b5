//! Lume renderer - BVH acceleration and CPU path tracing.
//!
//! A Monte Carlo path tracer with next-event estimation and Russian roulette
//! termination, built on a bounding volume hierarchy over scene primitives.

mod bvh;
mod camera;
mod config;
mod error;
mod intersection;
mod material;
mod mesh;
mod primitive;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bvh::{Bvh, BvhNode, SplitMethod};
pub use camera::Camera;
pub use config::{RenderConfig, TraceConfig};
pub use error::{ConfigError, SceneError};
pub use intersection::Intersection;
pub use material::{DiffuseLight, Lambertian, Material};
pub use mesh::Mesh;
pub use primitive::Primitive;
pub use renderer::{color_to_rgba, linear_to_gamma, render, render_pixel, ImageBuffer};
pub use sampling::gen_f32;
pub use scene::{LightSampling, Scene};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types from lume_math
pub use lume_math::{Aabb, Color, Ray, Vec3};
