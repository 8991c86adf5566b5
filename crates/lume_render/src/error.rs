//! Construction-time errors.
//!
//! Queries on a built scene never fail; these cover invalid input handed to
//! constructors.

use thiserror::Error;

/// Errors raised while assembling scene geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndices(usize),

    #[error("vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Errors raised by render/trace configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("russian roulette survival probability must be in (0, 1], got {0}")]
    InvalidRussianRoulette(f32),

    #[error("ray epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f32),

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("image resolution must be non-zero, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),
}
