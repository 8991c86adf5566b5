//! Material trait for surface scattering.
//!
//! Directions follow one convention throughout: `wi` is the incoming ray
//! direction (pointing towards the surface), `wo` the outgoing direction
//! (pointing away from it, towards a light or the next bounce), and `n` the
//! unit normal on the side the ray arrived from.

use crate::sampling::uniform_hemisphere;
use lume_math::{Color, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// BRDF value for light leaving along `wo` after arriving along `wi`.
    fn eval(&self, wi: Vec3, wo: Vec3, n: Vec3) -> Color;

    /// Importance-sample an outgoing direction.
    fn sample(&self, wi: Vec3, n: Vec3, rng: &mut dyn RngCore) -> Vec3;

    /// Solid-angle density of [`Material::sample`] producing `wo`.
    fn pdf(&self, wi: Vec3, wo: Vec3, n: Vec3) -> f32;

    /// Emitted radiance. Most materials return black (no emission).
    fn emission(&self) -> Color {
        Color::ZERO
    }

    fn has_emission(&self) -> bool {
        self.emission().length_squared() > 0.0
    }
}

impl<M: Material + ?Sized> Material for Arc<M> {
    fn eval(&self, wi: Vec3, wo: Vec3, n: Vec3) -> Color {
        (**self).eval(wi, wo, n)
    }

    fn sample(&self, wi: Vec3, n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        (**self).sample(wi, n, rng)
    }

    fn pdf(&self, wi: Vec3, wo: Vec3, n: Vec3) -> f32 {
        (**self).pdf(wi, wo, n)
    }

    fn emission(&self) -> Color {
        (**self).emission()
    }

    fn has_emission(&self) -> bool {
        (**self).has_emission()
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn eval(&self, _wi: Vec3, wo: Vec3, n: Vec3) -> Color {
        if wo.dot(n) > 0.0 {
            self.albedo / PI
        } else {
            Color::ZERO
        }
    }

    fn sample(&self, _wi: Vec3, n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        uniform_hemisphere(n, rng)
    }

    fn pdf(&self, _wi: Vec3, wo: Vec3, n: Vec3) -> f32 {
        if wo.dot(n) > 0.0 {
            0.5 / PI
        } else {
            0.0
        }
    }
}

/// Diffuse light emitter. Emits uniformly and reflects nothing.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn eval(&self, _wi: Vec3, _wo: Vec3, _n: Vec3) -> Color {
        Color::ZERO
    }

    fn sample(&self, _wi: Vec3, n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        uniform_hemisphere(n, rng)
    }

    fn pdf(&self, _wi: Vec3, wo: Vec3, n: Vec3) -> f32 {
        if wo.dot(n) > 0.0 {
            0.5 / PI
        } else {
            0.0
        }
    }

    fn emission(&self) -> Color {
        self.emit
    }
}
