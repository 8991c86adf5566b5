//! Intersection record produced by ray queries and surface sampling.

use crate::Material;
use lume_math::{Color, Ray, Vec3};

/// Record of a ray-primitive intersection, or of a sampled surface point.
///
/// A fresh record is produced per query. It borrows the struck primitive's
/// material but owns nothing.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    /// Whether anything was hit
    pub happened: bool,
    /// Point of intersection
    pub coords: Vec3,
    /// Surface normal. For ray hits it faces against the ray; for surface
    /// samples it is the outward geometric normal.
    pub normal: Vec3,
    /// Whether the ray hit the front (outward) face
    pub front_face: bool,
    /// Ray parameter of the hit, `f32::INFINITY` when nothing was hit
    pub distance: f32,
    /// Sub-element index, e.g. the triangle within a mesh
    pub index: usize,
    /// Emitted radiance of the surface (zero for non-emitters)
    pub emit: Color,
    /// Material at the intersection point
    pub material: Option<&'a dyn Material>,
}

impl<'a> Default for Intersection<'a> {
    fn default() -> Self {
        Self::miss()
    }
}

impl<'a> Intersection<'a> {
    /// The "no hit" record.
    pub const fn miss() -> Self {
        Self {
            happened: false,
            coords: Vec3::ZERO,
            normal: Vec3::ZERO,
            front_face: false,
            distance: f32::INFINITY,
            index: 0,
            emit: Color::ZERO,
            material: None,
        }
    }

    /// Build a hit record at parameter `t` along `ray`.
    ///
    /// The stored normal is flipped to face against the ray.
    pub fn hit(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a dyn Material) -> Self {
        let mut rec = Self {
            happened: true,
            coords: ray.at(t),
            normal: outward_normal,
            front_face: true,
            distance: t,
            index: 0,
            emit: material.emission(),
            material: Some(material),
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Build a record for a point sampled on a surface (no ray involved).
    pub fn surface_point(coords: Vec3, outward_normal: Vec3, material: &'a dyn Material) -> Self {
        Self {
            happened: true,
            coords,
            normal: outward_normal,
            front_face: true,
            distance: 0.0,
            index: 0,
            emit: material.emission(),
            material: Some(material),
        }
    }

    /// Set the face normal based on ray direction and outward normal.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    /// Tag the record with a sub-element index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Whether the struck surface is a light source.
    pub fn has_emission(&self) -> bool {
        self.material.is_some_and(|m| m.has_emission())
    }
}
