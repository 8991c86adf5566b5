//! Sphere primitive for ray tracing.

use crate::sampling::uniform_sphere;
use crate::{Intersection, Material, Primitive};
use lume_math::{Aabb, Color, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A sphere primitive.
pub struct Sphere<M: Material> {
    center: Vec3,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Nearest positive root of the ray/sphere quadratic within `ray.t_max`.
    fn solve(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let valid = |t: f32| t > 0.0 && t < ray.t_max;

        let near = (h - sqrtd) / a;
        if valid(near) {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        valid(far).then_some(far)
    }
}

impl<M: Material> Primitive for Sphere<M> {
    fn bounds(&self) -> Aabb {
        self.bbox
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn intersect(&self, ray: &Ray) -> Option<(f32, usize)> {
        self.solve(ray).map(|t| (t, 0))
    }

    fn get_intersection(&self, ray: &Ray) -> Intersection<'_> {
        match self.solve(ray) {
            Some(t) => {
                let outward_normal = (ray.at(t) - self.center) / self.radius;
                Intersection::hit(ray, t, outward_normal, &self.material)
            }
            None => Intersection::miss(),
        }
    }

    fn emission(&self) -> Color {
        self.material.emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection<'_>, f32) {
        let dir = uniform_sphere(rng);
        let pos = Intersection::surface_point(self.center + dir * self.radius, dir, &self.material);
        let area = self.area();
        let pdf = if area > 0.0 { 1.0 / area } else { 0.0 };
        (pos, pdf)
    }
}
