//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::sampling::uniform_triangle;
use crate::{Intersection, Material, Primitive};
use lume_math::{Aabb, Color, Ray, Vec3};
use rand::RngCore;

/// A triangle primitive.
pub struct Triangle<M: Material> {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Edges from v0
    e1: Vec3,
    e2: Vec3,
    /// Face normal (unit length, from the winding order)
    normal: Vec3,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let cross = e1.cross(e2);
        let area = cross.length() * 0.5;
        // Degenerate triangles keep a zero normal and never report hits.
        let normal = cross.normalize_or_zero();
        let bbox = Aabb::from_points(v0, v1).union_point(v2);

        Self {
            v0,
            v1,
            v2,
            e1,
            e2,
            normal,
            area,
            material,
            bbox,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Möller-Trumbore. Double-sided; returns the hit parameter.
    fn solve(&self, ray: &Ray) -> Option<f32> {
        let h = ray.direction.cross(self.e2);
        let a = self.e1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.e1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.e2.dot(q);
        (t > 0.0 && t < ray.t_max).then_some(t)
    }
}

impl<M: Material> Primitive for Triangle<M> {
    fn bounds(&self) -> Aabb {
        self.bbox
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn intersect(&self, ray: &Ray) -> Option<(f32, usize)> {
        self.solve(ray).map(|t| (t, 0))
    }

    fn get_intersection(&self, ray: &Ray) -> Intersection<'_> {
        match self.solve(ray) {
            Some(t) => Intersection::hit(ray, t, self.normal, &self.material),
            None => Intersection::miss(),
        }
    }

    fn emission(&self) -> Color {
        self.material.emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection<'_>, f32) {
        let (w0, w1, w2) = uniform_triangle(rng);
        let p = self.v0 * w0 + self.v1 * w1 + self.v2 * w2;
        let pdf = if self.area > 0.0 { 1.0 / self.area } else { 0.0 };
        (Intersection::surface_point(p, self.normal, &self.material), pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn xy_triangle(z: f32) -> Triangle<Lambertian> {
        Triangle::new(
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
            Lambertian::new(Vec3::new(0.5, 0.5, 0.5)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle(-2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.get_intersection(&ray);
        assert!(rec.happened);
        assert!((rec.distance - 2.0).abs() < 1e-6);
        assert!((rec.coords - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-6);
        // Counter-clockwise winding seen from +z: normal +z faces the ray
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_triangle_hit_back_face() {
        let tri = xy_triangle(-2.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z);

        let rec = tri.get_intersection(&ray);
        assert!(rec.happened);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle(-1.0);

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(!tri.get_intersection(&ray).happened);

        // Ray passing beside the triangle
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_unnormalized_direction() {
        let tri = xy_triangle(-2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        let (t, _) = tri.intersect(&ray).expect("should hit");
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_area_and_bounds() {
        let tri = xy_triangle(3.0);
        assert!((tri.area() - 2.0).abs() < 1e-6);
        assert_eq!(tri.bounds().min, Vec3::new(-1.0, -1.0, 3.0));
        assert_eq!(tri.bounds().max, Vec3::new(1.0, 1.0, 3.0));

        let [v0, v1, v2] = tri.vertices();
        assert_eq!(v0, Vec3::new(-1.0, -1.0, 3.0));
        assert_eq!(v1, Vec3::new(1.0, -1.0, 3.0));
        assert_eq!(v2, Vec3::new(0.0, 1.0, 3.0));
        // Counter-clockwise seen from +Z
        assert_eq!(tri.normal(), Vec3::Z);
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Lambertian::new(Vec3::ONE));
        assert_eq!(tri.area(), 0.0);
        let ray = Ray::new(Vec3::new(0.5, 1.0, 0.0), -Vec3::Y);
        assert!(tri.intersect(&ray).is_none());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(tri.sample(&mut rng).1, 0.0);
    }

    #[test]
    fn test_triangle_sample_inside() {
        let tri = xy_triangle(0.0);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let (pos, pdf) = tri.sample(&mut rng);
            assert!((pdf - 0.5).abs() < 1e-6);
            assert_eq!(pos.coords.z, 0.0);
            assert!(pos.coords.x.abs() <= 1.0 + 1e-5);
            assert!(pos.coords.y >= -1.0 - 1e-5 && pos.coords.y <= 1.0 + 1e-5);
            // Above the base the triangle narrows towards the apex at (0, 1).
            assert!(pos.coords.x.abs() <= (1.0 - pos.coords.y) * 0.5 + 1e-4);
        }
    }
}
