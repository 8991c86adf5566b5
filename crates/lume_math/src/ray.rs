use crate::Vec3;

/// A ray in 3D space with origin and direction.
///
/// The direction is not required to be unit length. Hit distances are ray
/// parameters, so they are measured in multiples of the direction's magnitude.
/// The reciprocal of the direction is computed once at construction and reused
/// by every bounding box test of a traversal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Componentwise `1 / direction`. Zero components map to infinities.
    pub inv_direction: Vec3,
    /// Largest parameter considered a hit; `f32::INFINITY` unless clipped.
    pub t_max: f32,
}

impl Ray {
    /// Create a new unbounded ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
            t_max: f32::INFINITY,
        }
    }

    /// Clip the ray to `t_max`.
    pub fn with_t_max(mut self, t_max: f32) -> Self {
        self.t_max = t_max;
        self
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Per-axis sign of the direction, as consumed by [`crate::Aabb::intersects`].
    ///
    /// Read from the sign bit so that `-0.0`, whose reciprocal is `-inf`,
    /// counts as negative.
    #[inline]
    pub fn dir_is_neg(&self) -> [bool; 3] {
        [
            self.direction.x.is_sign_negative(),
            self.direction.y.is_sign_negative(),
            self.direction.z.is_sign_negative(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 2.0, -4.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.inv_direction.y, 0.5);
        assert_eq!(ray.inv_direction.z, -0.25);
        assert!(ray.inv_direction.x.is_infinite());
        assert_eq!(ray.t_max, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_at_unnormalized_direction() {
        // Parameters scale with the direction's length.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(ray.at(1.5), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_dir_is_neg() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(ray.dir_is_neg(), [true, false, false]);
    }

    #[test]
    fn test_dir_is_neg_negative_zero() {
        // Negating an axis constant leaves -0.0 on the other axes
        let ray = Ray::new(Vec3::ZERO, -Vec3::Y);
        assert_eq!(ray.dir_is_neg(), [true, true, true]);
        assert_eq!(ray.inv_direction.x, f32::NEG_INFINITY);
        assert_eq!(ray.inv_direction.z, f32::NEG_INFINITY);
    }

    #[test]
    fn test_with_t_max() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y).with_t_max(5.0);
        assert_eq!(ray.t_max, 5.0);
    }
}
