//! Random sampling helpers.
//!
//! All randomness flows through an explicitly passed `&mut dyn RngCore`, so a
//! seeded generator reproduces a render exactly.

use lume_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed direction on the hemisphere around `n` (unit length).
///
/// Density is `1 / (2 * PI)` per steradian.
pub fn uniform_hemisphere(n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let z = gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    to_world(Vec3::new(r * phi.cos(), r * phi.sin(), z), n)
}

/// Uniformly distributed point on the unit sphere.
pub fn uniform_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let z = 1.0 - 2.0 * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Barycentric weights `(w0, w1, w2)` uniformly distributed over a triangle.
pub fn uniform_triangle(rng: &mut dyn RngCore) -> (f32, f32, f32) {
    let su = gen_f32(rng).sqrt();
    let v = gen_f32(rng);
    (1.0 - su, su * (1.0 - v), su * v)
}

/// Rotate a vector from the local frame (z up) into the frame around `n`.
#[inline]
pub fn to_world(local: Vec3, n: Vec3) -> Vec3 {
    let (t, b) = n.any_orthonormal_pair();
    t * local.x + b * local.y + n * local.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_hemisphere_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(2);
        let n = Vec3::new(1.0, 2.0, -0.5).normalize();
        for _ in 0..1000 {
            let d = uniform_hemisphere(n, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.dot(n) >= -1e-6);
        }
    }

    #[test]
    fn test_hemisphere_mean_cosine() {
        // E[cos] = 1/2 for a uniform hemisphere.
        let mut rng = StdRng::seed_from_u64(3);
        let n = Vec3::Y;
        let count = 20_000;
        let mean: f32 = (0..count)
            .map(|_| uniform_hemisphere(n, &mut rng).dot(n))
            .sum::<f32>()
            / count as f32;
        assert!((mean - 0.5).abs() < 0.02, "mean cosine {mean}");
    }

    #[test]
    fn test_uniform_sphere_is_unit() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            assert!((uniform_sphere(&mut rng).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_barycentrics_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let (a, b, c) = uniform_triangle(&mut rng);
            assert!(a >= 0.0 && b >= 0.0 && c >= 0.0);
            assert!((a + b + c - 1.0).abs() < 1e-5);
        }
    }
}
