//! Pinhole camera for ray generation.

use crate::{gen_f32, RenderConfig};
use lume_math::{Ray, Vec3};
use rand::RngCore;

/// Pinhole camera with the image plane one unit in front of the eye.
///
/// Pixel `(0, 0)` is the top-left corner of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    width: u32,
    height: u32,
    eye: Vec3,
    /// Center of pixel (0, 0) on the image plane.
    origin_pixel: Vec3,
    step_x: Vec3,
    step_y: Vec3,
}

impl Camera {
    /// Camera at `eye` looking towards `target` with +Y up.
    ///
    /// `vfov` is the vertical field of view in degrees.
    pub fn look_at(eye: Vec3, target: Vec3, vfov: f32, width: u32, height: u32) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);

        let half_height = (vfov.to_radians() * 0.5).tan();
        let half_width = half_height * width as f32 / height.max(1) as f32;

        let step_x = right * (2.0 * half_width / width.max(1) as f32);
        let step_y = -up * (2.0 * half_height / height.max(1) as f32);
        let top_left = eye + forward - right * half_width + up * half_height;

        Self {
            width,
            height,
            eye,
            origin_pixel: top_left + 0.5 * (step_x + step_y),
            step_x,
            step_y,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::look_at(
            config.look_from.into(),
            config.look_at.into(),
            config.vfov,
            config.width,
            config.height,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Unit-length ray through pixel `(x, y)`, jittered uniformly within the
    /// pixel footprint.
    pub fn generate_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let jx = x as f32 + gen_f32(rng) - 0.5;
        let jy = y as f32 + gen_f32(rng) - 0.5;
        let target = self.origin_pixel + jx * self.step_x + jy * self.step_y;
        Ray::new(self.eye, (target - self.eye).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_center_pixel_looks_forward() {
        let camera = Camera::look_at(Vec3::ZERO, -Vec3::Z, 90.0, 101, 101);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.generate_ray(50, 50, &mut rng);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!(ray.direction.z < -0.99);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_image_corners() {
        let camera = Camera::look_at(Vec3::ZERO, -Vec3::Z, 90.0, 100, 100);
        let mut rng = StdRng::seed_from_u64(3);

        let top_left = camera.generate_ray(0, 0, &mut rng);
        assert!(top_left.direction.x < 0.0 && top_left.direction.y > 0.0);

        let bottom_right = camera.generate_ray(99, 99, &mut rng);
        assert!(bottom_right.direction.x > 0.0 && bottom_right.direction.y < 0.0);

        // 90 degrees: the image edge sits at 45 degrees off axis
        let edge = camera.generate_ray(99, 50, &mut rng);
        let angle = edge.direction.x.atan2(-edge.direction.z).to_degrees();
        assert!((angle - 45.0).abs() < 1.5, "edge angle {angle}");
    }

    #[test]
    fn test_jitter_stays_in_pixel() {
        let camera = Camera::look_at(Vec3::ZERO, -Vec3::Z, 60.0, 4, 4);
        let mut rng = StdRng::seed_from_u64(9);

        // Pixel (3, 0) covers the top-right quarter-column of the image
        for _ in 0..200 {
            let ray = camera.generate_ray(3, 0, &mut rng);
            let p = ray.direction / -ray.direction.z;
            let half = (30.0f32).to_radians().tan();
            assert!(p.x >= half * 0.5 - 1e-5 && p.x <= half + 1e-5);
            assert!(p.y >= half * 0.5 - 1e-5 && p.y <= half + 1e-5);
        }
    }

    #[test]
    fn test_camera_from_config() {
        let config = RenderConfig::default().with_resolution(64, 32);
        let camera = Camera::from_config(&config);
        assert_eq!(camera.width(), 64);
        assert_eq!(camera.height(), 32);
        assert_eq!(camera.eye(), Vec3::new(278.0, 273.0, -800.0));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = camera.generate_ray(32, 16, &mut rng);
        assert_eq!(ray.origin, camera.eye());
        assert!(ray.direction.z > 0.99);
    }
}
