//! Pixel loop and image output helpers.
//!
//! Each pixel averages `samples_per_pixel` jittered camera rays through
//! [`Scene::cast_ray`]. Rows are rendered in parallel with rayon, each row
//! drawing from its own generator seeded from the render seed, so output is
//! identical for a fixed seed whatever the thread count.

use crate::{Camera, RenderConfig, Scene};
use lume_math::Color;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples_per_pixel {
        let ray = camera.generate_ray(x, y, rng);
        pixel_color += scene.cast_ray(&ray, 0, rng);
    }

    pixel_color / samples_per_pixel.max(1) as f32
}

/// Linear radiance image, row-major from the top-left pixel.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Seed for one image row. Mixing the row index keeps neighbouring rows
/// decorrelated.
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render the entire scene to an image buffer.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.width(), camera.height());
    let width = image.width as usize;
    if width == 0 {
        return image;
    }

    log::info!(
        "Rendering {}x{} at {} spp",
        image.width,
        image.height,
        config.samples_per_pixel
    );
    let start = Instant::now();

    image
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            let mut rng = StdRng::seed_from_u64(row_seed(config.seed, y));
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(
                    camera,
                    scene,
                    x as u32,
                    y,
                    config.samples_per_pixel,
                    &mut rng,
                );
            }
        });

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, Lambertian, Primitive, Sphere, TraceConfig};
    use lume_math::Vec3;
    use std::sync::Arc;

    fn test_scene() -> Scene {
        let objects: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(Sphere::new(
                Vec3::new(0.0, 0.0, -3.0),
                1.0,
                Lambertian::new(Color::splat(0.5)),
            )),
            Arc::new(Sphere::new(
                Vec3::new(0.0, 3.0, 0.0),
                1.0,
                DiffuseLight::new(Color::splat(4.0)),
            )),
        ];
        Scene::new(objects, TraceConfig::default()).unwrap()
    }

    fn test_camera(width: u32, height: u32) -> Camera {
        Camera::look_at(Vec3::ZERO, -Vec3::Z, 60.0, width, height)
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        // Overexposed values clamp
        assert_eq!(color_to_rgba(Color::new(9.0, 0.25, -2.0)), [255, 127, 0, 255]);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(4, 2);
        image.set(3, 1, Color::ONE);
        assert_eq!(image.get(3, 1), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);

        let bytes = image.to_rgba();
        assert_eq!(bytes.len(), 4 * 2 * 4);
        assert_eq!(&bytes[28..32], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_render_pixel() {
        let scene = test_scene();
        let camera = test_camera(10, 10);
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel hits the diffuse sphere, lit from above the camera
        let color = render_pixel(&camera, &scene, 5, 5, 16, &mut rng);
        assert!(color.length() > 0.0);

        // Corner pixel looks past both spheres
        let color = render_pixel(&camera, &scene, 0, 9, 4, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = test_scene();
        let camera = test_camera(16, 12);
        let config = RenderConfig::default()
            .with_resolution(16, 12)
            .with_samples(2)
            .with_seed(7);

        let a = render(&camera, &scene, &config);
        let b = render(&camera, &scene, &config);
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.pixels.len(), 16 * 12);

        let c = render(&camera, &scene, &config.clone().with_seed(8));
        assert_ne!(a.pixels, c.pixels);
    }
}
