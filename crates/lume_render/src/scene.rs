//! Scene container and path tracing estimator.
//!
//! Implements unidirectional path tracing with:
//! - Next-event estimation: one explicit light sample per path vertex
//! - Russian roulette termination, reweighted to stay unbiased
//! - A hard depth cap as a backstop

use crate::sampling::gen_f32;
use crate::{Bvh, ConfigError, Intersection, Material, Primitive, TraceConfig};
use lume_math::{Color, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Strategy for picking a point on a light during next-event estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightSampling {
    /// Linear scan over emitters by cumulative area.
    #[default]
    Linear,
    /// Area-weighted descent of a BVH built over emitters only.
    Hierarchy,
}

enum LightSampler {
    Linear {
        /// Indices of emitters with non-zero area
        emitters: Vec<usize>,
        total_area: f32,
    },
    Hierarchy(Bvh<Arc<dyn Primitive>>),
}

/// A renderable scene: primitives, their BVH and the light sampler.
///
/// Immutable once built and safe to share across render threads.
pub struct Scene {
    objects: Vec<Arc<dyn Primitive>>,
    bvh: Bvh<Arc<dyn Primitive>>,
    lights: LightSampler,
    config: TraceConfig,
}

impl Scene {
    /// Build the accelerator and light index over `objects`.
    pub fn new(objects: Vec<Arc<dyn Primitive>>, config: TraceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bvh = Bvh::new(objects.clone(), config.split_method);

        let emitters: Vec<usize> = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.has_emission() && o.area() > 0.0)
            .map(|(i, _)| i)
            .collect();
        let total_area: f32 = emitters.iter().map(|&i| objects[i].area()).sum();

        log::debug!(
            "Scene: {} objects, {} emitters, emissive area {}",
            objects.len(),
            emitters.len(),
            total_area
        );
        if total_area <= 0.0 {
            log::warn!("Scene has no emissive area; direct lighting will be black");
        }

        let lights = match config.light_sampling {
            LightSampling::Linear => LightSampler::Linear {
                emitters,
                total_area,
            },
            LightSampling::Hierarchy => LightSampler::Hierarchy(Bvh::new(
                emitters.iter().map(|&i| Arc::clone(&objects[i])).collect(),
                config.split_method,
            )),
        };

        Ok(Self {
            objects,
            bvh,
            lights,
            config,
        })
    }

    pub fn objects(&self) -> &[Arc<dyn Primitive>] {
        &self.objects
    }

    pub fn bvh(&self) -> &Bvh<Arc<dyn Primitive>> {
        &self.bvh
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Nearest intersection in the scene.
    pub fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        self.bvh.intersect(ray)
    }

    /// Sample a point on a light with density proportional to emissive area.
    ///
    /// The returned pdf is with respect to area over all emitters, i.e.
    /// `1 / total emissive area`. Returns `None` when the scene has no
    /// emissive area.
    pub fn sample_light(&self, rng: &mut dyn RngCore) -> Option<(Intersection<'_>, f32)> {
        match &self.lights {
            LightSampler::Linear {
                emitters,
                total_area,
            } => {
                if *total_area <= 0.0 {
                    return None;
                }
                let p = gen_f32(rng) * total_area;
                let mut running = 0.0;
                let chosen = emitters
                    .iter()
                    .map(|&i| &self.objects[i])
                    .find(|o| {
                        running += o.area();
                        p <= running
                    })
                    // Rounding can leave p just above the final running sum.
                    .or_else(|| emitters.last().map(|&i| &self.objects[i]))?;

                let area = chosen.area();
                let (pos, pdf) = chosen.sample(rng);
                Some((pos, pdf * area / total_area))
            }
            LightSampler::Hierarchy(lights) => {
                let u = gen_f32(rng);
                lights.sample(u, rng)
            }
        }
    }

    /// Estimate the radiance arriving along `ray`.
    ///
    /// Entry point for the pixel loop, called with `depth = 0`.
    pub fn cast_ray(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth > self.config.max_depth {
            return Color::ZERO;
        }
        let hit = self.intersect(ray);
        if !hit.happened {
            return Color::ZERO;
        }
        self.shade(ray, &hit, depth, rng)
    }

    /// Radiance leaving `hit` back along `ray`.
    fn shade(&self, ray: &Ray, hit: &Intersection<'_>, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth > self.config.max_depth {
            return Color::ZERO;
        }
        let Some(material) = hit.material else {
            return Color::ZERO;
        };

        // Camera or bounce ray hit a light source
        if material.has_emission() {
            return material.emission();
        }

        let direct = self.direct_light(ray, hit, material, rng);
        let indirect = self.indirect_light(ray, hit, material, depth, rng);
        direct + indirect
    }

    /// Next-event estimation towards one sampled light point.
    fn direct_light(
        &self,
        ray: &Ray,
        hit: &Intersection<'_>,
        material: &dyn Material,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Some((light, light_pdf)) = self.sample_light(rng) else {
            return Color::ZERO;
        };
        if light_pdf <= 0.0 {
            return Color::ZERO;
        }

        let eps = self.config.epsilon;
        let n = hit.normal;
        let wi = ray.direction.normalize();
        let origin = hit.coords + n * eps;

        let to_light = light.coords - origin;
        let dist2 = to_light.length_squared();
        let dist = dist2.sqrt();
        if dist <= eps {
            return Color::ZERO;
        }
        let ws = to_light / dist;

        // Blocked unless nothing is hit closer than the light point itself
        let blocker = self.intersect(&Ray::new(origin, ws));
        if blocker.distance - dist <= -eps {
            return Color::ZERO;
        }

        let cos_theta = ws.dot(n).max(0.0);
        // Emitters radiate from both faces
        let cos_light = ws.dot(light.normal).abs();

        light.emit * material.eval(wi, ws, n) * cos_theta * cos_light / dist2 / light_pdf
    }

    /// One Russian-roulette continuation bounce.
    fn indirect_light(
        &self,
        ray: &Ray,
        hit: &Intersection<'_>,
        material: &dyn Material,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let survival = self.config.russian_roulette;
        if gen_f32(rng) >= survival {
            return Color::ZERO;
        }

        let n = hit.normal;
        let wi = ray.direction.normalize();
        let wo = material.sample(wi, n, rng).normalize();
        let pdf = material.pdf(wi, wo, n);
        if pdf <= 0.0 {
            return Color::ZERO;
        }

        let bounce = Ray::new(hit.coords + n * self.config.epsilon, wo);
        let next = self.intersect(&bounce);
        // Emitters reached by a bounce are already counted by direct lighting
        if !next.happened || next.has_emission() {
            return Color::ZERO;
        }

        self.shade(&bounce, &next, depth + 1, rng) * material.eval(wi, wo, n) * wo.dot(n)
            / pdf
            / survival
    }
}
