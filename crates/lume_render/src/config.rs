//! Render and trace configuration.
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields take the defaults below.

use crate::{ConfigError, LightSampling, SplitMethod};
use serde::{Deserialize, Serialize};

/// Parameters of the path tracing estimator and its acceleration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Paths are cut (returning black) once the depth exceeds this
    pub max_depth: u32,
    /// Survival probability of each indirect bounce
    pub russian_roulette: f32,
    /// Shadow-ray tolerance and surface offset for spawned rays
    pub epsilon: f32,
    /// BVH split heuristic
    pub split_method: SplitMethod,
    /// How next-event estimation picks a point on a light
    pub light_sampling: LightSampling,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            russian_roulette: 0.8,
            epsilon: 1e-3,
            split_method: SplitMethod::Middle,
            light_sampling: LightSampling::Linear,
        }
    }
}

impl TraceConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_russian_roulette(mut self, probability: f32) -> Self {
        self.russian_roulette = probability;
        self
    }

    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    pub fn with_light_sampling(mut self, light_sampling: LightSampling) -> Self {
        self.light_sampling = light_sampling;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.russian_roulette > 0.0 && self.russian_roulette <= 1.0) {
            return Err(ConfigError::InvalidRussianRoulette(self.russian_roulette));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel, averaged
    pub samples_per_pixel: u32,
    /// Base seed; each image row derives its own generator from it
    pub seed: u64,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub trace: TraceConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        // Framing of the classic Cornell box
        Self {
            width: 512,
            height: 512,
            samples_per_pixel: 16,
            seed: 0,
            vfov: 40.0,
            look_from: [278.0, 273.0, -800.0],
            look_at: [278.0, 273.0, 0.0],
            trace: TraceConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFov(self.vfov));
        }
        self.trace.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
        assert_eq!(TraceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_russian_roulette_bounds() {
        for p in [0.0, -0.5, 1.5, f32::NAN] {
            let trace = TraceConfig::default().with_russian_roulette(p);
            assert!(matches!(
                trace.validate(),
                Err(ConfigError::InvalidRussianRoulette(_))
            ));
        }
        let trace = TraceConfig::default().with_russian_roulette(1.0);
        assert_eq!(trace.validate(), Ok(()));
    }

    #[test]
    fn test_render_config_validation() {
        let config = RenderConfig::default().with_resolution(0, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroResolution {
                width: 0,
                height: 10
            })
        );

        let config = RenderConfig::default().with_samples(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSamples));

        let config = RenderConfig {
            vfov: 180.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidFov(180.0)));

        let config = RenderConfig::default()
            .with_trace(TraceConfig::default().with_russian_roulette(2.0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRussianRoulette(2.0))
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "width": 64,
            "samples_per_pixel": 4,
            "trace": { "split_method": "sah", "light_sampling": "hierarchy" }
        }"#;
        let config: RenderConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 512);
        assert_eq!(config.samples_per_pixel, 4);
        assert_eq!(config.trace.split_method, SplitMethod::Sah);
        assert_eq!(config.trace.light_sampling, LightSampling::Hierarchy);
        assert_eq!(config.trace.russian_roulette, 0.8);
    }

    #[test]
    fn test_json_round_trip() {
        let config = RenderConfig::default()
            .with_resolution(32, 16)
            .with_seed(9)
            .with_trace(TraceConfig::default().with_max_depth(3));
        let json = serde_json::to_string(&config).unwrap();
        let back: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
