//! Primitive capability trait.
//!
//! The accelerator and the path tracer only ever talk to geometry through
//! this trait; concrete shapes live in their own modules.

use crate::Intersection;
use lume_math::{Aabb, Color, Ray};
use rand::RngCore;
use std::sync::Arc;

/// Geometry that can be bounded, intersected and sampled by area.
pub trait Primitive: Send + Sync {
    /// Axis-aligned bounds of the primitive.
    fn bounds(&self) -> Aabb;

    /// Total surface area.
    fn area(&self) -> f32;

    /// Nearest hit parameter along `ray` and the index of the sub-element hit
    /// (always 0 for single shapes).
    fn intersect(&self, ray: &Ray) -> Option<(f32, usize)>;

    /// Full intersection record for `ray`, or [`Intersection::miss`].
    fn get_intersection(&self, ray: &Ray) -> Intersection<'_>;

    /// Emitted radiance of the primitive's material.
    fn emission(&self) -> Color;

    fn has_emission(&self) -> bool {
        self.emission().length_squared() > 0.0
    }

    /// Point sampled uniformly by area, with its density `1 / area`.
    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection<'_>, f32);
}

macro_rules! forward_primitive {
    ($wrapper:ident) => {
        impl<P: Primitive + ?Sized> Primitive for $wrapper<P> {
            fn bounds(&self) -> Aabb {
                (**self).bounds()
            }

            fn area(&self) -> f32 {
                (**self).area()
            }

            fn intersect(&self, ray: &Ray) -> Option<(f32, usize)> {
                (**self).intersect(ray)
            }

            fn get_intersection(&self, ray: &Ray) -> Intersection<'_> {
                (**self).get_intersection(ray)
            }

            fn emission(&self) -> Color {
                (**self).emission()
            }

            fn has_emission(&self) -> bool {
                (**self).has_emission()
            }

            fn sample(&self, rng: &mut dyn RngCore) -> (Intersection<'_>, f32) {
                (**self).sample(rng)
            }
        }
    };
}

forward_primitive!(Arc);
forward_primitive!(Box);
