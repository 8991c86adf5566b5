use crate::{Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Defined by its minimum and maximum corners. [`Aabb::EMPTY`] has inverted
/// infinite corners and is the neutral element of [`Aabb::union`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB directly from its corners. No reordering is performed.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a zero-volume AABB around a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest AABB containing both boxes.
    pub fn union(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Smallest AABB containing this box and `p`.
    pub fn union_point(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// True when the box contains nothing (any min component above its max).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Per-axis extent (`max - min`).
    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Total area of the six faces. Zero for the empty box.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let d = self.diagonal();

        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Slab test against a ray.
    ///
    /// `inv_dir` is the componentwise reciprocal of the ray direction and
    /// `dir_is_neg` the per-axis sign of that direction; both are computed once
    /// per ray and reused for every node visited. Entry and exit parameters are
    /// swapped on negative axes so each slab yields an ordered interval, and the
    /// running intersection of the three intervals (clipped to `[0, ray.t_max]`)
    /// must be non-empty.
    #[inline]
    pub fn intersects(&self, ray: &Ray, inv_dir: Vec3, dir_is_neg: [bool; 3]) -> bool {
        let mut t_enter = 0.0_f32;
        let mut t_exit = ray.t_max;

        for axis in 0..3 {
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv_dir[axis];
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv_dir[axis];
            if dir_is_neg[axis] {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f32::max/min discard NaN from 0 * inf on axis-parallel rays.
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
        }

        t_exit >= 0.0 && t_enter <= t_exit
    }

    /// Slab test with the reciprocal direction taken from the ray itself.
    #[inline]
    pub fn hit(&self, ray: &Ray) -> bool {
        self.intersects(ray, ray.inv_direction, ray.dir_is_neg())
    }

    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
