//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over primitive bounds. Leaves hold exactly one primitive
//! (by index into the accelerator's primitive list) and every node caches
//! the summed surface area of the primitives below it, which drives
//! area-weighted point sampling.

use crate::{Intersection, Primitive};
use lume_math::{Aabb, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Number of equal-count buckets evaluated by the SAH split.
const SAH_BUCKETS: usize = 32;

/// Strategy for partitioning primitives at an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Split the centroid-sorted list at its midpoint.
    #[default]
    Middle,
    /// Pick the bucket boundary with the lowest surface area heuristic cost.
    Sah,
}

/// BVH node - either a branch with two children or a leaf with one primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
        area: f32,
    },
    /// Leaf node referencing a primitive of the owning [`Bvh`].
    Leaf {
        primitive: usize,
        bbox: Aabb,
        area: f32,
    },
}

impl BvhNode {
    /// Join two subtrees. The box is the union of the children's boxes and
    /// the area their sum.
    fn branch(left: BvhNode, right: BvhNode) -> Self {
        let bbox = Aabb::union(&left.bbox(), &right.bbox());
        let area = left.area() + right.area();
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
            area,
        }
    }

    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    /// Summed primitive area of the subtree.
    pub fn area(&self) -> f32 {
        match self {
            BvhNode::Branch { area, .. } | BvhNode::Leaf { area, .. } => *area,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Number of edges on the longest root-to-leaf path (a lone leaf is 0).
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 0,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

/// Per-primitive data cached for the duration of a build.
#[derive(Debug, Clone, Copy)]
struct BuildItem {
    index: usize,
    bbox: Aabb,
    centroid: Vec3,
    area: f32,
}

/// Bounding volume hierarchy over a list of primitives.
///
/// Built once, read-only afterwards. An empty primitive list produces a tree
/// without a root; every query on it misses.
pub struct Bvh<P: Primitive> {
    root: Option<BvhNode>,
    primitives: Vec<P>,
    split_method: SplitMethod,
}

impl<P: Primitive> Bvh<P> {
    /// Build a BVH over `primitives` with the given split strategy.
    pub fn new(primitives: Vec<P>, split_method: SplitMethod) -> Self {
        if primitives.is_empty() {
            return Self {
                root: None,
                primitives,
                split_method,
            };
        }

        let start = Instant::now();
        let items: Vec<BuildItem> = primitives
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let bbox = p.bounds();
                BuildItem {
                    index,
                    bbox,
                    centroid: bbox.centroid(),
                    area: p.area(),
                }
            })
            .collect();

        let root = Self::build(items, split_method);

        log::info!(
            "BVH built: {} primitives, {:?} split, {} nodes, depth {} in {:?}",
            primitives.len(),
            split_method,
            root.node_count(),
            root.depth(),
            start.elapsed()
        );

        Self {
            root: Some(root),
            primitives,
            split_method,
        }
    }

    /// Recursive construction over a non-empty item list.
    fn build(mut items: Vec<BuildItem>, split_method: SplitMethod) -> BvhNode {
        match items.as_slice() {
            [only] => return Self::leaf(only),
            [a, b] => return BvhNode::branch(Self::leaf(a), Self::leaf(b)),
            _ => {}
        }

        // Choose split axis based on centroid spread
        let centroid_bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| acc.union_point(item.centroid));
        let axis = centroid_bounds.longest_axis();

        // Stable sort keeps the build deterministic for equal centroids
        items.sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

        let mid = match split_method {
            SplitMethod::Middle => items.len() / 2,
            SplitMethod::Sah => Self::sah_split(&items),
        };

        let right_items = items.split_off(mid);
        let left = Self::build(items, split_method);
        let right = Self::build(right_items, split_method);

        BvhNode::branch(left, right)
    }

    fn leaf(item: &BuildItem) -> BvhNode {
        BvhNode::Leaf {
            primitive: item.index,
            bbox: item.bbox,
            area: item.area,
        }
    }

    /// Split position for a centroid-sorted list of at least three items.
    ///
    /// Evaluates the boundaries between [`SAH_BUCKETS`] equal-count buckets
    /// with `cost = SA(L)/SA(N) * |L| + SA(R)/SA(N) * |R|` and returns the
    /// cheapest. Boundaries leaving either side empty are skipped.
    fn sah_split(items: &[BuildItem]) -> usize {
        let n = items.len();

        // prefix[i] bounds items[..=i], suffix[i] bounds items[i..]
        let mut prefix = Vec::with_capacity(n);
        let mut acc = Aabb::EMPTY;
        for item in items {
            acc = Aabb::union(&acc, &item.bbox);
            prefix.push(acc);
        }
        let mut suffix = vec![Aabb::EMPTY; n];
        let mut acc = Aabb::EMPTY;
        for (i, item) in items.iter().enumerate().rev() {
            acc = Aabb::union(&acc, &item.bbox);
            suffix[i] = acc;
        }

        let total_area = suffix[0].surface_area();
        let inv_total = if total_area > 0.0 { 1.0 / total_area } else { 1.0 };

        let mut best_cost = f32::INFINITY;
        let mut best_mid = n / 2;
        for bucket in 1..SAH_BUCKETS {
            let mid = n * bucket / SAH_BUCKETS;
            if mid == 0 || mid == n {
                continue;
            }
            let left_cost = prefix[mid - 1].surface_area() * inv_total * mid as f32;
            let right_cost = suffix[mid].surface_area() * inv_total * (n - mid) as f32;
            let cost = left_cost + right_cost;
            if cost < best_cost {
                best_cost = cost;
                best_mid = mid;
            }
        }
        best_mid
    }

    /// Nearest intersection along `ray`, or [`Intersection::miss`].
    pub fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        self.intersect_primitive(ray)
            .map(|(_, hit)| hit)
            .unwrap_or_default()
    }

    /// Nearest intersection together with the index of the primitive hit.
    pub fn intersect_primitive(&self, ray: &Ray) -> Option<(usize, Intersection<'_>)> {
        let root = self.root.as_ref()?;
        // Reciprocal and signs are computed once and reused at every node.
        let inv_dir = ray.direction.recip();
        let dir_is_neg = ray.dir_is_neg();
        self.traverse(root, ray, inv_dir, dir_is_neg)
    }

    fn traverse<'a>(
        &'a self,
        node: &'a BvhNode,
        ray: &Ray,
        inv_dir: Vec3,
        dir_is_neg: [bool; 3],
    ) -> Option<(usize, Intersection<'a>)> {
        if !node.bbox().intersects(ray, inv_dir, dir_is_neg) {
            return None;
        }

        match node {
            BvhNode::Leaf { primitive, .. } => {
                let hit = self.primitives[*primitive].get_intersection(ray);
                hit.happened.then_some((*primitive, hit))
            }
            BvhNode::Branch { left, right, .. } => {
                let hit_left = self.traverse(left, ray, inv_dir, dir_is_neg);
                let hit_right = self.traverse(right, ray, inv_dir, dir_is_neg);
                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if r.1.distance < l.1.distance { r } else { l }),
                    (l, r) => l.or(r),
                }
            }
        }
    }

    /// Sample a point on the union of all primitive surfaces with density
    /// proportional to area.
    ///
    /// `u` in [0, 1) selects the primitive by cumulative area; `rng` drives the
    /// primitive's own surface sampling. The returned pdf is `1 / total area`.
    /// Returns `None` for an empty tree or one with zero total area.
    ///
    /// Every primitive in the tree is a candidate, so this is light sampling
    /// only when the tree was built over emitters alone.
    pub fn sample(&self, u: f32, rng: &mut dyn RngCore) -> Option<(Intersection<'_>, f32)> {
        let root = self.root.as_ref()?;
        let total = root.area();
        if total <= 0.0 {
            return None;
        }

        let (pos, pdf) = self.sample_node(root, u * total, rng);
        Some((pos, pdf / total))
    }

    fn sample_node<'a>(
        &'a self,
        node: &'a BvhNode,
        p: f32,
        rng: &mut dyn RngCore,
    ) -> (Intersection<'a>, f32) {
        match node {
            BvhNode::Leaf {
                primitive, area, ..
            } => {
                let (pos, pdf) = self.primitives[*primitive].sample(rng);
                // Undo the primitive's 1/area so the caller can normalize once.
                (pos, pdf * area)
            }
            BvhNode::Branch { left, right, .. } => {
                if p < left.area() {
                    self.sample_node(left, p, rng)
                } else {
                    self.sample_node(right, p - left.area(), rng)
                }
            }
        }
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Bounds of the whole tree ([`Aabb::EMPTY`] when empty).
    pub fn bounds(&self) -> Aabb {
        self.root.as_ref().map_or(Aabb::EMPTY, BvhNode::bbox)
    }

    /// Summed area of all primitives.
    pub fn area(&self) -> f32 {
        self.root.as_ref().map_or(0.0, BvhNode::area)
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::depth)
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::node_count)
    }
}
