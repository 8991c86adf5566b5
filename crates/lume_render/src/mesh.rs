//! Triangle mesh primitive.
//!
//! A mesh owns its triangles through an internal BVH, so a single scene-level
//! leaf can stand for thousands of triangles. All triangles share one
//! material.

use crate::{Bvh, Intersection, Material, Primitive, SceneError, SplitMethod, Triangle};
use lume_math::{Aabb, Color, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// An indexed triangle mesh with a shared material.
pub struct Mesh<M: Material> {
    bvh: Bvh<Triangle<Arc<M>>>,
    material: Arc<M>,
}

impl<M: Material> Mesh<M> {
    /// Build a mesh from a vertex buffer and a flat triangle index buffer.
    pub fn new(
        vertices: &[Vec3],
        indices: &[u32],
        material: M,
        split_method: SplitMethod,
    ) -> Result<Self, SceneError> {
        if indices.len() % 3 != 0 {
            return Err(SceneError::MalformedIndices(indices.len()));
        }
        if indices.is_empty() {
            return Err(SceneError::EmptyMesh);
        }

        let vertex = |index: u32| -> Result<Vec3, SceneError> {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(SceneError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })
        };

        let material = Arc::new(material);
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| -> Result<_, SceneError> {
                Ok(Triangle::new(
                    vertex(tri[0])?,
                    vertex(tri[1])?,
                    vertex(tri[2])?,
                    Arc::clone(&material),
                ))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        log::debug!(
            "Mesh: {} vertices, {} triangles",
            vertices.len(),
            triangles.len()
        );

        Ok(Self {
            bvh: Bvh::new(triangles, split_method),
            material,
        })
    }

    /// Two-triangle quad over `a, b, c, d` (in winding order).
    pub fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3, material: M) -> Result<Self, SceneError> {
        Self::new(&[a, b, c, d], &[0, 1, 2, 0, 2, 3], material, SplitMethod::Middle)
    }

    pub fn triangle_count(&self) -> usize {
        self.bvh.len()
    }

    pub fn triangles(&self) -> &[Triangle<Arc<M>>] {
        self.bvh.primitives()
    }

    pub fn material(&self) -> &M {
        &self.material
    }
}

impl<M: Material> Primitive for Mesh<M> {
    fn bounds(&self) -> Aabb {
        self.bvh.bounds()
    }

    fn area(&self) -> f32 {
        self.bvh.area()
    }

    fn intersect(&self, ray: &Ray) -> Option<(f32, usize)> {
        self.bvh
            .intersect_primitive(ray)
            .map(|(index, hit)| (hit.distance, index))
    }

    fn get_intersection(&self, ray: &Ray) -> Intersection<'_> {
        match self.bvh.intersect_primitive(ray) {
            Some((index, hit)) => hit.with_index(index),
            None => Intersection::miss(),
        }
    }

    fn emission(&self) -> Color {
        self.material.emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection<'_>, f32) {
        let u = crate::gen_f32(rng);
        // The tree is non-empty by construction; a zero-area mesh has no
        // density to offer.
        self.bvh
            .sample(u, rng)
            .unwrap_or((Intersection::miss(), 0.0))
    }
}
