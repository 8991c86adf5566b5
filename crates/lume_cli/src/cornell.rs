//! The Cornell box, built from quads and two blocks.
//!
//! Units are millimetres. The camera looks down +Z, so the red wall at
//! `x = 556` appears on the left of the image.

use lume_render::{DiffuseLight, Lambertian, Mesh, Primitive, SceneError, SplitMethod};
use lume_math::{Color, Vec3};
use std::sync::Arc;

const WIDTH: f32 = 556.0;
const HEIGHT: f32 = 548.8;
const DEPTH: f32 = 559.2;

fn red() -> Lambertian {
    Lambertian::new(Color::new(0.63, 0.065, 0.05))
}

fn green() -> Lambertian {
    Lambertian::new(Color::new(0.14, 0.45, 0.091))
}

fn white() -> Lambertian {
    Lambertian::new(Color::new(0.725, 0.71, 0.68))
}

/// Radiance of the ceiling light, a blend of three measured spectral peaks.
fn light_emission() -> Color {
    8.0 * Color::new(0.747 + 0.058, 0.747 + 0.258, 0.747)
        + 15.6 * Color::new(0.740 + 0.287, 0.740 + 0.160, 0.740)
        + 18.4 * Color::new(0.737 + 0.642, 0.737 + 0.159, 0.737)
}

fn quad(
    a: [f32; 3],
    b: [f32; 3],
    c: [f32; 3],
    d: [f32; 3],
    material: Lambertian,
) -> Result<Arc<dyn Primitive>, SceneError> {
    Ok(Arc::new(Mesh::quad(
        a.into(),
        b.into(),
        c.into(),
        d.into(),
        material,
    )?))
}

/// A block standing on the floor, given its top face in winding order.
fn block(
    top: [[f32; 3]; 4],
    material: Lambertian,
    split_method: SplitMethod,
) -> Result<Arc<dyn Primitive>, SceneError> {
    let top: Vec<Vec3> = top.iter().map(|&p| Vec3::from(p)).collect();
    let bottom = top.iter().map(|p| Vec3::new(p.x, 0.0, p.z));
    let vertices: Vec<Vec3> = top.iter().copied().chain(bottom).collect();

    // 0..4 top ring, 4..8 bottom ring
    let mut indices = vec![0, 1, 2, 0, 2, 3];
    for i in 0..4u32 {
        let j = (i + 1) % 4;
        indices.extend_from_slice(&[i + 4, j + 4, j, i + 4, j, i]);
    }

    Ok(Arc::new(Mesh::new(&vertices, &indices, material, split_method)?))
}

/// All primitives of the Cornell box scene.
pub fn build(split_method: SplitMethod) -> Result<Vec<Arc<dyn Primitive>>, SceneError> {
    let light: Arc<dyn Primitive> = Arc::new(Mesh::quad(
        Vec3::new(343.0, 548.7, 227.0),
        Vec3::new(343.0, 548.7, 332.0),
        Vec3::new(213.0, 548.7, 332.0),
        Vec3::new(213.0, 548.7, 227.0),
        DiffuseLight::new(light_emission()),
    )?);

    let objects = vec![
        // Floor
        quad(
            [0.0, 0.0, 0.0],
            [0.0, 0.0, DEPTH],
            [WIDTH, 0.0, DEPTH],
            [WIDTH, 0.0, 0.0],
            white(),
        )?,
        // Ceiling
        quad(
            [0.0, HEIGHT, 0.0],
            [WIDTH, HEIGHT, 0.0],
            [WIDTH, HEIGHT, DEPTH],
            [0.0, HEIGHT, DEPTH],
            white(),
        )?,
        // Back wall
        quad(
            [0.0, 0.0, DEPTH],
            [0.0, HEIGHT, DEPTH],
            [WIDTH, HEIGHT, DEPTH],
            [WIDTH, 0.0, DEPTH],
            white(),
        )?,
        quad(
            [WIDTH, 0.0, 0.0],
            [WIDTH, 0.0, DEPTH],
            [WIDTH, HEIGHT, DEPTH],
            [WIDTH, HEIGHT, 0.0],
            red(),
        )?,
        quad(
            [0.0, 0.0, 0.0],
            [0.0, HEIGHT, 0.0],
            [0.0, HEIGHT, DEPTH],
            [0.0, 0.0, DEPTH],
            green(),
        )?,
        block(
            [
                [130.0, 165.0, 65.0],
                [82.0, 165.0, 225.0],
                [240.0, 165.0, 272.0],
                [290.0, 165.0, 114.0],
            ],
            white(),
            split_method,
        )?,
        block(
            [
                [423.0, 330.0, 247.0],
                [265.0, 330.0, 296.0],
                [314.0, 330.0, 456.0],
                [472.0, 330.0, 406.0],
            ],
            white(),
            split_method,
        )?,
        light,
    ];

    Ok(objects)
}
