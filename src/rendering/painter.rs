// src/rendering/painter.rs

use super::primitives::draw_sphere;
use super::scene::Scene;
use crate::config::RenderStyle;
use cairo::Context;
use nalgebra::{Point3, Rotation3, Vector3};
use std::cmp::Ordering;

pub struct ProjectedSphere {
    pub screen_pos: [f64; 3], // x, y (pixels), z (depth)
    pub radius: f64,          // pixels
    pub color: [f64; 4],
}

pub struct Projection {
    pub spheres: Vec<ProjectedSphere>,
    pub width: f64,
    pub height: f64,
}

/// Orthographic projection of the scene, sorted far to near.
pub fn project(scene: &Scene, style: &RenderStyle) -> Projection {
    let (rx, ry, rz) = style.rotation;
    let rotation = Rotation3::from_euler_angles(rx.to_radians(), ry.to_radians(), rz.to_radians());

    let primitives = scene.primitives();
    let center = centroid(primitives.iter().map(|p| Point3::from(p.position)));

    let mut rotated = Vec::with_capacity(primitives.len());
    let mut min = [f64::MAX; 2];
    let mut max = [f64::MIN; 2];

    for p in primitives {
        let r = rotation * (Point3::from(p.position) - center);
        let radius = p.radius * style.atom_scale;
        min[0] = min[0].min(r.x - radius);
        min[1] = min[1].min(r.y - radius);
        max[0] = max[0].max(r.x + radius);
        max[1] = max[1].max(r.y + radius);
        rotated.push((r, radius, scene.color_of(p)));
    }

    if rotated.is_empty() {
        min = [0.0; 2];
        max = [0.0; 2];
    }

    let scale = style.pixels_per_angstrom;
    let margin = style.margin;

    // Screen y grows downwards
    let mut spheres: Vec<ProjectedSphere> = rotated
        .into_iter()
        .map(|(r, radius, color)| ProjectedSphere {
            screen_pos: [
                (r.x - min[0]) * scale + margin,
                (max[1] - r.y) * scale + margin,
                r.z,
            ],
            radius: radius * scale,
            color,
        })
        .collect();

    // Painter's algorithm: lowest z is furthest from the viewer
    spheres.sort_by(|a, b| {
        a.screen_pos[2]
            .partial_cmp(&b.screen_pos[2])
            .unwrap_or(Ordering::Equal)
    });

    Projection {
        spheres,
        width: ((max[0] - min[0]) * scale + 2.0 * margin).max(1.0),
        height: ((max[1] - min[1]) * scale + 2.0 * margin).max(1.0),
    }
}

fn centroid(points: impl Iterator<Item = Point3<f64>>) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    let mut n = 0usize;
    for p in points {
        sum += p.coords;
        n += 1;
    }
    if n == 0 {
        return Point3::origin();
    }
    Point3::from(sum / n as f64)
}

pub fn draw_projection(
    cr: &Context,
    projection: &Projection,
    style: &RenderStyle,
    paint_background: bool,
) -> Result<(), cairo::Error> {
    if paint_background {
        let (r, g, b) = style.background_color;
        cr.set_source_rgb(r, g, b);
        cr.paint()?;
    }

    for sphere in &projection.spheres {
        draw_sphere(
            cr,
            sphere.screen_pos[0],
            sphere.screen_pos[1],
            sphere.radius,
            sphere.color,
            style,
        )?;
    }
    Ok(())
}
