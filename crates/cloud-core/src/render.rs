//! Blob geometry and the drawing-context port.
//!
//! A drop is drawn as a closed chain of cubic bezier segments through its
//! shape points, in drop-local coordinates, then positioned with the context
//! transform and filled with a soft radial gradient.

use crate::color::Rgba;
use crate::constants::{CONTROL_POINT_FACTOR, FLATTEN_Y, GRADIENT_REACH, GRADIENT_STOPS};
use crate::drop::CloudDrop;
use crate::surface::Extent;
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, TAU};

/// One cubic segment ending at `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub ctrl1: DVec2,
    pub ctrl2: DVec2,
    pub to: DVec2,
}

/// Closed outline starting at `start`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlobPath {
    pub start: DVec2,
    pub segments: Vec<CubicSegment>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Radial gradient centered on the local origin, from radius 0 to `radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub radius: f64,
    pub stops: [GradientStop; 4],
}

/// Port over a 2D drawing API (canvas-like, with a transform stack).
pub trait DrawContext {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);
    fn fill_path(&mut self, path: &BlobPath, fill: &RadialGradient);
}

#[inline]
fn vertex(angle: f64, radius: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin()) * radius
}

/// Outline of `drop` around the origin, before any transform.
pub fn blob_path(drop: &CloudDrop) -> BlobPath {
    let n = drop.points.len();
    let mut path = BlobPath {
        start: DVec2::ZERO,
        segments: Vec::with_capacity(n),
    };
    if n == 0 {
        return path;
    }
    for i in 0..n {
        let next = (i + 1) % n;
        let angle = i as f64 / n as f64 * TAU;
        let next_angle = next as f64 / n as f64 * TAU;
        let r = drop.radius * drop.points[i];
        let next_r = drop.radius * drop.points[next];

        let p = vertex(angle, r);
        let q = vertex(next_angle, next_r);
        if i == 0 {
            path.start = p;
        }
        // Handles run along the tangent, so the outline bulges between vertices.
        let ctrl1 = p + vertex(angle + FRAC_PI_2, r * CONTROL_POINT_FACTOR);
        let ctrl2 = q - vertex(next_angle + FRAC_PI_2, next_r * CONTROL_POINT_FACTOR);
        path.segments.push(CubicSegment { ctrl1, ctrl2, to: q });
    }
    path
}

/// Soft fill for `drop` at its current alpha.
pub fn blob_gradient(drop: &CloudDrop) -> RadialGradient {
    let stops = GRADIENT_STOPS.map(|(offset, mult)| GradientStop {
        offset,
        color: drop.color.with_alpha(drop.alpha * mult),
    });
    RadialGradient {
        radius: drop.radius * GRADIENT_REACH,
        stops,
    }
}

/// Draw one drop. Returns false when it was culled.
pub fn draw(ctx: &mut dyn DrawContext, drop: &CloudDrop, bounds: Extent) -> bool {
    if !bounds.overlaps_circle(drop.position.x, drop.position.y, drop.margin()) {
        return false;
    }
    let path = blob_path(drop);
    let fill = blob_gradient(drop);

    ctx.save();
    ctx.translate(drop.position.x, drop.position.y);
    ctx.rotate(drop.rotation);
    ctx.scale(drop.scale, drop.scale * FLATTEN_Y);
    ctx.fill_path(&path, &fill);
    ctx.restore();
    true
}
