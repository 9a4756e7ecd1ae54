//! Drawing surfaces the animation renders into.

use crate::render::DrawContext;

/// Width and height, in backing pixels unless stated otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Backing-pixel size for a CSS box at the given device pixel ratio.
    /// Never smaller than one pixel on either axis.
    #[inline]
    pub fn scaled(self, pixel_ratio: f64) -> Self {
        Self {
            width: (self.width * pixel_ratio).floor().max(1.0),
            height: (self.height * pixel_ratio).floor().max(1.0),
        }
    }

    /// True when a circle of `radius` around (x, y) overlaps the extent.
    #[inline]
    pub fn overlaps_circle(&self, x: f64, y: f64, radius: f64) -> bool {
        x + radius >= 0.0
            && x - radius <= self.width
            && y + radius >= 0.0
            && y - radius <= self.height
    }
}

/// A 2D drawing surface: either the visible one mounted in the container or
/// an off-screen buffer composited onto it.
///
/// Drawing happens in CSS pixels; the surface maps them onto its backing
/// store at its pixel ratio.
pub trait Surface: DrawContext {
    /// Backing size in device pixels.
    fn extent(&self) -> Extent;

    /// CSS box the drawing coordinates span.
    fn bounds(&self) -> Extent;

    fn pixel_ratio(&self) -> f64;

    /// Resize to a CSS box at `pixel_ratio` and rescale the drawing context
    /// so one CSS pixel maps to `pixel_ratio` backing pixels.
    fn resize(&mut self, css: Extent, pixel_ratio: f64);

    /// Clear every pixel to transparent.
    fn clear(&mut self);

    /// Copy `source` over this surface in one operation, pixel for pixel.
    /// Both surfaces have the same backing extent.
    fn copy_from(&mut self, source: &Self);
}
