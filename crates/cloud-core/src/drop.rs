//! The cloud-drop record and the factory that randomizes new ones.

use crate::color::{Rgba, Tone};
use crate::config::{CloudConfig, ValueRange};
use crate::constants::DARK_PALETTE;
use crate::surface::Extent;
use glam::DVec2;
use rand::{Rng, RngCore};
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Per-vertex radius multipliers describing a blob's outline.
pub type ShapePoints = SmallVec<[f64; 32]>;

/// One animated blob.
#[derive(Clone, Debug)]
pub struct CloudDrop {
    pub id: u64,
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub target_radius: f64,
    pub color: Rgba,
    pub tone: Tone,
    pub alpha: f64,
    pub target_alpha: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub scale: f64,
    pub target_scale: f64,
    pub points: ShapePoints,
    pub life: f64,
    pub max_life: f64,
    pub last_update: f64,
}

impl CloudDrop {
    /// Life over max life. Not clamped: a drop may outlive `max_life`.
    #[inline]
    pub fn life_progress(&self) -> f64 {
        self.life / self.max_life
    }

    /// Reset the per-life state of a pooled drop so it fades in again.
    /// Shape, color and motion are kept.
    pub fn revive(&mut self, now: f64) {
        self.life = 0.0;
        self.alpha = 0.0;
        self.last_update = now;
    }

    /// Wrap/cull margin around the drop's center.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.radius * crate::constants::CULL_MARGIN_FACTOR
    }
}

/// Builds freshly randomized drops when the pool has nothing to hand out.
#[derive(Debug, Default)]
pub struct DropFactory {
    next_id: u64,
}

impl DropFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drops created so far.
    pub fn created(&self) -> u64 {
        self.next_id
    }

    pub fn create(
        &mut self,
        config: &CloudConfig,
        bounds: Extent,
        now: f64,
        rng: &mut dyn RngCore,
    ) -> CloudDrop {
        let id = self.next_id;
        self.next_id += 1;

        let tone = if rng.gen::<f64>() > 0.5 {
            Tone::Light
        } else {
            Tone::Dark
        };
        let palette = match tone {
            Tone::Light => &config.light_palette,
            Tone::Dark => &config.dark_palette,
        };
        let pick = ((rng.gen::<f64>() * palette.len() as f64) as usize)
            .min(palette.len().saturating_sub(1));
        // Unvalidated tables may carry an empty palette.
        let color = palette
            .get(pick)
            .copied()
            .unwrap_or_else(|| Rgba::from(DARK_PALETTE[0]));

        let position = DVec2::new(
            rng.gen::<f64>() * bounds.width,
            rng.gen::<f64>() * bounds.height,
        );
        let radius = config.radius.sample(rng);
        let target_radius = config.radius.sample(rng);
        let half_speed = config.max_speed / 2.0;
        let speed = ValueRange::around(0.0, half_speed);
        let velocity = DVec2::new(
            speed.sample(rng),
            speed.sample(rng) * config.vertical_speed_factor,
        );
        let target_alpha = config.target_alpha.sample(rng);
        let rotation = rng.gen::<f64>() * TAU;
        let rotation_speed = ValueRange::around(0.0, config.rotation_speed / 2.0).sample(rng);
        let max_life = config.lifespan_ms + rng.gen::<f64>() * config.lifespan_jitter_ms;
        let scale = config.scale.sample(rng);
        let point_range = config.point_range();
        let points = (0..config.point_count)
            .map(|_| point_range.sample(rng))
            .collect::<ShapePoints>();

        CloudDrop {
            id,
            position,
            velocity,
            radius,
            target_radius,
            color,
            tone,
            alpha: 0.0,
            target_alpha,
            rotation,
            rotation_speed,
            scale,
            target_scale: scale,
            points,
            life: 0.0,
            max_life,
            last_update: now,
        }
    }
}
