//! Tunables for the cloud-drop animation.
//!
//! `CloudConfig` is an immutable table handed to the engine at construction.
//! It deserializes with every field optional, so a host can override a few
//! values from JSON and keep the defaults for the rest.

use crate::color::Rgba;
use crate::constants::*;
use crate::error::ConfigError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Closed interval sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Interval of half-width `spread` around `center`.
    pub fn around(center: f64, spread: f64) -> Self {
        Self {
            min: center - spread,
            max: center + spread,
        }
    }

    #[inline]
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.min + rng.gen::<f64>() * (self.max - self.min)
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub dark_palette: Vec<Rgba>,
    pub light_palette: Vec<Rgba>,
    pub drop_count: usize,
    pub radius: ValueRange,
    pub scale: ValueRange,
    pub target_alpha: ValueRange,
    pub max_speed: f64,
    pub vertical_speed_factor: f64,
    pub rotation_speed: f64,
    pub elasticity: f64,
    pub velocity_jitter: f64,
    pub transition_speed: f64,
    pub scale_speed: f64,
    pub fade_fraction: f64,
    pub lifespan_ms: f64,
    pub lifespan_jitter_ms: f64,
    pub point_count: usize,
    pub point_jitter: f64,
    pub replace_interval_ms: f64,
    pub update_interval_ms: f64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            dark_palette: DARK_PALETTE.iter().copied().map(Rgba::from).collect(),
            light_palette: LIGHT_PALETTE.iter().copied().map(Rgba::from).collect(),
            drop_count: DROP_COUNT,
            radius: ValueRange::new(MIN_RADIUS, MAX_RADIUS),
            scale: ValueRange::new(MIN_SCALE, MAX_SCALE),
            target_alpha: ValueRange::new(MIN_TARGET_ALPHA, MAX_TARGET_ALPHA),
            max_speed: MAX_SPEED,
            vertical_speed_factor: VERTICAL_SPEED_FACTOR,
            rotation_speed: ROTATION_SPEED,
            elasticity: ELASTICITY,
            velocity_jitter: VELOCITY_JITTER,
            transition_speed: TRANSITION_SPEED,
            scale_speed: SCALE_SPEED,
            fade_fraction: FADE_FRACTION,
            lifespan_ms: DROP_LIFESPAN_MS,
            lifespan_jitter_ms: LIFESPAN_JITTER_MS,
            point_count: POINT_COUNT,
            point_jitter: POINT_JITTER,
            replace_interval_ms: REPLACE_INTERVAL_MS,
            update_interval_ms: UPDATE_INTERVAL_MS,
        }
    }
}

impl CloudConfig {
    /// Parse a (possibly partial) JSON object and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CloudConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tables the updater and renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drop_count == 0 {
            return Err(ConfigError::DropCount);
        }
        if self.point_count < 3 {
            return Err(ConfigError::PointCount(self.point_count));
        }
        if self.dark_palette.is_empty() || self.light_palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if !self.radius.is_ordered() || self.radius.min <= 0.0 {
            return Err(ConfigError::Range("radius", self.radius));
        }
        if !self.scale.is_ordered() || self.scale.min <= 0.0 {
            return Err(ConfigError::Range("scale", self.scale));
        }
        if !self.target_alpha.is_ordered()
            || self.target_alpha.min < 0.0
            || self.target_alpha.max > 1.0
        {
            return Err(ConfigError::Range("target_alpha", self.target_alpha));
        }
        if !(self.point_jitter >= 0.0 && self.point_jitter < 1.0) {
            return Err(ConfigError::Value("point_jitter", self.point_jitter));
        }
        if !(self.elasticity > 0.0 && self.elasticity <= 1.0) {
            return Err(ConfigError::Value("elasticity", self.elasticity));
        }
        if !(self.fade_fraction > 0.0 && self.fade_fraction <= 0.5) {
            return Err(ConfigError::Value("fade_fraction", self.fade_fraction));
        }
        for (name, v) in [
            ("transition_speed", self.transition_speed),
            ("scale_speed", self.scale_speed),
        ] {
            if !(v >= 0.0 && v <= 1.0) {
                return Err(ConfigError::Value(name, v));
            }
        }
        for (name, v) in [
            ("lifespan_ms", self.lifespan_ms),
            ("replace_interval_ms", self.replace_interval_ms),
            ("update_interval_ms", self.update_interval_ms),
        ] {
            if !(v > 0.0 && v.is_finite()) {
                return Err(ConfigError::Value(name, v));
            }
        }
        for (name, v) in [
            ("max_speed", self.max_speed),
            ("vertical_speed_factor", self.vertical_speed_factor),
            ("rotation_speed", self.rotation_speed),
            ("velocity_jitter", self.velocity_jitter),
            ("lifespan_jitter_ms", self.lifespan_jitter_ms),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(ConfigError::Value(name, v));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn point_range(&self) -> ValueRange {
        ValueRange::around(1.0, self.point_jitter)
    }
}
