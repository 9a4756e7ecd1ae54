use serde::{Deserialize, Serialize};

/// An sRGB color with straight alpha, as used by CSS `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha replaced (clamped to [0, 1]).
    #[inline]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(r, g, b, a)` representation.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<(u8, u8, u8, f64)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, f64)) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Which palette a drop drew its color from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Light,
    Dark,
}
