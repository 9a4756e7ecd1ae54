// Pure easing curves used by the drop updater.

use std::f64::consts::PI;

/// Quadratic ease-in-out on `t` clamped to [0, 1].
#[inline]
pub fn quad_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// `quad_in_out` squared: flat near 0, steep through the middle.
#[inline]
pub fn steep_in_out(t: f64) -> f64 {
    let q = quad_in_out(t);
    q * q
}

/// Alpha envelope over life progress `x`.
///
/// Half-sine ramp from 0 to 1 over the first `fade` of life, a symmetric ramp
/// down over the last `fade`, and 1 in between. Progress past 1.0 keeps
/// following the sine, so the result always stays within [0, 1].
#[inline]
pub fn fade_envelope(x: f64, fade: f64) -> f64 {
    if x < fade {
        ((x / fade - 0.5) * PI).sin() * 0.5 + 0.5
    } else if x > 1.0 - fade {
        (((1.0 - x) / fade - 0.5) * PI).sin() * 0.5 + 0.5
    } else {
        1.0
    }
}
