//! Per-drop simulation step.

use crate::config::{CloudConfig, ValueRange};
use crate::constants::AGE_SLOWDOWN;
use crate::drop::CloudDrop;
use crate::easing::{fade_envelope, steep_in_out};
use crate::surface::Extent;
use glam::DVec2;
use rand::RngCore;

/// Advance `drop` to `now`. Returns false when less than one update interval
/// has passed since the drop was last processed; the drop is left untouched.
pub fn advance(
    drop: &mut CloudDrop,
    bounds: Extent,
    now: f64,
    config: &CloudConfig,
    rng: &mut dyn RngCore,
) -> bool {
    let elapsed = now - drop.last_update;
    if elapsed < config.update_interval_ms {
        return false;
    }
    drop.last_update = now;
    drop.life += elapsed;
    let progress = drop.life_progress();

    drop.alpha = drop.target_alpha * fade_envelope(progress, config.fade_fraction);

    // Shape settles as the drop ages; past max_life it stops changing.
    let transition = steep_in_out(1.0 - progress);
    drop.radius += (drop.target_radius - drop.radius) * config.transition_speed * transition;
    drop.scale += (drop.target_scale - drop.scale) * config.scale_speed * transition;

    let jitter = ValueRange::around(0.0, config.velocity_jitter / 2.0);
    let kick = DVec2::new(jitter.sample(rng), jitter.sample(rng));
    drop.velocity = drop.velocity * config.elasticity + kick;

    let move_speed = 1.0 - steep_in_out(progress * AGE_SLOWDOWN);
    drop.position += drop.velocity * move_speed * elapsed;
    drop.rotation += drop.rotation_speed * move_speed * elapsed;

    wrap(drop, bounds);
    true
}

/// Teleport a drop that drifted past the margin to the opposite edge and dim
/// it so the jump does not flash.
fn wrap(drop: &mut CloudDrop, bounds: Extent) {
    let margin = drop.margin();
    let p = &mut drop.position;
    let outside = p.x < -margin
        || p.x > bounds.width + margin
        || p.y < -margin
        || p.y > bounds.height + margin;
    if !outside {
        return;
    }
    drop.alpha *= 0.5;
    if p.x < -margin {
        p.x = bounds.width + margin;
    } else if p.x > bounds.width + margin {
        p.x = -margin;
    }
    if p.y < -margin {
        p.y = bounds.height + margin;
    } else if p.y > bounds.height + margin {
        p.y = -margin;
    }
}
