// Default tuning for the cloud-drop animation. `CloudConfig::default()` is
// built from these; rendering-only shape constants live here too.

// Population
pub const DROP_COUNT: usize = 8;
pub const POINT_COUNT: usize = 26; // vertices on each blob outline
pub const POINT_JITTER: f64 = 0.05; // per-vertex radius multiplier spread around 1.0

// Size (backing pixels)
pub const MIN_RADIUS: f64 = 100.0;
pub const MAX_RADIUS: f64 = 200.0;
pub const MIN_SCALE: f64 = 0.95;
pub const MAX_SCALE: f64 = 1.05;

// Motion (px/ms and rad/ms)
pub const MAX_SPEED: f64 = 0.005;
pub const VERTICAL_SPEED_FACTOR: f64 = 0.3; // clouds drift mostly sideways
pub const ROTATION_SPEED: f64 = 0.00004;
pub const ELASTICITY: f64 = 0.99; // velocity damping per processed frame
pub const VELOCITY_JITTER: f64 = 0.00008; // random-walk kick per processed frame

// Easing rates (fraction of remaining distance per processed frame)
pub const TRANSITION_SPEED: f64 = 0.001;
pub const SCALE_SPEED: f64 = 0.001;

// Opacity
pub const MIN_TARGET_ALPHA: f64 = 0.10;
pub const MAX_TARGET_ALPHA: f64 = 0.25;
pub const FADE_FRACTION: f64 = 0.2; // share of life spent fading in (and out)

// Timing (milliseconds)
pub const DROP_LIFESPAN_MS: f64 = 50_000.0;
pub const LIFESPAN_JITTER_MS: f64 = 5_000.0;
pub const REPLACE_INTERVAL_MS: f64 = 15_000.0;
pub const UPDATE_INTERVAL_MS: f64 = 1000.0 / 60.0;

// Palettes as [r, g, b, alpha]
pub const DARK_PALETTE: [(u8, u8, u8, f64); 3] = [
    (45, 45, 45, 0.12),
    (60, 60, 60, 0.10),
    (75, 75, 75, 0.08),
];
pub const LIGHT_PALETTE: [(u8, u8, u8, f64); 3] = [
    (245, 245, 245, 0.15),
    (230, 230, 230, 0.12),
    (215, 215, 215, 0.10),
];

// Blob outline and fill
pub const CONTROL_POINT_FACTOR: f64 = 0.6; // bezier handle length relative to vertex radius
pub const FLATTEN_Y: f64 = 0.7; // vertical squash applied on top of scale
pub const GRADIENT_REACH: f64 = 1.2; // gradient outer radius relative to blob radius
// (offset, alpha multiplier) from center to rim
pub const GRADIENT_STOPS: [(f64, f64); 4] = [(0.0, 1.5), (0.4, 1.2), (0.7, 0.8), (1.0, 0.0)];
pub const CULL_MARGIN_FACTOR: f64 = 2.0; // wrap and cull margin relative to radius

// Motion slows with age: move factor = 1 - ease(progress * AGE_SLOWDOWN)
pub const AGE_SLOWDOWN: f64 = 0.3;
