/// Browser-side tuning for the canvas adapters.
///
/// The simulation constants live in `cloud_core::constants`; these only
/// cover how the web host stands in for missing platform features.

// Budget handed to idle callbacks when `requestIdleCallback` is missing (ms)
pub const IDLE_FALLBACK_BUDGET_MS: f64 = 8.0;

// Delay before the setTimeout-based idle fallback runs (ms)
pub const IDLE_FALLBACK_DELAY_MS: i32 = 1;

// Pixel ratio used when the window reports none
pub const DEFAULT_PIXEL_RATIO: f64 = 1.0;

// Style hints applied to every mounted canvas
pub const CANVAS_STYLE: [(&str, &str); 5] = [
    ("will-change", "transform"),
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("pointer-events", "none"),
];
