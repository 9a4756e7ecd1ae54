//! Platform-free core of the cloud-drop background animation.
//!
//! The simulation (drop records, pooling, easing, per-frame update and blob
//! geometry) is plain Rust. Everything that touches the host environment goes
//! through the ports in [`host`] and [`surface`], so the same engine runs in
//! the browser front-end and, with the `headless` feature, under a
//! hand-stepped adapter.

pub mod animation;
pub mod color;
pub mod config;
pub mod constants;
pub mod drop;
pub mod easing;
pub mod error;
#[cfg(feature = "headless")]
pub mod headless;
pub mod host;
pub mod lifecycle;
pub mod pool;
pub mod render;
pub mod surface;
pub mod update;

pub use animation::{AnimationLoop, FrameGate, FrameRenderer};
pub use color::{Rgba, Tone};
pub use config::{CloudConfig, ValueRange};
pub use drop::{CloudDrop, DropFactory, ShapePoints};
pub use error::{AttachError, ConfigError};
pub use host::{Container, Host, IdleDeadline, TaskId};
pub use lifecycle::{Attachment, CloudEngine};
pub use pool::{DropPool, SharedPool};
pub use render::{blob_gradient, blob_path, draw, BlobPath, DrawContext, RadialGradient};
pub use surface::{Extent, Surface};
pub use update::advance;
