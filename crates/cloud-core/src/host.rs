//! Ports to the host environment.
//!
//! The engine never calls platform APIs directly. A host adapter provides
//! the clock, surfaces and the three cooperative scheduling primitives
//! (per-frame, idle-time, fixed interval); a container adapter provides the
//! mount point and its resize notifications. Both run on one thread, so
//! callbacks are plain boxed closures and never `Send`.

use crate::error::AttachError;
use crate::surface::{Extent, Surface};

/// Handle to a scheduled callback or observation, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Remaining budget of one idle slice.
pub trait IdleDeadline {
    /// Milliseconds left in this slice; zero or less means yield.
    fn time_remaining(&self) -> f64;
}

pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type IdleCallback = Box<dyn FnOnce(&dyn IdleDeadline)>;
pub type IntervalCallback = Box<dyn FnMut()>;

pub trait Host {
    type Surface: Surface + 'static;

    /// Monotonic clock in milliseconds, same timeline as frame timestamps.
    fn now(&self) -> f64;

    fn device_pixel_ratio(&self) -> f64;

    /// Create a detached drawing surface with a usable 2D context.
    fn create_surface(&self) -> Result<Self::Surface, AttachError>;

    /// Run `callback` once before the next repaint with the frame timestamp.
    fn request_frame(&self, callback: FrameCallback) -> TaskId;
    fn cancel_frame(&self, id: TaskId);

    /// Run `callback` once when the host has spare time.
    fn request_idle(&self, callback: IdleCallback) -> TaskId;
    fn cancel_idle(&self, id: TaskId);

    /// Run `callback` every `period_ms` until cleared.
    fn set_interval(&self, period_ms: f64, callback: IntervalCallback) -> TaskId;
    fn clear_interval(&self, id: TaskId);
}

/// Element the animation mounts its surface into.
pub trait Container<S> {
    /// Current CSS box size.
    fn bounding_box(&self) -> Extent;

    fn append_surface(&self, surface: &S) -> Result<(), AttachError>;
    fn remove_surface(&self, surface: &S);

    /// Call `on_resize` whenever the box changes size.
    fn observe_resize(&self, on_resize: Box<dyn FnMut()>) -> TaskId;
    fn disconnect_resize(&self, id: TaskId);
}
