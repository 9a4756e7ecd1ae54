//! In-process host adapter driven by an explicit clock.
//!
//! Nothing runs on its own: frames, idle slices and interval ticks happen only
//! when the owner calls `run_frame`, `run_idle` or `advance`. Surfaces record
//! what was drawn instead of rasterizing it. Used for headless rendering
//! checks and for deterministic tests of the attach/detach lifecycle.

use crate::error::AttachError;
use crate::host::{
    Container, FrameCallback, Host, IdleCallback, IdleDeadline, IntervalCallback, TaskId,
};
use crate::render::{BlobPath, DrawContext, RadialGradient};
use crate::surface::{Extent, Surface};
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Drawing call captured by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    Fill {
        path: BlobPath,
        fill: RadialGradient,
    },
}

/// Surface that keeps the operations drawn since its last clear.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    extent: Extent,
    bounds: Extent,
    pixel_ratio: f64,
    ops: Vec<DrawOp>,
    /// Fills presented by the last `copy_from`.
    presented_fills: usize,
    copies: u64,
}

impl RecordingSurface {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count()
    }

    pub fn presented_fills(&self) -> usize {
        self.presented_fills
    }

    pub fn copies(&self) -> u64 {
        self.copies
    }
}

impl DrawContext for RecordingSurface {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }
    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Translate(x, y));
    }
    fn rotate(&mut self, angle: f64) {
        self.ops.push(DrawOp::Rotate(angle));
    }
    fn scale(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Scale(x, y));
    }
    fn fill_path(&mut self, path: &BlobPath, fill: &RadialGradient) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            fill: fill.clone(),
        });
    }
}

impl Surface for RecordingSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn bounds(&self) -> Extent {
        self.bounds
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize(&mut self, css: Extent, pixel_ratio: f64) {
        self.extent = css.scaled(pixel_ratio);
        self.bounds = css;
        self.pixel_ratio = pixel_ratio;
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.presented_fills = 0;
    }

    fn copy_from(&mut self, source: &Self) {
        self.presented_fills = source.fill_count();
        self.copies += 1;
    }
}

/// Idle slice that allows a fixed number of `time_remaining` checks.
#[derive(Debug)]
pub struct SlotDeadline {
    slots: Cell<usize>,
}

impl SlotDeadline {
    pub fn new(slots: usize) -> Self {
        Self {
            slots: Cell::new(slots),
        }
    }
}

impl IdleDeadline for SlotDeadline {
    fn time_remaining(&self) -> f64 {
        let left = self.slots.get();
        self.slots.set(left.saturating_sub(1));
        left as f64
    }
}

struct Interval {
    period: f64,
    next_due: f64,
    callback: Rc<RefCell<IntervalCallback>>,
}

/// Host whose clock and scheduler are stepped by hand.
pub struct ManualHost {
    now: Cell<f64>,
    pixel_ratio: Cell<f64>,
    surfaces_supported: Cell<bool>,
    next_id: Cell<u64>,
    frames: RefCell<FnvHashMap<TaskId, FrameCallback>>,
    idles: RefCell<FnvHashMap<TaskId, IdleCallback>>,
    intervals: RefCell<FnvHashMap<TaskId, Interval>>,
    fired: Cell<u64>,
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualHost {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            pixel_ratio: Cell::new(1.0),
            surfaces_supported: Cell::new(true),
            next_id: Cell::new(1),
            frames: RefCell::new(FnvHashMap::default()),
            idles: RefCell::new(FnvHashMap::default()),
            intervals: RefCell::new(FnvHashMap::default()),
            fired: Cell::new(0),
        }
    }

    pub fn with_pixel_ratio(self, ratio: f64) -> Self {
        self.pixel_ratio.set(ratio);
        self
    }

    pub fn set_pixel_ratio(&self, ratio: f64) {
        self.pixel_ratio.set(ratio);
    }

    /// Make `create_surface` fail as if no 2D context were available.
    pub fn set_surfaces_supported(&self, supported: bool) {
        self.surfaces_supported.set(supported);
    }

    fn next_task(&self) -> TaskId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TaskId(id)
    }

    /// Move the clock forward, firing every interval that falls due on the
    /// way, in time order.
    pub fn advance(&self, ms: f64) {
        let target = self.now.get() + ms;
        loop {
            let due = self
                .intervals
                .borrow()
                .iter()
                .filter(|(_, iv)| iv.next_due <= target)
                .min_by(|a, b| a.1.next_due.total_cmp(&b.1.next_due))
                .map(|(id, iv)| (*id, iv.next_due));
            let Some((id, at)) = due else {
                break;
            };
            self.now.set(at);
            self.fire_interval(id);
        }
        self.now.set(target);
    }

    fn fire_interval(&self, id: TaskId) {
        let callback = {
            let mut intervals = self.intervals.borrow_mut();
            let Some(iv) = intervals.get_mut(&id) else {
                return;
            };
            iv.next_due += iv.period;
            Rc::clone(&iv.callback)
        };
        self.fired.set(self.fired.get() + 1);
        (&mut *callback.borrow_mut())();
    }

    /// Fire every registered interval once at the current time.
    pub fn fire_intervals(&self) {
        let ids: Vec<TaskId> = self.intervals.borrow().keys().copied().collect();
        for id in ids {
            self.fire_interval(id);
        }
    }

    /// Run the pending frame callbacks at the current time. Callbacks they
    /// request run on the next call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let pending: Vec<FrameCallback> =
            self.frames.borrow_mut().drain().map(|(_, cb)| cb).collect();
        let now = self.now.get();
        let count = pending.len();
        for cb in pending {
            self.fired.set(self.fired.get() + 1);
            cb(now);
        }
        count
    }

    /// Advance by `ms` then run one frame.
    pub fn step(&self, ms: f64) -> usize {
        self.advance(ms);
        self.run_frame()
    }

    /// Run the pending idle callbacks, each with a slice of `slots` checks.
    pub fn run_idle(&self, slots: usize) -> usize {
        let pending: Vec<IdleCallback> =
            self.idles.borrow_mut().drain().map(|(_, cb)| cb).collect();
        let count = pending.len();
        for cb in pending {
            self.fired.set(self.fired.get() + 1);
            cb(&SlotDeadline::new(slots));
        }
        count
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_idles(&self) -> usize {
        self.idles.borrow().len()
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.borrow().len()
    }

    /// Period of every active interval.
    pub fn interval_periods(&self) -> Vec<f64> {
        self.intervals.borrow().values().map(|iv| iv.period).collect()
    }

    /// Total callbacks fired (frame, idle and interval).
    pub fn callbacks_fired(&self) -> u64 {
        self.fired.get()
    }
}

impl Host for ManualHost {
    type Surface = RecordingSurface;

    fn now(&self) -> f64 {
        self.now.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio.get()
    }

    fn create_surface(&self) -> Result<RecordingSurface, AttachError> {
        if !self.surfaces_supported.get() {
            return Err(AttachError::UnsupportedContext(
                "headless host configured without 2d support".into(),
            ));
        }
        Ok(RecordingSurface::default())
    }

    fn request_frame(&self, callback: FrameCallback) -> TaskId {
        let id = self.next_task();
        self.frames.borrow_mut().insert(id, callback);
        id
    }

    fn cancel_frame(&self, id: TaskId) {
        self.frames.borrow_mut().remove(&id);
    }

    fn request_idle(&self, callback: IdleCallback) -> TaskId {
        let id = self.next_task();
        self.idles.borrow_mut().insert(id, callback);
        id
    }

    fn cancel_idle(&self, id: TaskId) {
        self.idles.borrow_mut().remove(&id);
    }

    fn set_interval(&self, period_ms: f64, callback: IntervalCallback) -> TaskId {
        let id = self.next_task();
        self.intervals.borrow_mut().insert(
            id,
            Interval {
                period: period_ms,
                next_due: self.now.get() + period_ms,
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        id
    }

    fn clear_interval(&self, id: TaskId) {
        self.intervals.borrow_mut().remove(&id);
    }
}

/// Container with a settable box that counts mounted surfaces.
pub struct ManualContainer {
    size: Cell<Extent>,
    mounted: Cell<usize>,
    next_id: Cell<u64>,
    observers: RefCell<FnvHashMap<TaskId, Rc<RefCell<Box<dyn FnMut()>>>>>,
    fail_mount: Cell<bool>,
}

impl ManualContainer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Cell::new(Extent::new(width, height)),
            mounted: Cell::new(0),
            next_id: Cell::new(1),
            observers: RefCell::new(FnvHashMap::default()),
            fail_mount: Cell::new(false),
        }
    }

    /// Change the box and notify observers.
    pub fn resize(&self, width: f64, height: f64) {
        self.size.set(Extent::new(width, height));
        let observers: Vec<_> = self.observers.borrow().values().cloned().collect();
        for cb in observers {
            (&mut *cb.borrow_mut())();
        }
    }

    pub fn mounted_surfaces(&self) -> usize {
        self.mounted.get()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn set_fail_mount(&self, fail: bool) {
        self.fail_mount.set(fail);
    }
}

impl Container<RecordingSurface> for ManualContainer {
    fn bounding_box(&self) -> Extent {
        self.size.get()
    }

    fn append_surface(&self, _surface: &RecordingSurface) -> Result<(), AttachError> {
        if self.fail_mount.get() {
            return Err(AttachError::Mount("container refused child".into()));
        }
        self.mounted.set(self.mounted.get() + 1);
        Ok(())
    }

    fn remove_surface(&self, _surface: &RecordingSurface) {
        self.mounted.set(self.mounted.get().saturating_sub(1));
    }

    fn observe_resize(&self, on_resize: Box<dyn FnMut()>) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers
            .borrow_mut()
            .insert(id, Rc::new(RefCell::new(on_resize)));
        id
    }

    fn disconnect_resize(&self, id: TaskId) {
        self.observers.borrow_mut().remove(&id);
    }
}
