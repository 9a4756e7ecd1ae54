//! Frame-rate-gated, double-buffered animation loop.

use crate::config::CloudConfig;
use crate::drop::CloudDrop;
use crate::host::{Host, TaskId};
use crate::render::draw;
use crate::surface::Surface;
use crate::update::advance;
use rand::RngCore;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Lets a frame through only when at least `interval_ms` has passed since
/// the last one that was let through.
#[derive(Clone, Copy, Debug)]
pub struct FrameGate {
    interval_ms: f64,
    last_processed: f64,
}

impl FrameGate {
    pub fn new(interval_ms: f64, start: f64) -> Self {
        Self {
            interval_ms,
            last_processed: start,
        }
    }

    #[inline]
    pub fn ready(&mut self, now: f64) -> bool {
        if now - self.last_processed < self.interval_ms {
            return false;
        }
        self.last_processed = now;
        true
    }

    pub fn last_processed(&self) -> f64 {
        self.last_processed
    }
}

/// Updates and draws every drop into an off-screen buffer, then presents the
/// buffer on the visible surface in a single copy.
pub struct FrameRenderer<S: Surface> {
    gate: FrameGate,
    buffer: S,
}

impl<S: Surface> FrameRenderer<S> {
    pub fn new(buffer: S, gate: FrameGate) -> Self {
        Self { gate, buffer }
    }

    pub fn buffer(&self) -> &S {
        &self.buffer
    }

    /// Returns true when the frame was eligible and a new image presented.
    pub fn process(
        &mut self,
        now: f64,
        visible: &mut S,
        drops: &mut [CloudDrop],
        config: &CloudConfig,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.gate.ready(now) {
            return false;
        }
        let bounds = visible.bounds();
        let ratio = visible.pixel_ratio();
        if self.buffer.bounds() != bounds || self.buffer.pixel_ratio() != ratio {
            self.buffer.resize(bounds, ratio);
        }
        self.buffer.clear();
        for drop in drops.iter_mut().rev() {
            advance(drop, bounds, now, config, rng);
            draw(&mut self.buffer, drop, bounds);
        }
        visible.clear();
        visible.copy_from(&self.buffer);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    Idle,
    Running(TaskId),
}

/// Recurring frame callback with an idempotent stop.
pub struct AnimationLoop<H: Host + 'static> {
    host: Rc<H>,
    state: Rc<Cell<LoopState>>,
}

impl<H: Host + 'static> AnimationLoop<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            state: Rc::new(Cell::new(LoopState::Idle)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.get() != LoopState::Idle
    }

    /// Call `on_frame` with the frame timestamp on every host frame until
    /// stopped. Starting a running loop does nothing.
    pub fn start(&self, on_frame: impl FnMut(f64) + 'static) {
        if self.is_running() {
            return;
        }
        let on_frame: Rc<RefCell<dyn FnMut(f64)>> = Rc::new(RefCell::new(on_frame));
        schedule(Rc::downgrade(&self.host), &self.host, &self.state, on_frame);
    }

    pub fn stop(&self) {
        if let LoopState::Running(id) = self.state.replace(LoopState::Idle) {
            self.host.cancel_frame(id);
        }
    }
}

fn schedule<H: Host + 'static>(
    weak_host: Weak<H>,
    host: &H,
    state: &Rc<Cell<LoopState>>,
    on_frame: Rc<RefCell<dyn FnMut(f64)>>,
) {
    let state_tick = Rc::clone(state);
    let id = host.request_frame(Box::new(move |now| {
        if state_tick.get() == LoopState::Idle {
            return;
        }
        (&mut *on_frame.borrow_mut())(now);
        // The callback may have stopped the loop.
        if state_tick.get() == LoopState::Idle {
            return;
        }
        if let Some(host) = weak_host.upgrade() {
            schedule(weak_host, &host, &state_tick, on_frame);
        }
    }));
    state.set(LoopState::Running(id));
}
