//! Reusable store of retired drops.

use crate::config::CloudConfig;
use crate::drop::{CloudDrop, DropFactory};
use crate::surface::Extent;
use rand::RngCore;
use std::cell::RefCell;
use std::rc::Rc;

/// Pool handle shared by every animation instance that should reuse the same
/// retired drops.
pub type SharedPool = Rc<RefCell<DropPool>>;

/// Unordered bag of drops that are not active in any scene.
///
/// Callers must not release a drop that is still active elsewhere; the pool
/// takes ownership of whatever it is given.
#[derive(Debug, Default)]
pub struct DropPool {
    drops: Vec<CloudDrop>,
}

impl DropPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPool {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Hand out a pooled drop, revived at `now`, or a new one from `factory`.
    pub fn acquire(
        &mut self,
        factory: &mut DropFactory,
        config: &CloudConfig,
        bounds: Extent,
        now: f64,
        rng: &mut dyn RngCore,
    ) -> CloudDrop {
        match self.drops.pop() {
            Some(mut drop) => {
                drop.revive(now);
                drop
            }
            None => factory.create(config, bounds, now, rng),
        }
    }

    pub fn release(&mut self, drop: CloudDrop) {
        self.drops.push(drop);
    }

    pub fn release_all(&mut self, drops: impl IntoIterator<Item = CloudDrop>) {
        self.drops.extend(drops);
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Whether a drop with `id` is currently pooled.
    pub fn contains(&self, id: u64) -> bool {
        self.drops.iter().any(|d| d.id == id)
    }
}
