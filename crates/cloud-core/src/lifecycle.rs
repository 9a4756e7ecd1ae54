//! One running animation per container: attach, populate, refresh, detach.

use crate::animation::{AnimationLoop, FrameGate, FrameRenderer};
use crate::config::CloudConfig;
use crate::drop::{CloudDrop, DropFactory};
use crate::error::AttachError;
use crate::host::{Container, Host, IdleDeadline, TaskId};
use crate::pool::SharedPool;
use crate::surface::{Extent, Surface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Everything one attached instance mutates from its callbacks.
struct Scene<S: Surface> {
    config: Rc<CloudConfig>,
    pool: SharedPool,
    factory: Rc<RefCell<DropFactory>>,
    rng: StdRng,
    visible: S,
    renderer: FrameRenderer<S>,
    drops: Vec<CloudDrop>,
    presented: u64,
}

impl<S: Surface> Scene<S> {
    fn acquire(&mut self, now: f64) -> CloudDrop {
        let bounds = self.visible.bounds();
        self.pool.borrow_mut().acquire(
            &mut self.factory.borrow_mut(),
            &self.config,
            bounds,
            now,
            &mut self.rng,
        )
    }

    fn frame(&mut self, now: f64) {
        if self.renderer.process(
            now,
            &mut self.visible,
            &mut self.drops,
            &self.config,
            &mut self.rng,
        ) {
            self.presented += 1;
        }
    }

    /// Fill up to the target count while the slice has time. True when full.
    fn populate(&mut self, deadline: &dyn IdleDeadline, now: f64) -> bool {
        while self.drops.len() < self.config.drop_count && deadline.time_remaining() > 0.0 {
            let drop = self.acquire(now);
            self.drops.push(drop);
        }
        self.drops.len() >= self.config.drop_count
    }

    /// Swap the drop with the greatest life for a fresh one and pool it.
    /// Returns the id of the pooled drop.
    fn replace_oldest(&mut self, now: f64) -> Option<u64> {
        let mut oldest = None::<usize>;
        for (i, d) in self.drops.iter().enumerate() {
            match oldest {
                Some(o) if self.drops[o].life >= d.life => {}
                _ => oldest = Some(i),
            }
        }
        let index = oldest?;
        // Acquire before releasing so the replacement is never the drop
        // being retired.
        let fresh = self.acquire(now);
        let retired = std::mem::replace(&mut self.drops[index], fresh);
        let id = retired.id;
        self.pool.borrow_mut().release(retired);
        Some(id)
    }
}

/// Read-only view of an attached scene.
trait SceneView {
    fn drops(&self) -> &[CloudDrop];
    fn extent(&self) -> Extent;
    fn bounds(&self) -> Extent;
    fn presented(&self) -> u64;
}

impl<S: Surface> SceneView for Scene<S> {
    fn drops(&self) -> &[CloudDrop] {
        &self.drops
    }
    fn extent(&self) -> Extent {
        self.visible.extent()
    }
    fn bounds(&self) -> Extent {
        self.visible.bounds()
    }
    fn presented(&self) -> u64 {
        self.presented
    }
}

/// Handle returned by [`CloudEngine::attach`]. `detach` tears the instance
/// down; calling it again does nothing.
pub struct Attachment {
    teardown: Option<Box<dyn FnOnce()>>,
    view: Rc<RefCell<dyn SceneView>>,
}

impl Attachment {
    pub fn detach(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.teardown.is_some()
    }

    /// Number of drops currently active in the scene.
    pub fn active_count(&self) -> usize {
        self.view.borrow().drops().len()
    }

    /// Snapshot of the active drops.
    pub fn drops(&self) -> Vec<CloudDrop> {
        self.view.borrow().drops().to_vec()
    }

    /// Backing-pixel size of the visible surface.
    pub fn surface_extent(&self) -> Extent {
        self.view.borrow().extent()
    }

    /// CSS box the drops move in.
    pub fn surface_bounds(&self) -> Extent {
        self.view.borrow().bounds()
    }

    /// Frames that passed the rate gate and were presented.
    pub fn frames_presented(&self) -> u64 {
        self.view.borrow().presented()
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Creates animation instances that share one host, pool and config.
pub struct CloudEngine<H: Host + 'static> {
    host: Rc<H>,
    pool: SharedPool,
    factory: Rc<RefCell<DropFactory>>,
    config: Rc<CloudConfig>,
    seeds: StdRng,
}

impl<H: Host + 'static> CloudEngine<H> {
    /// Instances draw their randomness from generators derived from `seed`.
    pub fn new(host: Rc<H>, pool: SharedPool, config: CloudConfig, seed: u64) -> Self {
        Self {
            host,
            pool,
            factory: Rc::new(RefCell::new(DropFactory::new())),
            config: Rc::new(config),
            seeds: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy(host: Rc<H>, pool: SharedPool, config: CloudConfig) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new(host, pool, config, seed)
    }

    /// Engine sharing this one's host, pool and drop ids, with another config.
    pub fn with_config(&mut self, config: CloudConfig) -> Self {
        Self {
            host: Rc::clone(&self.host),
            pool: Rc::clone(&self.pool),
            factory: Rc::clone(&self.factory),
            config: Rc::new(config),
            seeds: StdRng::seed_from_u64(self.seeds.gen()),
        }
    }

    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Mount an animation into `container`. Failures are logged and yield
    /// `None`; nothing is left scheduled in that case.
    pub fn attach<C>(&mut self, container: Rc<C>) -> Option<Attachment>
    where
        C: Container<H::Surface> + 'static,
    {
        match self.try_attach(container) {
            Ok(a) => Some(a),
            Err(e) => {
                log::error!("[clouds] attach failed: {}", e);
                None
            }
        }
    }

    pub fn try_attach<C>(&mut self, container: Rc<C>) -> Result<Attachment, AttachError>
    where
        C: Container<H::Surface> + 'static,
    {
        self.config.validate()?;
        let host = &self.host;
        let mut visible = host.create_surface()?;
        let buffer = host.create_surface()?;
        let css = container.bounding_box();
        visible.resize(css, host.device_pixel_ratio());
        container.append_surface(&visible)?;

        let now = host.now();
        let scene = Rc::new(RefCell::new(Scene {
            config: Rc::clone(&self.config),
            pool: Rc::clone(&self.pool),
            factory: Rc::clone(&self.factory),
            rng: StdRng::seed_from_u64(self.seeds.gen()),
            visible,
            renderer: FrameRenderer::new(
                buffer,
                FrameGate::new(self.config.update_interval_ms, now),
            ),
            drops: Vec::with_capacity(self.config.drop_count),
            presented: 0,
        }));
        let alive = Rc::new(Cell::new(true));

        let resize = {
            let weak_host = Rc::downgrade(host);
            let weak_container = Rc::downgrade(&container);
            let weak_scene = Rc::downgrade(&scene);
            let alive = Rc::clone(&alive);
            container.observe_resize(Box::new(move || {
                if !alive.get() {
                    return;
                }
                if let (Some(host), Some(container), Some(scene)) = (
                    weak_host.upgrade(),
                    weak_container.upgrade(),
                    weak_scene.upgrade(),
                ) {
                    let css = container.bounding_box();
                    scene.borrow_mut().visible.resize(css, host.device_pixel_ratio());
                }
            }))
        };

        let idle_task = Rc::new(Cell::new(None));
        schedule_population(host, Rc::downgrade(&scene), &alive, &idle_task);

        let frame_loop = AnimationLoop::new(Rc::clone(host));
        {
            let weak_scene = Rc::downgrade(&scene);
            let alive = Rc::clone(&alive);
            frame_loop.start(move |now| {
                if !alive.get() {
                    return;
                }
                if let Some(scene) = weak_scene.upgrade() {
                    scene.borrow_mut().frame(now);
                }
            });
        }

        let interval = {
            let weak_host = Rc::downgrade(host);
            let weak_scene = Rc::downgrade(&scene);
            let alive = Rc::clone(&alive);
            host.set_interval(
                self.config.replace_interval_ms,
                Box::new(move || {
                    if !alive.get() {
                        return;
                    }
                    if let (Some(host), Some(scene)) = (weak_host.upgrade(), weak_scene.upgrade()) {
                        if let Some(id) = scene.borrow_mut().replace_oldest(host.now()) {
                            log::debug!("[clouds] recycled drop {}", id);
                        }
                    }
                }),
            )
        };

        let extent = scene.borrow().visible.extent();
        log::info!(
            "[clouds] attached {}x{} px, target {} drops",
            extent.width,
            extent.height,
            self.config.drop_count
        );

        let view: Rc<RefCell<dyn SceneView>> = scene.clone();
        let host = Rc::clone(host);
        let teardown = move || {
            alive.set(false);
            frame_loop.stop();
            if let Some(id) = idle_task.take() {
                host.cancel_idle(id);
            }
            host.clear_interval(interval);
            container.disconnect_resize(resize);
            let mut scene = scene.borrow_mut();
            container.remove_surface(&scene.visible);
            let drops = std::mem::take(&mut scene.drops);
            let released = drops.len();
            scene.pool.borrow_mut().release_all(drops);
            log::info!("[clouds] detached, {} drops returned to pool", released);
        };

        Ok(Attachment {
            teardown: Some(Box::new(teardown)),
            view,
        })
    }
}

fn schedule_population<H: Host + 'static>(
    host: &Rc<H>,
    scene: Weak<RefCell<Scene<H::Surface>>>,
    alive: &Rc<Cell<bool>>,
    slot: &Rc<Cell<Option<TaskId>>>,
) {
    let weak_host = Rc::downgrade(host);
    let alive_idle = Rc::clone(alive);
    let slot_idle = Rc::clone(slot);
    let id = host.request_idle(Box::new(move |deadline: &dyn IdleDeadline| {
        slot_idle.set(None);
        if !alive_idle.get() {
            return;
        }
        let (Some(host), Some(strong)) = (weak_host.upgrade(), scene.upgrade()) else {
            return;
        };
        let full = strong.borrow_mut().populate(deadline, host.now());
        if full {
            log::debug!("[clouds] population complete");
        } else {
            schedule_population(&host, scene, &alive_idle, &slot_idle);
        }
    }));
    slot.set(Some(id));
}
