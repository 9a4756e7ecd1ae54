// Host-side tests for attach/populate/refresh/detach, driven by the
// headless host so every callback runs exactly when the test says so.

use cloud_core::headless::{ManualContainer, ManualHost};
use cloud_core::{CloudConfig, CloudEngine, DropPool, Extent, SharedPool};
use std::rc::Rc;

struct Fixture {
    host: Rc<ManualHost>,
    pool: SharedPool,
    engine: CloudEngine<ManualHost>,
}

fn fixture_with(host: ManualHost, config: CloudConfig) -> Fixture {
    let host = Rc::new(host);
    let pool = DropPool::shared();
    let engine = CloudEngine::new(Rc::clone(&host), Rc::clone(&pool), config, 7);
    Fixture { host, pool, engine }
}

fn fixture() -> Fixture {
    fixture_with(ManualHost::new(), CloudConfig::default())
}

/// Run idle slices until population stops rescheduling.
fn populate(host: &ManualHost, slots: usize) {
    let mut rounds = 0;
    while host.run_idle(slots) > 0 {
        rounds += 1;
        assert!(rounds < 100, "population never finished");
    }
}

fn active_ids(a: &cloud_core::Attachment) -> Vec<u64> {
    a.drops().iter().map(|d| d.id).collect()
}

#[test]
fn attach_mounts_and_schedules_everything() {
    let mut f = fixture();
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    let a = f.engine.attach(Rc::clone(&container)).expect("attached");

    assert!(a.is_attached());
    assert_eq!(container.mounted_surfaces(), 1);
    assert_eq!(container.observer_count(), 1);
    assert_eq!(f.host.pending_frames(), 1);
    assert_eq!(f.host.pending_idles(), 1);
    assert_eq!(f.host.interval_periods(), vec![15_000.0]);
    assert_eq!(a.surface_extent(), Extent::new(400.0, 300.0));
    assert_eq!(a.active_count(), 0);
}

#[test]
fn population_fills_to_drop_count_over_idle_slices() {
    let mut f = fixture();
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    let a = f.engine.attach(container).expect("attached");

    assert_eq!(f.host.run_idle(3), 1);
    assert_eq!(a.active_count(), 3);
    assert_eq!(f.host.pending_idles(), 1);

    populate(&f.host, 3);
    assert_eq!(a.active_count(), 8);
    assert_eq!(f.host.pending_idles(), 0);
}

#[test]
fn exhausted_slice_yields_without_progress() {
    let mut f = fixture();
    let a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("attached");
    f.host.run_idle(0);
    assert_eq!(a.active_count(), 0);
    assert_eq!(f.host.pending_idles(), 1);
}

#[test]
fn replacement_pools_the_oldest_and_keeps_the_count() {
    let mut f = fixture();
    let a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("attached");

    // Four drops age by one frame before the other four exist.
    f.host.run_idle(4);
    f.host.step(100.0);
    populate(&f.host, 4);
    assert_eq!(a.active_count(), 8);
    let before = a.drops();
    assert!(before[0].life > 0.0 && before[7].life == 0.0);
    let oldest = before[0].id;

    f.host.advance(15_000.0 - 100.0);
    let after = active_ids(&a);
    assert_eq!(after.len(), 8);
    assert!(!after.contains(&oldest));
    assert!(f.pool.borrow().contains(oldest));
    assert_eq!(f.pool.borrow().len(), 1);
    // Only the retired slot changed.
    let changed = before
        .iter()
        .zip(&after)
        .filter(|(b, id)| b.id != **id)
        .count();
    assert_eq!(changed, 1);
}

#[test]
fn replacement_on_empty_scene_does_nothing() {
    let mut f = fixture();
    let a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("attached");
    f.host.advance(15_000.0);
    assert_eq!(a.active_count(), 0);
    assert!(f.pool.borrow().is_empty());
}

#[test]
fn replacement_cadence_ignores_lifespans() {
    let config = CloudConfig {
        lifespan_ms: 1_000.0,
        lifespan_jitter_ms: 0.0,
        ..CloudConfig::default()
    };
    let mut f = fixture_with(ManualHost::new(), config);
    let a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("attached");
    populate(&f.host, 8);

    for _ in 0..3 {
        let before = active_ids(&a);
        f.host.advance(14_999.0);
        assert_eq!(active_ids(&a), before);
        f.host.advance(1.0);
        let after = active_ids(&a);
        let changed = before.iter().zip(&after).filter(|(b, c)| b != c).count();
        assert_eq!(changed, 1);
    }
}

#[test]
fn frames_are_gated_to_the_update_interval() {
    let mut f = fixture();
    let a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("attached");
    populate(&f.host, 8);

    assert_eq!(f.host.step(10.0), 1);
    assert_eq!(a.frames_presented(), 0);
    assert_eq!(f.host.step(10.0), 1);
    assert_eq!(a.frames_presented(), 1);
    for _ in 0..10 {
        f.host.step(1000.0 / 60.0 + 0.1);
    }
    assert_eq!(a.frames_presented(), 11);
    assert!(a.drops().iter().all(|d| d.life > 0.0));
}

#[test]
fn resize_follows_container_and_pixel_ratio() {
    let mut f = fixture_with(ManualHost::new().with_pixel_ratio(2.0), CloudConfig::default());
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    let a = f.engine.attach(Rc::clone(&container)).expect("attached");
    populate(&f.host, 8);
    assert_eq!(a.surface_extent(), Extent::new(800.0, 600.0));
    // Drops live in CSS pixels; only the backing store is scaled.
    assert_eq!(a.surface_bounds(), Extent::new(400.0, 300.0));
    assert!(a
        .drops()
        .iter()
        .all(|d| d.position.x <= 400.0 && d.position.y <= 300.0));

    container.resize(800.0, 600.0);
    assert_eq!(a.surface_extent(), Extent::new(1600.0, 1200.0));
    assert_eq!(a.surface_bounds(), Extent::new(800.0, 600.0));
    assert_eq!(a.active_count(), 8);

    f.host.set_pixel_ratio(1.0);
    container.resize(800.0, 600.0);
    assert_eq!(a.surface_extent(), Extent::new(800.0, 600.0));
}

#[test]
fn detach_twice_is_harmless_and_silences_callbacks() {
    let mut f = fixture();
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    let mut a = f.engine.attach(Rc::clone(&container)).expect("attached");
    populate(&f.host, 8);
    f.host.step(20.0);

    a.detach();
    a.detach();
    assert!(!a.is_attached());
    assert_eq!(container.mounted_surfaces(), 0);
    assert_eq!(container.observer_count(), 0);
    assert_eq!(f.host.pending_frames(), 0);
    assert_eq!(f.host.pending_idles(), 0);
    assert_eq!(f.host.active_intervals(), 0);
    assert_eq!(a.active_count(), 0);
    assert_eq!(f.pool.borrow().len(), 8);

    let fired = f.host.callbacks_fired();
    f.host.step(60_000.0);
    f.host.run_idle(8);
    container.resize(10.0, 10.0);
    assert_eq!(f.host.callbacks_fired(), fired);
}

#[test]
fn detach_during_population_cancels_the_idle_task() {
    let mut f = fixture();
    let mut a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("attached");
    f.host.run_idle(2);
    assert_eq!(f.host.pending_idles(), 1);
    a.detach();
    assert_eq!(f.host.pending_idles(), 0);
    assert_eq!(f.pool.borrow().len(), 2);
}

#[test]
fn dropping_the_handle_detaches() {
    let mut f = fixture();
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    let a = f.engine.attach(Rc::clone(&container)).expect("attached");
    populate(&f.host, 8);
    drop(a);
    assert_eq!(container.mounted_surfaces(), 0);
    assert_eq!(f.host.pending_frames(), 0);
    assert_eq!(f.host.active_intervals(), 0);
    assert_eq!(f.pool.borrow().len(), 8);
}

#[test]
fn unsupported_context_attaches_nothing() {
    let mut f = fixture();
    f.host.set_surfaces_supported(false);
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    assert!(f.engine.attach(Rc::clone(&container)).is_none());
    assert_eq!(container.mounted_surfaces(), 0);
    assert_eq!(container.observer_count(), 0);
    assert_eq!(f.host.pending_frames(), 0);
    assert_eq!(f.host.pending_idles(), 0);
    assert_eq!(f.host.active_intervals(), 0);
}

#[test]
fn mount_failure_attaches_nothing() {
    let mut f = fixture();
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    container.set_fail_mount(true);
    assert!(f.engine.attach(Rc::clone(&container)).is_none());
    assert_eq!(container.observer_count(), 0);
    assert_eq!(f.host.pending_frames(), 0);
    assert_eq!(f.host.active_intervals(), 0);
}

#[test]
fn invalid_config_attaches_nothing() {
    let config = CloudConfig {
        drop_count: 0,
        ..CloudConfig::default()
    };
    let mut f = fixture_with(ManualHost::new(), config);
    let container = Rc::new(ManualContainer::new(400.0, 300.0));
    assert!(f.engine.attach(Rc::clone(&container)).is_none());
    assert_eq!(container.mounted_surfaces(), 0);
    assert_eq!(f.host.pending_idles(), 0);
}

#[test]
fn instances_share_the_pool() {
    let mut f = fixture();
    let mut first = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("first");
    populate(&f.host, 8);
    let mut retired = active_ids(&first);
    first.detach();
    assert_eq!(f.pool.borrow().len(), 8);

    let second = f
        .engine
        .attach(Rc::new(ManualContainer::new(200.0, 200.0)))
        .expect("second");
    populate(&f.host, 8);
    assert!(f.pool.borrow().is_empty());
    let mut reused = active_ids(&second);
    retired.sort_unstable();
    reused.sort_unstable();
    assert_eq!(reused, retired);
    assert!(second.drops().iter().all(|d| d.life == 0.0 && d.alpha == 0.0));
}

#[test]
fn engine_with_config_shares_pool_and_ids() {
    let mut f = fixture();
    let mut small = f.engine.with_config(CloudConfig {
        drop_count: 2,
        ..CloudConfig::default()
    });
    let a = f
        .engine
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("default");
    let b = small
        .attach(Rc::new(ManualContainer::new(400.0, 300.0)))
        .expect("small");
    populate(&f.host, 8);
    assert_eq!(a.active_count(), 8);
    assert_eq!(b.active_count(), 2);
    let mut ids = active_ids(&a);
    ids.extend(active_ids(&b));
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert!(Rc::ptr_eq(small.pool(), &f.pool));
}
