// Host-side tests for drop creation and the shared pool.

use cloud_core::{CloudConfig, DropFactory, DropPool, Extent, Tone};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

const BOUNDS: Extent = Extent::new(400.0, 300.0);

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn lowest_draws_produce_the_range_minimums() {
    let config = CloudConfig::default();
    let mut rng = StepRng::new(0, 0);
    let d = DropFactory::new().create(&config, BOUNDS, 12.5, &mut rng);

    assert_eq!(d.id, 0);
    assert_eq!(d.tone, Tone::Dark);
    assert_eq!(d.color, config.dark_palette[0]);
    assert_eq!(d.position.x, 0.0);
    assert_eq!(d.position.y, 0.0);
    assert!(approx(d.radius, 100.0));
    assert!(approx(d.target_radius, 100.0));
    assert!(approx(d.velocity.x, -0.0025));
    assert!(approx(d.velocity.y, -0.00075));
    assert!(approx(d.target_alpha, 0.10));
    assert_eq!(d.rotation, 0.0);
    assert!(approx(d.rotation_speed, -0.00002));
    assert!(approx(d.max_life, 50_000.0));
    assert!(approx(d.scale, 0.95));
    assert_eq!(d.target_scale, d.scale);
    assert_eq!(d.points.len(), 26);
    assert!(d.points.iter().all(|&p| approx(p, 0.95)));
    assert_eq!(d.alpha, 0.0);
    assert_eq!(d.life, 0.0);
    assert_eq!(d.last_update, 12.5);
}

#[test]
fn highest_draws_pick_light_tone_and_last_color() {
    let config = CloudConfig::default();
    let mut rng = StepRng::new(u64::MAX, 0);
    let d = DropFactory::new().create(&config, BOUNDS, 0.0, &mut rng);
    assert_eq!(d.tone, Tone::Light);
    assert_eq!(d.color, config.light_palette[2]);
    assert!(d.position.x < BOUNDS.width && d.position.x > 399.0);
    assert!(d.radius <= 200.0 && d.radius > 199.0);
    assert!(d.max_life <= 55_000.0 && d.max_life > 54_999.0);
}

#[test]
fn created_drops_stay_within_configured_ranges() {
    let config = CloudConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut factory = DropFactory::new();
    for _ in 0..200 {
        let d = factory.create(&config, BOUNDS, 0.0, &mut rng);
        assert!(d.position.x >= 0.0 && d.position.x <= BOUNDS.width);
        assert!(d.position.y >= 0.0 && d.position.y <= BOUNDS.height);
        assert!(config.radius.contains(d.radius));
        assert!(config.radius.contains(d.target_radius));
        assert!(config.scale.contains(d.scale));
        assert!(config.target_alpha.contains(d.target_alpha));
        assert!(d.velocity.x.abs() <= config.max_speed / 2.0);
        assert!(d.velocity.y.abs() <= config.max_speed / 2.0 * config.vertical_speed_factor);
        assert!(d.max_life >= config.lifespan_ms);
        assert!(d.max_life <= config.lifespan_ms + config.lifespan_jitter_ms);
        assert_eq!(d.points.len(), config.point_count);
        assert!(d.points.iter().all(|p| config.point_range().contains(*p)));
        let palette = match d.tone {
            Tone::Light => &config.light_palette,
            Tone::Dark => &config.dark_palette,
        };
        assert!(palette.contains(&d.color));
    }
    assert_eq!(factory.created(), 200);
}

#[test]
fn same_seed_same_drops() {
    let config = CloudConfig::default();
    let a = DropFactory::new().create(&config, BOUNDS, 0.0, &mut StdRng::seed_from_u64(9));
    let b = DropFactory::new().create(&config, BOUNDS, 0.0, &mut StdRng::seed_from_u64(9));
    assert_eq!(a.position, b.position);
    assert_eq!(a.points, b.points);
    assert_eq!(a.max_life, b.max_life);
}

#[test]
fn ids_are_unique_per_factory() {
    let config = CloudConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    let mut factory = DropFactory::new();
    let ids: Vec<u64> = (0..10)
        .map(|_| factory.create(&config, BOUNDS, 0.0, &mut rng).id)
        .collect();
    let mut sorted = ids.clone();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

#[test]
fn released_drop_is_returned_by_next_acquire() {
    let config = CloudConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut factory = DropFactory::new();
    let mut pool = DropPool::new();

    let mut d = pool.acquire(&mut factory, &config, BOUNDS, 0.0, &mut rng);
    d.life = 40_000.0;
    d.alpha = 0.2;
    let id = d.id;
    let points = d.points.clone();
    pool.release(d);
    assert_eq!(pool.len(), 1);
    assert!(pool.contains(id));

    let again = pool.acquire(&mut factory, &config, BOUNDS, 900.0, &mut rng);
    assert_eq!(again.id, id);
    assert!(pool.is_empty());
    assert_eq!(factory.created(), 1);
    // Revived for a new life, shape kept.
    assert_eq!(again.life, 0.0);
    assert_eq!(again.alpha, 0.0);
    assert_eq!(again.last_update, 900.0);
    assert_eq!(again.points, points);
}

#[test]
fn empty_pool_creates_fresh_drops() {
    let config = CloudConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut factory = DropFactory::new();
    let mut pool = DropPool::new();
    let a = pool.acquire(&mut factory, &config, BOUNDS, 0.0, &mut rng);
    let b = pool.acquire(&mut factory, &config, BOUNDS, 0.0, &mut rng);
    assert_ne!(a.id, b.id);
    assert_eq!(factory.created(), 2);
}

#[test]
fn release_all_then_drain_yields_each_drop_once() {
    let config = CloudConfig::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut factory = DropFactory::new();
    let mut pool = DropPool::new();
    let drops: Vec<_> = (0..5)
        .map(|_| pool.acquire(&mut factory, &config, BOUNDS, 0.0, &mut rng))
        .collect();
    pool.release_all(drops);
    assert_eq!(pool.len(), 5);

    let mut ids: Vec<u64> = (0..5)
        .map(|_| pool.acquire(&mut factory, &config, BOUNDS, 0.0, &mut rng).id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(factory.created(), 5);
}

#[test]
fn empty_palette_falls_back_instead_of_panicking() {
    let config = CloudConfig {
        dark_palette: Vec::new(),
        light_palette: Vec::new(),
        ..CloudConfig::default()
    };
    let mut rng = StepRng::new(0, 0);
    let d = DropFactory::new().create(&config, BOUNDS, 0.0, &mut rng);
    assert_eq!(d.color, CloudConfig::default().dark_palette[0]);
    assert_eq!(d.points.len(), config.point_count);
}
