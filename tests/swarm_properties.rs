//! Integration tests for whole-swarm behavior.
//!
//! These drive the public API the way a front end would: build from a
//! configuration, tick, and inspect the flat buffers.

use curl_swarm::{
    fold_seed, ColorMapper, CurlSampler, DVec3, Extinction, NoiseField, NoiseType, Palette,
    SimConfig, Simulation, SpawnContext, SphereSampling, Vec3,
};

fn grid() -> impl Iterator<Item = (f64, f64, f64)> {
    (0..12).flat_map(|i| {
        (0..12).map(move |j| {
            let x = i as f64 * 0.731 - 4.0;
            let y = j as f64 * 1.337 - 8.0;
            (x, y, x * 0.5 - y * 0.25)
        })
    })
}

// ============================================================================
// Noise
// ============================================================================

#[test]
fn test_noise_deterministic_for_seed() {
    let a = NoiseField::new(42.0);
    let b = NoiseField::new(42.0);
    for (x, y, z) in grid() {
        let first = a.sample(x, y, z);
        assert_eq!(first.to_bits(), a.sample(x, y, z).to_bits());
        assert_eq!(first.to_bits(), b.sample(x, y, z).to_bits());
    }
}

#[test]
fn test_fractional_seed_folds_onto_integer_seed() {
    assert_eq!(fold_seed(0.5), 32768);
    assert_eq!(
        NoiseField::new(0.5).permutation(),
        NoiseField::new(32768.0).permutation()
    );

    // 128 is below 256, so its low byte is mirrored into the high byte
    let small = 128.0 / 65536.0;
    assert_eq!(fold_seed(small), 32896);
    assert_eq!(
        NoiseField::new(small).permutation(),
        NoiseField::new(32896.0).permutation()
    );
}

#[test]
fn test_curl_bounded_for_finite_inputs() {
    for noise_type in [NoiseType::ApproximateCurl, NoiseType::TrueCurl] {
        let field = CurlSampler::new(noise_type, 7.0, DVec3::new(100.0, 0.0, -3.0));
        for (x, y, z) in grid() {
            let c = field.curl(x, y, z);
            assert!(c.is_finite(), "{} at ({}, {}, {})", noise_type, x, y, z);
            assert!(c.abs().max_element() < 1.0e5);
        }
    }
}

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn test_sphere_sampling_containment_and_bias() {
    const SAMPLES: usize = 10_000;
    let diameter = 0.5;
    let mut ctx = SpawnContext::seeded(2024);

    let mut mean = |mode: SphereSampling| {
        let mut total = 0.0;
        for _ in 0..SAMPLES {
            let p = ctx.sample_sphere(mode, diameter);
            assert!(p.length() <= diameter + 1e-6, "{:?} escaped: {}", mode, p);
            total += p.length();
        }
        total / SAMPLES as f32
    };

    let uniform = mean(SphereSampling::Uniform);
    let weighted = mean(SphereSampling::Weighted);
    assert!(weighted < uniform, "weighted {} >= uniform {}", weighted, uniform);
}

// ============================================================================
// Simulation
// ============================================================================

fn scenario() -> SimConfig {
    SimConfig {
        num_particles: 100,
        spawn_sphere_diameter: 0.5,
        min_speed: 0.0001,
        max_speed: 0.002,
        v_min: 0.0001,
        noise_seed: 42.0,
        extinction_method: Extinction::MinSoftVelocityPerAxis,
        rng_seed: Some(42),
        ..SimConfig::default()
    }
}

#[test]
fn test_particle_count_never_changes() {
    for &extinction in Extinction::all() {
        let mut sim = Simulation::new(SimConfig {
            extinction_method: extinction,
            life_span_min: 3.0,
            life_span_max: 9.0,
            extinction_distance: 0.3,
            ..scenario()
        })
        .unwrap();

        for _ in 0..40 {
            sim.tick();
            let particles = sim.particles();
            assert_eq!(particles.len(), 100);
            assert_eq!(particles.position_data().len(), 3 * 100);
            assert_eq!(particles.velocity_data().len(), 3 * 100);
            assert_eq!(particles.color_data().len(), 4 * 100);
        }
    }
}

#[test]
fn test_forced_extinction_respawns_inside_sphere() {
    let mut sim = Simulation::new(SimConfig {
        v_min: 1.0e9,
        spawn_sphere_diameter: 0.25,
        ..scenario()
    })
    .unwrap();

    let stats = sim.tick();
    assert_eq!(stats.respawned, 100);
    for p in sim.particles().positions() {
        assert!(p.length() <= 0.25 + 1e-6);
    }
    assert!(sim.particles().ages().iter().all(|&age| age == 0));
}

#[test]
fn test_color_is_idempotent() {
    let colors = ColorMapper::new(Palette::Default, 1.0, 0.5, 1.0);
    let first = colors.color_with(0.0, 1.0, 0.5, 1.0);
    let second = colors.color_with(0.0, 1.0, 0.5, 1.0);
    assert_eq!(first, second);
    assert_eq!(first, colors.color_at(0.0));
}

#[test]
fn test_seed_42_scenario() {
    let mut sim = Simulation::new(scenario()).unwrap();
    let respawned = sim.run(1000);

    assert_eq!(sim.tick_count(), 1000);
    assert!(respawned > 0);
    assert_eq!(respawned, sim.total_respawns());
    assert!(sim.particles().positions().iter().all(|p| p.is_finite()));
    assert!(sim.particles().colors().iter().all(|c| c.is_finite()));
}

#[test]
fn test_age_fades_alpha() {
    let mut sim = Simulation::new(SimConfig {
        extinction_method: Extinction::Age,
        life_span_min: 50.0,
        life_span_max: 50.0,
        ..scenario()
    })
    .unwrap();

    sim.run(10);
    for c in sim.particles().colors() {
        assert!((c.w - 40.0 / 50.0).abs() < 1e-6);
    }

    sim.run(40);
    assert_eq!(sim.total_respawns(), 100);
    assert!(sim.particles().colors().iter().all(|c| c.w == 1.0));
}

#[test]
fn test_leash_keeps_particles_near_origin() {
    let mut sim = Simulation::new(SimConfig {
        extinction_method: Extinction::DistanceFromCenter,
        extinction_distance: 0.3,
        max_speed: 0.05,
        ..scenario()
    })
    .unwrap();

    for _ in 0..200 {
        sim.tick();
        let particles = sim.particles();
        for i in 0..particles.len() {
            let p = particles.positions()[i];
            if particles.ages()[i] == 0 {
                assert!(
                    p.length() <= 0.5 + 1e-6,
                    "respawned outside the sphere: {}",
                    p
                );
            } else {
                // survivors were inside the leash before their last step
                let before = p - particles.velocities()[i];
                assert!(
                    before.length() <= 0.3 + 1e-5,
                    "{} escaped the leash",
                    before
                );
            }
        }
    }
}

#[test]
fn test_config_round_trip_drives_same_swarm() {
    let json = scenario().to_json().unwrap();
    let loaded = SimConfig::from_json(&json).unwrap();
    assert_eq!(loaded, scenario());

    let mut a = Simulation::new(scenario()).unwrap();
    let mut b = Simulation::new(loaded).unwrap();
    a.run(25);
    b.run(25);
    assert_eq!(a.particles().position_data(), b.particles().position_data());
}

#[test]
fn test_flat_noise_moves_in_sheets() {
    let field = CurlSampler::new(NoiseType::ApproximateCurl, 3.0, DVec3::ZERO).with_flat(true);
    let p = Vec3::new(0.2, -0.1, 0.9);
    let q = Vec3::new(0.2, -0.1, -0.4);
    assert_eq!(field.sample(p), field.sample(q));
}
