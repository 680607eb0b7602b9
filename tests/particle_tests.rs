//! Particle System Tests
//!
//! Tests for:
//! - First-frame allocation and fixed slot count
//! - Age-bounded death and in-place replacement
//! - Seeded determinism across runs and restarts
//! - Force accumulation and semi-implicit Euler integration

use glam::Vec3;

use marionette::MarionetteError;
use marionette::resources::primitives::Sphere;
use marionette::scene::{ConstantForce, DragForce, ParticleState, ParticleSystem, PointSource, Surface};
use marionette::settings::SceneSettings;

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn fountain(count: usize) -> ParticleSystem {
    let source = PointSource {
        position: Vec3::new(0.0, 1.0, 0.0),
        velocity_min: 1.0,
        velocity_max: 2.0,
        color: Vec3::new(0.8, 0.4, 0.1),
        color_variation: Vec3::splat(0.2),
        ..PointSource::default()
    };
    ParticleSystem::new(count, Surface::sphere(Sphere::new(Vec3::ZERO, 0.05)), source)
        .with_ages(1.0, 2.0)
        .with_force(ConstantForce { force: Vec3::new(0.0, -9.8, 0.0) })
        .with_force(DragForce { coefficient: 0.1 })
}

fn tesselated(count: usize) -> ParticleSystem {
    let mut system = fountain(count);
    system.tesselate(&SceneSettings::default()).unwrap();
    system
}

fn snapshot(system: &ParticleSystem) -> Vec<ParticleState> {
    system.particles().to_vec()
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn tesselate_populates_all_slots() {
    let system = tesselated(50);
    assert!(system.is_allocated());
    assert_eq!(system.particles().len(), 50);
    assert!(system.particles().iter().all(|p| p.creation_time == 0.0));
    assert!(system.geometry.tesselated_mesh().is_some());
}

#[test]
fn first_animate_allocates_without_dynamics() {
    let mut system = fountain(10);
    assert!(system.particles().is_empty());
    system.animate(0.0).unwrap();
    for p in system.particles() {
        assert_eq!(p.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p.acceleration, Vec3::ZERO);
    }
}

#[test]
fn slot_count_never_changes() {
    let mut system = tesselated(64);
    for i in 1..=60 {
        system.animate(i as f32 * 0.1).unwrap();
        assert_eq!(system.particles().len(), 64);
    }
}

#[test]
fn zero_particles_is_a_no_op() {
    let mut system = tesselated(0);
    system.animate(1.0).unwrap();
    system.animate(5.0).unwrap();
    assert!(system.particles().is_empty());
}

#[test]
fn invalid_age_bounds_are_rejected() {
    let mut system = fountain(4).with_ages(2.0, 1.0);
    assert!(matches!(
        system.tesselate(&SceneSettings::default()),
        Err(MarionetteError::InvalidParticleSystem(_))
    ));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn no_deaths_before_min_age_and_all_replaced_after_max_age() {
    let mut system = tesselated(100);

    system.animate(0.5).unwrap();
    assert!(system.particles().iter().all(|p| p.creation_time == 0.0));

    system.animate(1.5).unwrap();
    system.animate(2.0).unwrap();
    assert!(
        system.particles().iter().all(|p| p.creation_time > 0.0),
        "every original particle should have been replaced by t=2"
    );
}

#[test]
fn ages_stay_within_bounds() {
    let mut system = tesselated(100);
    for i in 1..=80 {
        let time = i as f32 * 0.05;
        let before = snapshot(&system);
        system.animate(time).unwrap();

        for (old, new) in before.iter().zip(system.particles()) {
            assert!(new.age(time) < system.age_max, "age {} at t={time}", new.age(time));
            if new.creation_time != old.creation_time {
                assert!(old.age(time) >= system.age_min, "replaced at age {}", old.age(time));
                assert_eq!(new.creation_time, time);
            }
        }
    }
}

#[test]
fn repeated_time_is_idempotent() {
    let mut system = tesselated(20);
    system.animate(1.2).unwrap();
    let first = snapshot(&system);
    system.animate(1.2).unwrap();
    assert_eq!(first, snapshot(&system));
}

#[test]
fn rewinding_time_is_ignored() {
    let mut system = tesselated(20);
    system.animate(1.0).unwrap();
    let first = snapshot(&system);
    system.animate(0.5).unwrap();
    assert_eq!(first, snapshot(&system));
    assert_eq!(system.last_time(), 1.0);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn identical_runs_are_bit_identical() {
    let mut a = tesselated(100);
    let mut b = tesselated(100);
    for time in [0.25, 0.5, 1.1, 1.5, 1.9, 2.4, 3.0] {
        a.animate(time).unwrap();
        b.animate(time).unwrap();
        assert_eq!(snapshot(&a), snapshot(&b), "diverged at t={time}");
    }
}

#[test]
fn restart_replays_from_scratch() {
    let times = [0.0, 0.7, 1.4, 2.2];
    let mut system = fountain(30);
    let mut first_run = Vec::new();
    for t in times {
        system.animate(t).unwrap();
        first_run.push(snapshot(&system));
    }

    system.restart_animation().unwrap();
    assert!(!system.is_allocated());
    assert!(system.particles().is_empty());

    for (t, expected) in times.into_iter().zip(&first_run) {
        system.animate(t).unwrap();
        assert_eq!(&snapshot(&system), expected, "replay diverged at t={t}");
    }
}

#[test]
fn seed_assigned_after_construction_replays_after_restart() {
    let mut system = fountain(10);
    system.seed = 42;
    system.animate(0.0).unwrap();
    system.animate(1.3).unwrap();
    let first = snapshot(&system);

    system.restart_animation().unwrap();
    system.animate(0.0).unwrap();
    system.animate(1.3).unwrap();
    assert_eq!(first, snapshot(&system));

    let mut fresh = fountain(10).with_seed(42);
    fresh.animate(0.0).unwrap();
    fresh.animate(1.3).unwrap();
    assert_eq!(first, snapshot(&fresh));
}

#[test]
fn different_seeds_differ() {
    let mut a = fountain(10).with_seed(1);
    let mut b = fountain(10).with_seed(2);
    a.animate(0.0).unwrap();
    b.animate(0.0).unwrap();
    assert_ne!(snapshot(&a), snapshot(&b));
}

/// Fraction of the particles born at t=0 still alive at t=2 with a
/// uniform lifetime over [1, 3], stepping by `step`.
fn survivors_at_two(step: f32) -> f32 {
    let mut system = fountain(2000).with_ages(1.0, 3.0);
    system.animate(0.0).unwrap();
    let steps = (2.0 / step).round() as usize;
    for i in 1..=steps {
        system.animate(i as f32 * step).unwrap();
    }
    let alive = system.particles().iter().filter(|p| p.creation_time == 0.0).count();
    alive as f32 / 2000.0
}

#[test]
fn death_rate_does_not_depend_on_step_size() {
    // half of a uniform [1, 3] lifetime is over by age 2
    let coarse = survivors_at_two(0.5);
    let fine = survivors_at_two(0.05);
    assert!((coarse - 0.5).abs() < 0.1, "coarse {coarse}");
    assert!((fine - 0.5).abs() < 0.1, "fine {fine}");
}

#[test]
fn short_step_inside_window_kills_few() {
    let mut system = fountain(1000).with_ages(1.0, 3.0);
    system.animate(0.0).unwrap();
    system.animate(1.9).unwrap();
    let alive_before = system.particles().iter().filter(|p| p.creation_time == 0.0).count();
    system.animate(2.0).unwrap();
    let alive_after = system.particles().iter().filter(|p| p.creation_time == 0.0).count();
    // 0.1 of the remaining 1.1 seconds of window
    let deaths = alive_before - alive_after;
    assert!(deaths * 4 < alive_before, "{deaths} of {alive_before} died");
}

// ============================================================================
// Dynamics
// ============================================================================

#[test]
fn constant_force_integrates_semi_implicitly() {
    let source = PointSource {
        velocity_min: 0.0,
        velocity_max: 0.0,
        mass: 2.0,
        ..PointSource::default()
    };
    let mut system = ParticleSystem::new(1, Surface::sphere(Sphere::default()), source)
        .with_ages(100.0, 200.0)
        .with_force(ConstantForce { force: Vec3::new(0.0, -10.0, 0.0) });

    system.animate(0.0).unwrap();
    system.animate(0.5).unwrap();

    let p = system.particles()[0];
    assert!(vec3_approx(p.acceleration, Vec3::new(0.0, -5.0, 0.0)));
    assert!(vec3_approx(p.velocity, Vec3::new(0.0, -2.5, 0.0)));
    assert!(vec3_approx(p.position, Vec3::new(0.0, -1.25, 0.0)));
}

#[test]
fn source_colors_stay_in_unit_range() {
    let system = tesselated(200);
    for p in system.particles() {
        assert!(p.color.cmpge(Vec3::ZERO).all() && p.color.cmple(Vec3::ONE).all());
        let speed = p.velocity.length();
        assert!((1.0 - EPSILON..=2.0 + EPSILON).contains(&speed));
    }
}
