//! Particle systems.
//!
//! A particle system owns a fixed number of slots. The first animate call
//! fills every slot from the source; after that each step either integrates
//! a particle or, once it has died of old age, replaces it in place. The
//! slot count never changes until the system is restarted.

use std::f32::consts::TAU;
use std::fmt::Debug;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::{MarionetteError, Result};
use crate::scene::surface::Surface;
use crate::settings::SceneSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub color: Vec3,
    pub creation_time: f32,
    pub mass: f32,
    pub size: f32,
}

impl ParticleState {
    /// A resting unit-mass white particle born at `time`.
    #[must_use]
    pub fn new(time: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            color: Vec3::ONE,
            creation_time: time,
            mass: 1.0,
            size: 1.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn age(&self, time: f32) -> f32 {
        time - self.creation_time
    }
}

// ============================================================================
// Sources and forces
// ============================================================================

/// Fills a freshly born particle.
///
/// The state arrives with its creation time already set; the source owns
/// every other field.
pub trait ParticleSource: Debug {
    fn create_particle(&self, state: &mut ParticleState, rng: &mut StdRng);

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A force acting on a living particle.
pub trait ParticleForce: Debug {
    fn evaluate(&self, state: &ParticleState, rng: &mut StdRng) -> Vec3;
}

/// Emits particles from a single point in uniformly random directions.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSource {
    pub position: Vec3,
    pub velocity_min: f32,
    pub velocity_max: f32,
    pub color: Vec3,
    /// Per-channel random offset added to `color`, result clamped to [0, 1].
    pub color_variation: Vec3,
    pub mass: f32,
    pub size: f32,
}

impl Default for PointSource {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity_min: 0.0,
            velocity_max: 1.0,
            color: Vec3::ONE,
            color_variation: Vec3::ZERO,
            mass: 1.0,
            size: 1.0,
        }
    }
}

impl ParticleSource for PointSource {
    fn create_particle(&self, state: &mut ParticleState, rng: &mut StdRng) {
        let z = rng.random::<f32>() * 2.0 - 1.0;
        let phi = rng.random::<f32>() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        let direction = Vec3::new(r * phi.cos(), r * phi.sin(), z);

        let speed = self.velocity_min + (self.velocity_max - self.velocity_min) * rng.random::<f32>();

        let jitter = Vec3::new(rng.random(), rng.random(), rng.random());

        state.position = self.position;
        state.velocity = direction * speed;
        state.acceleration = Vec3::ZERO;
        state.color = (self.color + self.color_variation * jitter).clamp(Vec3::ZERO, Vec3::ONE);
        state.mass = self.mass;
        state.size = self.size;
    }

    fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(MarionetteError::InvalidParticleSystem(format!(
                "particle mass must be positive, got {}",
                self.mass
            )));
        }
        if !(self.velocity_min.is_finite() && self.velocity_max.is_finite())
            || self.velocity_min > self.velocity_max
        {
            return Err(MarionetteError::InvalidParticleSystem(format!(
                "velocity range [{}, {}] is not valid",
                self.velocity_min, self.velocity_max
            )));
        }
        Ok(())
    }
}

/// Uniform force, e.g. gravity or wind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantForce {
    pub force: Vec3,
}

impl ParticleForce for ConstantForce {
    fn evaluate(&self, _state: &ParticleState, _rng: &mut StdRng) -> Vec3 {
        self.force
    }
}

/// Linear drag, `-k * v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragForce {
    pub coefficient: f32,
}

impl ParticleForce for DragForce {
    fn evaluate(&self, state: &ParticleState, _rng: &mut StdRng) -> Vec3 {
        -self.coefficient * state.velocity
    }
}

// ============================================================================
// Particle system
// ============================================================================

#[derive(Debug)]
pub struct ParticleSystem {
    pub num_particles: usize,
    /// Geometry drawn at each particle.
    pub geometry: Surface,
    pub source: Box<dyn ParticleSource>,
    /// Applied in order; their sum drives the integration.
    pub forces: Vec<Box<dyn ParticleForce>>,
    pub age_min: f32,
    pub age_max: f32,
    /// Seeds the generator each time the slots are populated.
    pub seed: u64,

    // === Runtime data ===
    particles: Option<Vec<ParticleState>>,
    // Next frame is built here, then swapped with `particles`
    back: Vec<ParticleState>,
    last_time: f32,
    rng: StdRng,
}

impl ParticleSystem {
    #[must_use]
    pub fn new(num_particles: usize, geometry: Surface, source: impl ParticleSource + 'static) -> Self {
        Self {
            num_particles,
            geometry,
            source: Box::new(source),
            forces: Vec::new(),
            age_min: 1.0,
            age_max: 2.0,
            seed: 0,
            particles: None,
            back: Vec::new(),
            last_time: 0.0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    #[must_use]
    pub fn with_ages(mut self, age_min: f32, age_max: f32) -> Self {
        self.age_min = age_min;
        self.age_max = age_max;
        self
    }

    #[must_use]
    pub fn with_force(mut self, force: impl ParticleForce + 'static) -> Self {
        self.forces.push(Box::new(force));
        self
    }

    /// Sets the random seed used from the next population on.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Current particles; empty until the first animate call.
    #[must_use]
    pub fn particles(&self) -> &[ParticleState] {
        self.particles.as_deref().unwrap_or(&[])
    }

    #[inline]
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.particles.is_some()
    }

    #[inline]
    #[must_use]
    pub fn last_time(&self) -> f32 {
        self.last_time
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.age_min.is_finite() && self.age_max.is_finite())
            || self.age_min < 0.0
            || self.age_min > self.age_max
        {
            return Err(MarionetteError::InvalidParticleSystem(format!(
                "age bounds [{}, {}] must satisfy 0 <= age_min <= age_max",
                self.age_min, self.age_max
            )));
        }
        self.source.validate()
    }

    /// Tesselates the particle geometry and populates the slots at time 0.
    pub fn tesselate(&mut self, settings: &SceneSettings) -> Result<()> {
        self.validate()?;
        self.geometry.tesselate(settings)?;
        self.animate(0.0)
    }

    /// Advances every slot to `time`.
    pub fn animate(&mut self, time: f32) -> Result<()> {
        let Some(current) = self.particles.take() else {
            self.populate(time);
            return Ok(());
        };

        let delta = time - self.last_time;
        if delta <= 0.0 {
            if delta < 0.0 {
                log::warn!(
                    "particle time went backwards ({} -> {time}), restart the animation to rewind",
                    self.last_time
                );
            }
            self.particles = Some(current);
            return Ok(());
        }

        let mut next = std::mem::take(&mut self.back);
        next.clear();
        next.reserve(current.len());

        let mut deaths = 0_usize;
        for state in &current {
            if self.is_particle_dead(time, delta, state) {
                next.push(self.create_particle(time));
                deaths += 1;
            } else {
                next.push(self.integrate(*state, delta));
            }
        }

        self.back = current;
        self.particles = Some(next);
        self.last_time = time;
        log::trace!("particles at t={time}: {deaths} replaced");
        Ok(())
    }

    /// Drops every particle, so the next animate call reseeds and
    /// repopulates from scratch.
    pub fn restart_animation(&mut self) -> Result<()> {
        self.particles = None;
        self.back.clear();
        self.last_time = 0.0;
        self.geometry.restart_animation()
    }

    fn populate(&mut self, time: f32) {
        self.rng = StdRng::seed_from_u64(self.seed);
        let particles: Vec<ParticleState> = (0..self.num_particles).map(|_| self.create_particle(time)).collect();
        self.particles = Some(particles);
        self.last_time = time;
        log::debug!("allocated {} particles at t={time}", self.num_particles);
    }

    fn create_particle(&mut self, time: f32) -> ParticleState {
        let mut state = ParticleState::new(time);
        self.source.create_particle(&mut state, &mut self.rng);
        state
    }

    /// Decides whether a particle dies during the step of length `delta`
    /// that ends at `time`.
    ///
    /// Lifetimes are uniform over `[age_min, age_max]`: the chance is that of
    /// a uniform lifetime ending inside the part of the step that overlaps
    /// the window, given that it had not ended before. It grows towards 1 as
    /// the age approaches `age_max` and does not depend on the step size.
    fn is_particle_dead(&mut self, time: f32, delta: f32, state: &ParticleState) -> bool {
        let age = state.age(time);
        if age < self.age_min {
            return false;
        }
        if age >= self.age_max {
            return true;
        }
        let in_window = delta.min(age - self.age_min);
        let probability = in_window / (self.age_max - age + in_window);
        self.rng.random::<f32>() < probability
    }

    fn integrate(&mut self, mut state: ParticleState, delta: f32) -> ParticleState {
        let force = self
            .forces
            .iter()
            .fold(Vec3::ZERO, |acc, f| acc + f.evaluate(&state, &mut self.rng));
        state.acceleration = force / state.mass;
        state.velocity += state.acceleration * delta;
        state.position += state.velocity * delta;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_opposes_velocity() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = ParticleState::new(0.0);
        state.velocity = Vec3::new(2.0, 0.0, -4.0);
        let f = DragForce { coefficient: 0.5 }.evaluate(&state, &mut rng);
        assert_eq!(f, Vec3::new(-1.0, 0.0, 2.0));
    }

    #[test]
    fn point_source_speed_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let source = PointSource {
            velocity_min: 2.0,
            velocity_max: 3.0,
            ..PointSource::default()
        };
        for _ in 0..100 {
            let mut state = ParticleState::new(0.0);
            source.create_particle(&mut state, &mut rng);
            let speed = state.velocity.length();
            assert!((2.0 - 1e-4..=3.0 + 1e-4).contains(&speed), "speed {speed}");
            assert!(state.color.cmple(Vec3::ONE).all());
        }
    }

    #[test]
    fn point_source_rejects_non_positive_mass() {
        let source = PointSource {
            mass: 0.0,
            ..PointSource::default()
        };
        assert!(matches!(
            source.validate(),
            Err(MarionetteError::InvalidParticleSystem(_))
        ));
    }
}
