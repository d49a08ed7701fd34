//! Spawning and per-tick evolution of a particle set.
//!
//! All per-kind behaviour is read from the `EmitterProfile` table; the tick step itself
//! has no kind-specific branches.

use crate::config::Physics;
use crate::particle::{Particle, Viewport};
use crate::profile::{EffectKind, EmitterProfile, Intensity, VisualRule};
use crate::random::RandomSource;

/// Creates `profile.particle_count(intensity)` particles with independent draws.
pub fn spawn(
    profile: &EmitterProfile,
    intensity: Intensity,
    viewport: Viewport,
    rng: &mut dyn RandomSource,
) -> Vec<Particle> {
    let count = profile.particle_count(intensity);
    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = profile.spawn.sample(viewport, rng);
        let vel = profile.launch.sample(rng);
        let rotation = profile.rotation.sample(rng);
        let rotation_speed = profile.rotation_speed.sample(rng);
        let scale = profile.scale.sample(rng);
        let color_index = rng.index(profile.palette.len());
        let lifespan = profile.lifespan.sample(rng);
        let mut particle = Particle::spawn(
            pos,
            vel,
            rotation,
            rotation_speed,
            scale,
            profile.palette[color_index],
            color_index as u32,
            lifespan,
        );
        if profile.visual == VisualRule::Twinkle {
            twinkle(&mut particle);
        }
        particles.push(particle);
    }
    particles
}

/// Advances every particle by `dt` seconds, then drops the ones whose age reached
/// their lifespan. Non-finite or negative `dt` leaves the set untouched.
pub fn advance(particles: &mut Vec<Particle>, dt: f32, profile: &EmitterProfile, physics: &Physics) {
    if !(dt.is_finite() && dt >= 0.0) {
        return;
    }
    for p in particles.iter_mut() {
        p.grow_older(dt);
        p.pos += p.vel * dt;
        p.rotation += p.rotation_speed * dt;

        if profile.forces.gravity {
            p.vel.y += physics.gravity * dt;
        }
        if profile.forces.air_friction {
            p.vel.x *= physics.air_friction;
        }

        match profile.visual {
            VisualRule::FadeOut => fade(p, physics.fade_start),
            VisualRule::Twinkle => twinkle(p),
        }
    }
    particles.retain(Particle::is_alive);
}

fn fade(p: &mut Particle, fade_start: f32) {
    let ratio = p.life_ratio();
    if ratio > fade_start {
        let tail = 1.0 - fade_start;
        p.opacity = (1.0 - (ratio - fade_start) / tail).clamp(0.0, 1.0);
    }
}

fn twinkle(p: &mut Particle) {
    let age = p.age();
    p.opacity = 0.3 + 0.7 * (age * 4.0).sin().abs();
    p.scale = 0.3 + 0.5 * (age * 3.0).cos().abs();
}

/// Owns the live particles of one effect instance.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    profile: &'static EmitterProfile,
    physics: Physics,
    particles: Vec<Particle>,
    ticks: u64,
}

impl SimulationEngine {
    pub fn new(
        kind: EffectKind,
        intensity: Intensity,
        viewport: Viewport,
        physics: Physics,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let profile = kind.profile();
        Self {
            profile,
            physics,
            particles: spawn(profile, intensity, viewport, rng),
            ticks: 0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        advance(&mut self.particles, dt, self.profile, &self.physics);
        self.ticks += 1;
    }

    /// State as of the most recent `advance`.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn kind(&self) -> EffectKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &'static EmitterProfile {
        self.profile
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
