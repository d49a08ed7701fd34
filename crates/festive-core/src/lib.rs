//! Festive core engine: host-agnostic particle simulation for score celebrations.
//!
//! A finished round goes through [`select_effect`], the resulting [`EffectChoice`] is
//! started on an [`EffectSession`], and the host ticks the session and draws
//! [`EffectSession::current_particles`] every frame.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod particle;
pub mod profile;
pub mod random;
pub mod selector;
pub mod session;

pub use clock::FixedStepClock;
pub use config::{EffectsConfig, Physics, SessionConfig};
pub use engine::SimulationEngine;
pub use error::{EffectError, Result};
pub use particle::{Particle, ParticleDescriptor, Viewport};
pub use profile::{EffectKind, EmitterProfile, Intensity};
pub use random::{FixedSequence, RandomSource};
pub use selector::{select_effect, EffectChoice, GameOutcome};
pub use session::{EffectSession, SessionState, StopReason};
