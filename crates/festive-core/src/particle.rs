//! Particle state and the renderer-facing descriptor built from it.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{EffectError, Result};
use crate::profile::EffectKind;

/// Size of the drawing area particles spawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Rejects sizes that would make spawn positions non-finite.
    pub fn validate(self) -> Result<Self> {
        let ok = |v: f32| v.is_finite() && v >= 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(self)
        } else {
            Err(EffectError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// One simulated element.
///
/// `age` only moves inside the engine's tick step and `lifespan` is fixed at spawn,
/// so both are read-only from outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per second.
    pub vel: Vec2,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub scale: f32,
    pub opacity: f32,
    pub color: Vec4,
    pub color_index: u32,
    age: f32,
    lifespan: f32,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        pos: Vec2,
        vel: Vec2,
        rotation: f32,
        rotation_speed: f32,
        scale: f32,
        color: Vec4,
        color_index: u32,
        lifespan: f32,
    ) -> Self {
        Self {
            pos,
            vel,
            rotation,
            rotation_speed,
            scale,
            opacity: 1.0,
            color,
            color_index,
            age: 0.0,
            lifespan,
        }
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn lifespan(&self) -> f32 {
        self.lifespan
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifespan
    }

    /// Fraction of life consumed; may exceed 1.0 on the tick a particle dies.
    pub fn life_ratio(&self) -> f32 {
        if self.lifespan <= 0.0 {
            1.0
        } else {
            self.age / self.lifespan
        }
    }

    pub(crate) fn grow_older(&mut self, dt: f32) {
        self.age += dt;
    }

    pub fn descriptor(&self, kind: EffectKind) -> ParticleDescriptor {
        ParticleDescriptor {
            position: self.pos.to_array(),
            rotation: self.rotation,
            scale: self.scale,
            opacity: self.opacity,
            color: self.color.to_array(),
            color_index: self.color_index,
            kind: kind.tag(),
        }
    }
}

/// What a renderer needs to draw one particle. Plain-old-data so hosts can upload
/// a snapshot straight into a GPU instance buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize)]
pub struct ParticleDescriptor {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub color: [f32; 4],
    pub color_index: u32,
    /// `EffectKind::tag` of the emitting effect.
    pub kind: u32,
}

impl ParticleDescriptor {
    pub fn as_bytes(snapshot: &[ParticleDescriptor]) -> &[u8] {
        bytemuck::cast_slice(snapshot)
    }
}
