//! Per-kind emitter profiles: immutable data describing how each effect spawns and evolves.

use std::fmt;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::particle::Viewport;
use crate::random::RandomSource;

/// The closed set of celebration effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Golden,
    Confetti,
    Stars,
    Fireworks,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Golden,
        EffectKind::Confetti,
        EffectKind::Stars,
        EffectKind::Fireworks,
    ];

    /// Stable numeric tag handed to renderers.
    pub fn tag(self) -> u32 {
        match self {
            EffectKind::Golden => 0,
            EffectKind::Confetti => 1,
            EffectKind::Stars => 2,
            EffectKind::Fireworks => 3,
        }
    }

    pub fn profile(self) -> &'static EmitterProfile {
        &PROFILES[self.tag() as usize]
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::Golden => "golden",
            EffectKind::Confetti => "confetti",
            EffectKind::Stars => "stars",
            EffectKind::Fireworks => "fireworks",
        };
        f.write_str(name)
    }
}

/// How strongly an effect plays: particle count and session length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn particle_count(self) -> usize {
        match self {
            Intensity::Low => 10,
            Intensity::Medium => 25,
            Intensity::High => 60,
        }
    }

    /// Total running time of a session before the exit fade starts.
    pub fn duration_seconds(self) -> f32 {
        match self {
            Intensity::Low => 3.0,
            Intensity::Medium => 4.0,
            Intensity::High => 5.0,
        }
    }
}

/// Closed interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    pub fn sample(self, rng: &mut dyn RandomSource) -> f32 {
        rng.range(self.min, self.max)
    }

    pub fn contains(self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Where particles appear, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRegion {
    /// Random x across the width, fixed y (negative is above the top edge).
    TopEdge { y: f32 },
    /// A single point given as fractions of width and height.
    Anchor { x_frac: f32, y_frac: f32 },
    /// Uniform scatter over the whole viewport.
    Scatter,
}

impl SpawnRegion {
    pub fn sample(self, viewport: Viewport, rng: &mut dyn RandomSource) -> Vec2 {
        match self {
            SpawnRegion::TopEdge { y } => Vec2::new(rng.range(0.0, viewport.width), y),
            SpawnRegion::Anchor { x_frac, y_frac } => {
                Vec2::new(viewport.width * x_frac, viewport.height * y_frac)
            }
            SpawnRegion::Scatter => Vec2::new(
                rng.range(0.0, viewport.width),
                rng.range(0.0, viewport.height),
            ),
        }
    }
}

/// Initial velocity distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Launch {
    /// Independent uniform range per axis.
    Box { dx: Span, dy: Span },
    /// Uniform angle in [0, 2π) and uniform speed.
    Radial { speed: Span },
    Still,
}

impl Launch {
    pub fn sample(self, rng: &mut dyn RandomSource) -> Vec2 {
        match self {
            Launch::Box { dx, dy } => Vec2::new(dx.sample(rng), dy.sample(rng)),
            Launch::Radial { speed } => {
                let angle = rng.range(0.0, std::f32::consts::TAU);
                let speed = speed.sample(rng);
                Vec2::new(angle.cos(), angle.sin()) * speed
            }
            Launch::Still => Vec2::ZERO,
        }
    }
}

/// Continuous forces applied every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceModel {
    pub gravity: bool,
    pub air_friction: bool,
}

impl ForceModel {
    pub const PHYSICAL: ForceModel = ForceModel { gravity: true, air_friction: true };
    pub const NONE: ForceModel = ForceModel { gravity: false, air_friction: false };
}

/// How opacity and scale evolve with age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualRule {
    /// Full opacity, then linear fade to zero over the tail of life.
    FadeOut,
    /// Opacity and scale oscillate with age; no fade.
    Twinkle,
}

/// Immutable spawn and evolution rules for one effect kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterProfile {
    pub kind: EffectKind,
    pub spawn: SpawnRegion,
    pub launch: Launch,
    pub forces: ForceModel,
    pub visual: VisualRule,
    pub lifespan: Span,
    pub scale: Span,
    /// Initial rotation in degrees.
    pub rotation: Span,
    /// Degrees per second.
    pub rotation_speed: Span,
    pub palette: &'static [Vec4],
}

impl EmitterProfile {
    pub fn particle_count(&self, intensity: Intensity) -> usize {
        intensity.particle_count()
    }
}

macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        Vec4::new($r as f32 / 255.0, $g as f32 / 255.0, $b as f32 / 255.0, 1.0)
    };
}

const GOLDEN_PALETTE: [Vec4; 3] = [rgb!(255, 215, 0), rgb!(255, 165, 0), rgb!(255, 193, 37)];

const CONFETTI_PALETTE: [Vec4; 6] = [
    rgb!(255, 59, 48),
    rgb!(0, 122, 255),
    rgb!(52, 199, 89),
    rgb!(255, 204, 0),
    rgb!(175, 82, 222),
    rgb!(255, 149, 0),
];

const STARS_PALETTE: [Vec4; 3] = [rgb!(255, 255, 255), rgb!(255, 236, 139), rgb!(0, 255, 255)];

const FIREWORKS_PALETTE: [Vec4; 6] = [
    rgb!(255, 45, 85),
    rgb!(90, 200, 250),
    rgb!(76, 217, 100),
    rgb!(255, 214, 10),
    rgb!(191, 90, 242),
    rgb!(255, 255, 255),
];

/// Indexed by `EffectKind::tag`.
static PROFILES: [EmitterProfile; 4] = [
    EmitterProfile {
        kind: EffectKind::Golden,
        spawn: SpawnRegion::TopEdge { y: -20.0 },
        launch: Launch::Box {
            dx: Span::new(-30.0, 30.0),
            dy: Span::new(50.0, 120.0),
        },
        forces: ForceModel::PHYSICAL,
        visual: VisualRule::FadeOut,
        lifespan: Span::new(3.0, 5.0),
        scale: Span::new(0.5, 1.0),
        rotation: Span::new(0.0, 360.0),
        rotation_speed: Span::new(-180.0, 180.0),
        palette: &GOLDEN_PALETTE,
    },
    EmitterProfile {
        kind: EffectKind::Confetti,
        spawn: SpawnRegion::Anchor { x_frac: 0.5, y_frac: 0.3 },
        launch: Launch::Box {
            dx: Span::new(-150.0, 150.0),
            dy: Span::new(-100.0, 50.0),
        },
        forces: ForceModel::PHYSICAL,
        visual: VisualRule::FadeOut,
        lifespan: Span::new(2.0, 4.0),
        scale: Span::new(0.6, 1.2),
        rotation: Span::new(0.0, 360.0),
        rotation_speed: Span::new(-360.0, 360.0),
        palette: &CONFETTI_PALETTE,
    },
    EmitterProfile {
        kind: EffectKind::Stars,
        spawn: SpawnRegion::Scatter,
        launch: Launch::Still,
        forces: ForceModel::NONE,
        visual: VisualRule::Twinkle,
        lifespan: Span::new(1.5, 3.0),
        // twinkle owns star scale from the first tick; 0.8 is what it yields at age 0
        scale: Span::fixed(0.8),
        rotation: Span::new(0.0, 360.0),
        rotation_speed: Span::new(-90.0, 90.0),
        palette: &STARS_PALETTE,
    },
    EmitterProfile {
        kind: EffectKind::Fireworks,
        spawn: SpawnRegion::Anchor { x_frac: 0.5, y_frac: 0.4 },
        launch: Launch::Radial { speed: Span::new(100.0, 200.0) },
        forces: ForceModel::NONE,
        visual: VisualRule::FadeOut,
        lifespan: Span::new(1.0, 2.5),
        scale: Span::new(0.3, 0.7),
        rotation: Span::fixed(0.0),
        rotation_speed: Span::fixed(0.0),
        palette: &FIREWORKS_PALETTE,
    },
];
