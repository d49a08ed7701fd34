//! Host abstraction traits so `festive-core` stays independent of any rendering or
//! windowing technology.

use festive_core::{GameOutcome, ParticleDescriptor, Viewport};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Drawable area reported by the host, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub width: u32,
    pub height: u32,
}

impl SurfaceRect {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}

/// Draws whatever snapshot the session produced for the current frame.
pub trait ParticleRenderer {
    fn init(&mut self, _surface: SurfaceRect) -> Result<()> { Ok(()) }
    fn draw(&mut self, particles: &[ParticleDescriptor]) -> Result<()>;
}

/// Host frame cadence. Yields the elapsed seconds since the previous frame, or
/// `None` once the host stops delivering frames.
pub trait TickSource {
    fn next_frame(&mut self) -> Option<f32>;
}

/// Game-side event source deciding when a celebration may be due.
pub trait OutcomeSource {
    fn poll(&mut self) -> Option<GameOutcome>;
}

/// Replays a fixed list of outcomes, one per poll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOutcomes {
    pending: std::collections::VecDeque<GameOutcome>,
}

impl ScriptedOutcomes {
    pub fn new(outcomes: impl IntoIterator<Item = GameOutcome>) -> Self {
        Self {
            pending: outcomes.into_iter().collect(),
        }
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn poll(&mut self) -> Option<GameOutcome> {
        let next = self.pending.pop_front();
        if let Some(outcome) = next {
            tracing::debug!(score = outcome.score, record = outcome.is_new_record, "outcome polled");
        }
        next
    }
}
