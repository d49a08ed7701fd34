use tracing::warn;

/// Turns variable host frame deltas into a whole number of fixed simulation ticks.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    pub fixed_dt_seconds: f32,
    max_steps: u32,
    accumulator_seconds: f32,
    dropped_seconds: f32,
}

impl FixedStepClock {
    pub fn new(fixed_dt_seconds: f32, max_steps: u32) -> Self {
        Self {
            fixed_dt_seconds,
            max_steps: max_steps.max(1),
            accumulator_seconds: 0.0,
            dropped_seconds: 0.0,
        }
    }

    /// Number of fixed ticks owed for this frame. When the backlog exceeds `max_steps`
    /// the remainder is dropped and reported rather than replayed.
    pub fn consume_steps(&mut self, frame_dt_seconds: f32) -> u32 {
        self.dropped_seconds = 0.0;
        if frame_dt_seconds.is_finite() {
            self.accumulator_seconds += frame_dt_seconds.max(0.0);
        }
        let mut steps = 0u32;
        while self.accumulator_seconds >= self.fixed_dt_seconds {
            self.accumulator_seconds -= self.fixed_dt_seconds;
            steps += 1;
            if steps >= self.max_steps {
                self.dropped_seconds = self.accumulator_seconds;
                if self.accumulator_seconds >= self.fixed_dt_seconds {
                    warn!(
                        dropped_seconds = self.accumulator_seconds,
                        max_steps = self.max_steps,
                        "frame clock behind; dropping backlog"
                    );
                }
                self.accumulator_seconds = 0.0;
                break;
            }
        }
        steps
    }

    /// Backlog the last `consume_steps` call discarded instead of turning into ticks.
    /// Wall-clock deadlines still have to account for it.
    pub fn dropped_seconds(&self) -> f32 {
        self.dropped_seconds
    }

    pub fn reset(&mut self) {
        self.accumulator_seconds = 0.0;
        self.dropped_seconds = 0.0;
    }
}
