use std::time::{Duration, Instant};

use festive_platform::TickSource;

/// Delivers fixed frames as fast as the caller asks; used for offline runs and tests.
pub struct HeadlessTicker {
    frame_dt: f32,
    remaining: Option<u64>,
}

impl HeadlessTicker {
    pub fn new(frame_dt: f32) -> Self {
        Self {
            frame_dt,
            remaining: None,
        }
    }

    /// Stops after `frames` frames.
    pub fn limited(frame_dt: f32, frames: u64) -> Self {
        Self {
            frame_dt,
            remaining: Some(frames),
        }
    }
}

impl TickSource for HeadlessTicker {
    fn next_frame(&mut self) -> Option<f32> {
        match self.remaining.as_mut() {
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(self.frame_dt)
            }
            None => Some(self.frame_dt),
        }
    }
}

/// Sleeps to pace frames at the target rate and reports measured wall-clock deltas.
pub struct RealtimeTicker {
    target: Duration,
    last: Option<Instant>,
}

impl RealtimeTicker {
    pub fn new(frame_dt: f32) -> Self {
        Self {
            target: Duration::from_secs_f32(frame_dt.max(0.001)),
            last: None,
        }
    }
}

impl TickSource for RealtimeTicker {
    fn next_frame(&mut self) -> Option<f32> {
        let now = Instant::now();
        let Some(last) = self.last else {
            self.last = Some(now);
            return Some(0.0);
        };
        let spent = now.duration_since(last);
        if spent < self.target {
            std::thread::sleep(self.target - spent);
        }
        let now = Instant::now();
        self.last = Some(now);
        Some(now.duration_since(last).as_secs_f32())
    }
}
