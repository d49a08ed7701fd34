//! Glue between the game's outcome stream, the frame source and the renderer.

use tracing::{info, warn};

use festive_core::{EffectSession, RandomSource, SessionState};
use festive_platform::{OutcomeSource, ParticleRenderer, Result, SurfaceRect, TickSource};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub effects_played: u32,
    pub outcomes_skipped: u32,
    pub frames: u64,
    pub peak_particles: usize,
}

/// Plays one celebration per outcome until the outcome source or the frame source
/// runs dry. A failed start degrades to no effect for that outcome.
pub fn run_outcomes<R: RandomSource>(
    session: &mut EffectSession<R>,
    outcomes: &mut dyn OutcomeSource,
    ticker: &mut dyn TickSource,
    renderer: &mut dyn ParticleRenderer,
    surface: SurfaceRect,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    renderer.init(surface)?;

    while let Some(outcome) = outcomes.poll() {
        let Some(choice) = outcome.select() else {
            info!(score = outcome.score, "no celebration for this score");
            summary.outcomes_skipped += 1;
            continue;
        };
        if let Err(e) = session.start(choice, surface.viewport()) {
            warn!("effect not started: {e}");
            summary.outcomes_skipped += 1;
            continue;
        }
        summary.effects_played += 1;

        while session.state() != SessionState::Idle {
            let Some(frame_dt) = ticker.next_frame() else {
                warn!("frame source ended mid-effect; discarding particles");
                session.abort();
                renderer.draw(session.current_particles())?;
                return Ok(summary);
            };
            session.update(frame_dt);
            let particles = session.current_particles();
            summary.peak_particles = summary.peak_particles.max(particles.len());
            renderer.draw(particles)?;
            summary.frames += 1;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::HeadlessTicker;
    use festive_core::{EffectsConfig, GameOutcome, ParticleDescriptor};
    use festive_platform::ScriptedOutcomes;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<usize>,
    }

    impl ParticleRenderer for Recorder {
        fn draw(&mut self, particles: &[ParticleDescriptor]) -> Result<()> {
            self.frames.push(particles.len());
            Ok(())
        }
    }

    fn surface() -> SurfaceRect {
        SurfaceRect { width: 390, height: 844 }
    }

    fn session() -> EffectSession {
        EffectSession::from_config(&EffectsConfig { seed: Some(5), ..EffectsConfig::default() })
    }

    #[test]
    fn plays_each_qualifying_outcome_to_completion() {
        let mut session = session();
        let mut outcomes = ScriptedOutcomes::new([
            GameOutcome { score: 3, is_new_record: false },
            GameOutcome { score: 17, is_new_record: false },
            GameOutcome { score: 0, is_new_record: true },
        ]);
        let mut ticker = HeadlessTicker::new(1.0 / 60.0);
        let mut renderer = Recorder::default();

        let summary =
            run_outcomes(&mut session, &mut outcomes, &mut ticker, &mut renderer, surface()).unwrap();

        assert_eq!(summary.effects_played, 2);
        assert_eq!(summary.outcomes_skipped, 1);
        assert_eq!(summary.peak_particles, 60);
        assert_eq!(renderer.frames.last(), Some(&0));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn frame_source_ending_discards_the_effect() {
        let mut session = session();
        let mut outcomes = ScriptedOutcomes::new([GameOutcome { score: 25, is_new_record: false }]);
        let mut ticker = HeadlessTicker::limited(1.0 / 60.0, 10);
        let mut renderer = Recorder::default();

        let summary =
            run_outcomes(&mut session, &mut outcomes, &mut ticker, &mut renderer, surface()).unwrap();

        assert_eq!(summary.frames, 10);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(renderer.frames.last(), Some(&0));
    }
}
