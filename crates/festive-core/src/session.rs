//! Lifecycle of one celebration: start, run for the intensity's duration, fade out, clear.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::FixedStepClock;
use crate::config::{EffectsConfig, Physics, SessionConfig};
use crate::engine::SimulationEngine;
use crate::error::{EffectError, Result};
use crate::particle::{ParticleDescriptor, Viewport};
use crate::random::RandomSource;
use crate::selector::EffectChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Running,
    StoppingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Deadline,
    Cancelled,
}

#[derive(Debug)]
struct ActiveEffect {
    choice: EffectChoice,
    engine: SimulationEngine,
    elapsed: f32,
    duration: f32,
    stopping: Option<ExitFade>,
}

#[derive(Debug, Clone, Copy)]
struct ExitFade {
    reason: StopReason,
    elapsed: f32,
}

enum TickOutcome {
    Continue,
    DeadlineReached { overshoot: f32 },
    FadeFinished,
}

/// f32 sums of 1/60 s steps fall slightly short of whole seconds.
const TIMER_SLACK_SECONDS: f32 = 5e-4;

fn timer_done(elapsed: f32, limit: f32) -> bool {
    elapsed + TIMER_SLACK_SECONDS >= limit
}

/// Drives at most one effect at a time. The host calls `tick` (variable step) or
/// `update` (fixed step via the frame clock) and reads `current_particles` to draw.
pub struct EffectSession<R = StdRng> {
    config: SessionConfig,
    physics: Physics,
    rng: R,
    clock: FixedStepClock,
    active: Option<ActiveEffect>,
    snapshot: Vec<ParticleDescriptor>,
}

impl EffectSession<StdRng> {
    /// Seeded from `config.seed` when present, otherwise from OS entropy.
    pub fn from_config(config: &EffectsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl Default for EffectSession<StdRng> {
    fn default() -> Self {
        Self::from_config(&EffectsConfig::default())
    }
}

impl<R: RandomSource> EffectSession<R> {
    pub fn with_rng(config: &EffectsConfig, rng: R) -> Self {
        let session = config.session;
        Self {
            config: session,
            physics: config.physics,
            rng,
            clock: FixedStepClock::new(session.fixed_dt(), session.max_steps_per_frame),
            active: None,
            snapshot: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.active {
            None => SessionState::Idle,
            Some(active) if active.stopping.is_some() => SessionState::StoppingOut,
            Some(_) => SessionState::Running,
        }
    }

    pub fn choice(&self) -> Option<EffectChoice> {
        self.active.as_ref().map(|a| a.choice)
    }

    /// Seconds spent running, not counting the exit fade.
    pub fn elapsed(&self) -> f32 {
        self.active.as_ref().map_or(0.0, |a| a.elapsed)
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.active.as_ref().and_then(|a| a.stopping).map(|s| s.reason)
    }

    /// Starts a new effect.
    ///
    /// Only `Running` rejects with `AlreadyRunning`. Starting while `StoppingOut` is
    /// allowed: the fading effect is dropped without finishing its exit fade and the
    /// new one starts at once, so a cancel followed by a start never has to wait.
    pub fn start(&mut self, choice: EffectChoice, viewport: Viewport) -> Result<()> {
        let state = self.state();
        if state == SessionState::Running {
            warn!(requested = %choice.kind, "start rejected: effect already running");
            return Err(EffectError::AlreadyRunning {
                requested: choice.kind,
                state,
            });
        }
        let viewport = viewport.validate()?;
        if state == SessionState::StoppingOut {
            self.teardown();
        }

        let engine = SimulationEngine::new(
            choice.kind,
            choice.intensity,
            viewport,
            self.physics,
            &mut self.rng,
        );
        let duration = choice.intensity.duration_seconds();
        info!(
            kind = %choice.kind,
            intensity = ?choice.intensity,
            particles = engine.len(),
            duration,
            "effect started"
        );
        self.clock.reset();
        self.active = Some(ActiveEffect {
            choice,
            engine,
            elapsed: 0.0,
            duration,
            stopping: None,
        });
        self.refresh_snapshot();
        Ok(())
    }

    /// Begins the exit fade. No-op when idle or already stopping.
    pub fn cancel(&mut self) {
        match self.state() {
            SessionState::Running => self.begin_exit(StopReason::Cancelled),
            SessionState::StoppingOut => debug!("cancel ignored: already stopping"),
            SessionState::Idle => {}
        }
    }

    /// Drops the current effect without an exit fade.
    pub fn abort(&mut self) {
        if self.active.is_some() {
            self.teardown();
        }
    }

    /// One simulation step of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.engine.advance(dt);
        self.charge_time(dt);
    }

    /// Runs as many fixed ticks as the frame clock owes for `frame_dt`. Returns the
    /// number of ticks run. Backlog the clock drops still counts toward the deadline
    /// and the exit fade, it only skips the particle steps.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        if self.active.is_none() {
            return 0;
        }
        let steps = self.clock.consume_steps(frame_dt);
        let dropped = self.clock.dropped_seconds();
        let dt = self.clock.fixed_dt_seconds;
        let mut ran = 0;
        for _ in 0..steps {
            if self.active.is_none() {
                break;
            }
            self.tick(dt);
            ran += 1;
        }
        if dropped > 0.0 {
            self.charge_time(dropped);
        }
        ran
    }

    /// Renderer view of the state after the most recent tick.
    pub fn current_particles(&self) -> &[ParticleDescriptor] {
        &self.snapshot
    }

    /// Moves the deadline or exit-fade timer forward and applies the transition it
    /// triggers. Time past the deadline carries over into the fade.
    fn charge_time(&mut self, seconds: f32) {
        let exit_fade = self.config.exit_fade_seconds;
        let outcome = match self.active.as_mut() {
            None => return,
            Some(active) => match active.stopping.as_mut() {
                None => {
                    active.elapsed += seconds;
                    if timer_done(active.elapsed, active.duration) {
                        TickOutcome::DeadlineReached {
                            overshoot: (active.elapsed - active.duration).max(0.0),
                        }
                    } else {
                        TickOutcome::Continue
                    }
                }
                Some(fade) => {
                    fade.elapsed += seconds;
                    if timer_done(fade.elapsed, exit_fade) {
                        TickOutcome::FadeFinished
                    } else {
                        TickOutcome::Continue
                    }
                }
            },
        };
        match outcome {
            TickOutcome::Continue => self.refresh_snapshot(),
            TickOutcome::DeadlineReached { overshoot } => {
                self.begin_exit(StopReason::Deadline);
                if overshoot > 0.0 && self.active.is_some() {
                    self.charge_time(overshoot);
                }
            }
            TickOutcome::FadeFinished => self.teardown(),
        }
    }

    fn begin_exit(&mut self, reason: StopReason) {
        let exit_fade = self.config.exit_fade_seconds;
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.stopping.is_some() {
            return;
        }
        info!(
            kind = %active.choice.kind,
            ?reason,
            elapsed = active.elapsed,
            "effect stopping"
        );
        active.stopping = Some(ExitFade { reason, elapsed: 0.0 });
        if exit_fade <= 0.0 {
            self.teardown();
        } else {
            self.refresh_snapshot();
        }
    }

    fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(
                kind = %active.choice.kind,
                discarded = active.engine.len(),
                ticks = active.engine.ticks(),
                "effect cleared"
            );
        }
        self.snapshot.clear();
        self.clock.reset();
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot.clear();
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let fade = match active.stopping {
            Some(exit) if self.config.exit_fade_seconds > 0.0 => {
                (1.0 - exit.elapsed / self.config.exit_fade_seconds).clamp(0.0, 1.0)
            }
            _ => 1.0,
        };
        let kind = active.engine.kind();
        self.snapshot.extend(active.engine.particles().iter().map(|p| {
            let mut d = p.descriptor(kind);
            d.opacity *= fade;
            d
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{EffectKind, Intensity};

    fn session() -> EffectSession<StdRng> {
        let config = EffectsConfig {
            seed: Some(17),
            ..EffectsConfig::default()
        };
        EffectSession::from_config(&config)
    }

    fn confetti() -> EffectChoice {
        EffectChoice::new(EffectKind::Confetti, Intensity::Medium)
    }

    fn viewport() -> Viewport {
        Viewport::new(390.0, 844.0)
    }

    #[test]
    fn starts_idle_with_no_particles() {
        let s = session();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current_particles().is_empty());
    }

    #[test]
    fn start_spawns_snapshot_immediately() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.current_particles().len(), 25);
        assert!(s.current_particles().iter().all(|d| d.kind == EffectKind::Confetti.tag()));
    }

    #[test]
    fn invalid_viewport_leaves_session_idle() {
        let mut s = session();
        let err = s.start(confetti(), Viewport::new(f32::INFINITY, 10.0)).unwrap_err();
        assert!(matches!(err, EffectError::InvalidViewport { .. }));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = session();
        s.cancel();
        assert_eq!(s.state(), SessionState::Idle);
        s.start(confetti(), viewport()).unwrap();
        s.cancel();
        s.cancel();
        assert_eq!(s.state(), SessionState::StoppingOut);
        assert_eq!(s.stop_reason(), Some(StopReason::Cancelled));
    }

    #[test]
    fn deadline_after_cancel_does_not_restart_the_fade() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        s.tick(3.9);
        s.cancel();
        s.tick(0.5);
        // past the 4s deadline, still in the cancel-triggered fade
        assert_eq!(s.stop_reason(), Some(StopReason::Cancelled));
        s.tick(0.6);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn exit_fade_scales_opacity() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        s.cancel();
        s.tick(0.5);
        for d in s.current_particles() {
            assert!(d.opacity <= 0.5 + 1e-5, "opacity {}", d.opacity);
        }
    }

    #[test]
    fn zero_exit_fade_clears_on_stop() {
        let mut config = EffectsConfig::default();
        config.session.exit_fade_seconds = 0.0;
        let mut s = EffectSession::with_rng(&config, StdRng::seed_from_u64(1));
        s.start(confetti(), viewport()).unwrap();
        s.cancel();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current_particles().is_empty());
    }

    #[test]
    fn update_runs_fixed_ticks() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        assert_eq!(s.update(0.06), 3);
        assert!((s.elapsed() - 3.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn deadline_fires_on_the_exact_tick() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        let mut ticks = 0;
        while s.state() == SessionState::Running {
            s.tick(1.0 / 60.0);
            ticks += 1;
        }
        assert_eq!(ticks, 240);

        let mut fade_ticks = 0;
        while s.state() == SessionState::StoppingOut {
            s.tick(1.0 / 60.0);
            fade_ticks += 1;
        }
        assert_eq!(fade_ticks, 60);
    }

    #[test]
    fn dropped_backlog_still_counts_toward_the_deadline() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        for _ in 0..3 {
            assert_eq!(s.update(1.0), 8);
        }
        assert_eq!(s.state(), SessionState::Running);
        assert!((s.elapsed() - 3.0).abs() < 1e-3, "elapsed {}", s.elapsed());
    }

    #[test]
    fn deadline_overshoot_carries_into_the_fade() {
        let mut s = session();
        s.start(EffectChoice::new(EffectKind::Golden, Intensity::Low), viewport())
            .unwrap();
        s.tick(3.5);
        assert_eq!(s.state(), SessionState::StoppingOut);
        for d in s.current_particles() {
            assert!(d.opacity <= 0.5 + 1e-5, "opacity {}", d.opacity);
        }
        s.tick(0.5);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn start_during_exit_fade_replaces_the_fading_effect() {
        let mut s = session();
        s.start(confetti(), viewport()).unwrap();
        s.cancel();
        s.tick(0.25);
        s.start(EffectChoice::new(EffectKind::Golden, Intensity::Low), viewport())
            .unwrap();
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.stop_reason(), None);
        assert_eq!(s.current_particles().len(), 10);
        assert!(s.current_particles().iter().all(|d| d.opacity == 1.0));
    }

    #[test]
    fn update_is_a_no_op_when_idle() {
        let mut s = session();
        assert_eq!(s.update(1.0), 0);
    }

    #[test]
    fn abort_discards_everything() {
        let mut s = session();
        s.start(EffectChoice::new(EffectKind::Stars, Intensity::High), viewport())
            .unwrap();
        s.abort();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current_particles().is_empty());
        assert_eq!(s.choice(), None);
    }
}
