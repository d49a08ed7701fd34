//! Tunables loaded once at startup. Profiles are not configurable; these knobs cover
//! the shared physics constants and session timing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EffectError, Result};

/// Constants used by the tick step for every kind that opts into them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Added to `vel.y` per second (screen space, y grows downward).
    pub gravity: f32,
    /// Multiplier applied to `vel.x` once per tick.
    pub air_friction: f32,
    /// Life ratio after which fading particles start losing opacity.
    pub fade_start: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 150.0,
            air_friction: 0.98,
            fade_start: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed tick rate used by `EffectSession::update`.
    pub tick_hz: f32,
    pub exit_fade_seconds: f32,
    /// Upper bound on ticks run for a single host frame.
    pub max_steps_per_frame: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            exit_fade_seconds: 1.0,
            max_steps_per_frame: 8,
        }
    }
}

impl SessionConfig {
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_hz
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub session: SessionConfig,
    pub physics: Physics,
    /// Seed for the production RNG; entropy when absent.
    pub seed: Option<u64>,
}

impl EffectsConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded effects config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.session;
        if !(s.tick_hz.is_finite() && s.tick_hz > 0.0) {
            return Err(invalid(format!("tick_hz must be positive, got {}", s.tick_hz)));
        }
        if !(s.exit_fade_seconds.is_finite() && s.exit_fade_seconds >= 0.0) {
            return Err(invalid(format!(
                "exit_fade_seconds must be non-negative, got {}",
                s.exit_fade_seconds
            )));
        }
        if s.max_steps_per_frame == 0 {
            return Err(invalid("max_steps_per_frame must be at least 1".into()));
        }
        let p = &self.physics;
        if !p.gravity.is_finite() {
            return Err(invalid(format!("gravity must be finite, got {}", p.gravity)));
        }
        if !(0.0..=1.0).contains(&p.air_friction) {
            return Err(invalid(format!(
                "air_friction must be within [0, 1], got {}",
                p.air_friction
            )));
        }
        if !(0.0..1.0).contains(&p.fade_start) {
            return Err(invalid(format!(
                "fade_start must be within [0, 1), got {}",
                p.fade_start
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> EffectError {
    EffectError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EffectsConfig::from_toml_str("").unwrap();
        assert_eq!(config, EffectsConfig::default());
        assert_eq!(config.session.tick_hz, 60.0);
        assert_eq!(config.physics.gravity, 150.0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EffectsConfig::from_toml_str(
            r#"
            seed = 42

            [session]
            exit_fade_seconds = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.session.exit_fade_seconds, 0.5);
        assert_eq!(config.session.tick_hz, 60.0);
        assert_eq!(config.physics.air_friction, 0.98);
    }

    #[test]
    fn rejects_zero_tick_rate() {
        let err = EffectsConfig::from_toml_str("[session]\ntick_hz = 0.0\n").unwrap_err();
        assert!(matches!(err, EffectError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_fade_start_of_one() {
        let err = EffectsConfig::from_toml_str("[physics]\nfade_start = 1.0\n").unwrap_err();
        assert!(matches!(err, EffectError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EffectsConfig::from_toml_str("[session\n").unwrap_err();
        assert!(matches!(err, EffectError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EffectsConfig::load("/nonexistent/festive.toml").unwrap_err();
        assert!(matches!(err, EffectError::Io(_)));
    }
}
