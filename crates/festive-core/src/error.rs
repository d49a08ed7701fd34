use thiserror::Error;

use crate::profile::EffectKind;
use crate::session::SessionState;

pub type Result<T> = std::result::Result<T, EffectError>;

#[derive(Error, Debug)]
pub enum EffectError {
    /// A session plays one effect at a time; the caller has to cancel first.
    #[error("cannot start {requested}: session is {state:?}")]
    AlreadyRunning {
        requested: EffectKind,
        state: SessionState,
    },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
