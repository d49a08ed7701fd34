//! Maps a finished round to the celebration it deserves.

use serde::{Deserialize, Serialize};

use crate::profile::{EffectKind, Intensity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectChoice {
    pub kind: EffectKind,
    pub intensity: Intensity,
}

impl EffectChoice {
    pub const fn new(kind: EffectKind, intensity: Intensity) -> Self {
        Self { kind, intensity }
    }
}

/// Result of a round as reported by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub score: i64,
    pub is_new_record: bool,
}

impl GameOutcome {
    pub fn select(self) -> Option<EffectChoice> {
        select_effect(self.score, self.is_new_record)
    }
}

/// `None` means no celebration: the caller should not start a session.
pub fn select_effect(score: i64, is_new_record: bool) -> Option<EffectChoice> {
    if is_new_record {
        return Some(EffectChoice::new(EffectKind::Fireworks, Intensity::High));
    }
    match score {
        36.. => Some(EffectChoice::new(EffectKind::Fireworks, Intensity::High)),
        20..=35 => Some(EffectChoice::new(EffectKind::Confetti, Intensity::Medium)),
        15..=19 => Some(EffectChoice::new(EffectKind::Golden, Intensity::Low)),
        _ => None,
    }
}
