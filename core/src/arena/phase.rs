//! Arena phases
//!
//! The arena is a fixed sequence of stages. Each stage has its own hazard
//! layout and route, keyed by [`ArenaPhase`] in the [`MapRegistry`](super::MapRegistry).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaPhase {
    Stage1,
    Stage2,
    Stage3,
}

impl ArenaPhase {
    pub const ALL: [ArenaPhase; 3] = [ArenaPhase::Stage1, ArenaPhase::Stage2, ArenaPhase::Stage3];

    /// The last stage of a round; rewards after it end the round
    pub fn is_final(&self) -> bool {
        matches!(self, ArenaPhase::Stage3)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArenaPhase::Stage1 => "Stage 1",
            ArenaPhase::Stage2 => "Stage 2",
            ArenaPhase::Stage3 => "Stage 3",
        }
    }
}

impl fmt::Display for ArenaPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
