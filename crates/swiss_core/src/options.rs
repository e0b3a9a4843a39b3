//! Pairing and tiebreak configuration.
//!
//! Each pairing system is a closed variant carrying only the fields it
//! needs, so nonsensical option combinations cannot be expressed.

use serde::{Deserialize, Serialize};

use crate::types::ByeType;

/// Which matching scheme produces the round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PairingSystem {
    /// Score-bracket Swiss (FIDE-Dutch style folding).
    Swiss {
        /// Permit the relaxed retry pass that accepts a rematch rather than
        /// leave players unpaired.
        allow_relaxed_rematch: bool,
    },
    /// Fixed circle-method rotation over the whole section.
    RoundRobin,
    /// Rating-adjacent groups of four, each a 3-round round-robin.
    Quad,
    /// Swiss at the team level, expanded to one board per player slot.
    TeamSwiss { boards_per_team: usize },
}

impl Default for PairingSystem {
    fn default() -> Self {
        PairingSystem::Swiss {
            allow_relaxed_rematch: true,
        }
    }
}

/// Who gets white when color balances and last colors all tie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTieBreak {
    HigherRatedWhite,
    LowerRatedWhite,
}

/// Points awarded for an automatic bye.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByePolicy {
    HalfPoint,
    FullPoint,
}

impl ByePolicy {
    pub(crate) fn bye_type(self) -> ByeType {
        match self {
            ByePolicy::HalfPoint => ByeType::HalfPoint,
            ByePolicy::FullPoint => ByeType::FullPoint,
        }
    }
}

/// Options for one `generate_pairings` invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingOptions {
    pub system: PairingSystem,
    /// First board number to hand out (supports multi-batch numbering).
    pub starting_board: u32,
    /// Total scheduled rounds; rounds past this are rejected when set.
    pub total_rounds: Option<u32>,
    pub color_tie_break: ColorTieBreak,
    /// Points an ordinary automatic bye is worth.
    pub bye_policy: ByePolicy,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            system: PairingSystem::default(),
            starting_board: 1,
            total_rounds: None,
            color_tie_break: ColorTieBreak::HigherRatedWhite,
            bye_policy: ByePolicy::HalfPoint,
        }
    }
}

/// Tiebreak criteria the calculator can supply. The calculator imposes no
/// order; callers rank by whatever ordered subset they configure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreak {
    Cumulative,
    Buchholz,
    MedianBuchholz,
    SonnebornBerger,
    PerformanceRating,
    Rating,
}

/// Conventional default ranking order for Swiss events.
pub const DEFAULT_TIEBREAKS: &[Tiebreak] = &[
    Tiebreak::MedianBuchholz,
    Tiebreak::Buchholz,
    Tiebreak::SonnebornBerger,
    Tiebreak::Cumulative,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiebreakOptions {
    /// Opponent scores cut from each end for median Buchholz.
    pub median_cut: usize,
}

impl Default for TiebreakOptions {
    fn default() -> Self {
        Self { median_cut: 1 }
    }
}
