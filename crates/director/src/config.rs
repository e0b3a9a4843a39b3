//! Tournament configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use swiss_core::{
    ByePolicy, PairingOptions, PairingSystem, Tiebreak, TiebreakOptions, DEFAULT_TIEBREAKS,
};

/// TOML-backed tournament settings: schedule length, pairing system,
/// tiebreak order and bye policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub rounds: u32,
    pub pairing_system: PairingSystem,
    pub tiebreaks: Vec<Tiebreak>,
    pub bye_policy: ByePolicy,
    pub median_cut: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            pairing_system: PairingSystem::default(),
            tiebreaks: DEFAULT_TIEBREAKS.to_vec(),
            bye_policy: ByePolicy::HalfPoint,
            median_cut: 1,
        }
    }
}

impl TournamentConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        toml::from_str(&contents).map_err(|e| format!("Failed to parse config: {}", e))
    }

    pub fn pairing_options(&self, starting_board: u32) -> PairingOptions {
        PairingOptions {
            system: self.pairing_system.clone(),
            starting_board,
            total_rounds: Some(self.rounds),
            bye_policy: self.bye_policy,
            ..PairingOptions::default()
        }
    }

    pub fn tiebreak_options(&self) -> TiebreakOptions {
        TiebreakOptions {
            median_cut: self.median_cut,
        }
    }
}
