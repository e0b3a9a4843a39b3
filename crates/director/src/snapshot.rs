//! Tournament snapshot loading.
//!
//! A snapshot is one JSON document with the full read-only state the engine
//! needs: players, completed results and prior pairings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use swiss_core::{GameResult, Pairing, Player};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    #[serde(default)]
    pub results: Vec<GameResult>,
    #[serde(default)]
    pub pairings: Vec<Pairing>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse snapshot: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_snapshot_parses() {
        let json = r#"{
            "players": [
                {"id": 1, "name": "Alice", "rating": 1800,
                 "section": "Open", "status": "active"}
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.players.len(), 1);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.pairings.is_empty());
    }
}
