//! Engine error taxonomy.
//!
//! Only genuinely unusable input is an error. "Cannot pair cleanly" is not:
//! the engine returns its best pairing plus a violation list instead.

use thiserror::Error;

use crate::types::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    /// A section needs at least two eligible players to pair.
    #[error("section '{section}' has {count} eligible player(s), need at least 2")]
    InsufficientPlayers { section: String, count: usize },

    /// Round is zero or past the configured schedule.
    #[error("round {round} is not a pairable round")]
    InvalidRound { round: u32 },

    /// Contradictory history: a player credited with two results in one round.
    #[error("player {player} has more than one result in round {round}")]
    DuplicateResult { player: PlayerId, round: u32 },
}
