//! Score accumulation over a player's completed-game history.

use crate::types::{GameResult, Outcome, PlayerId};

/// Cumulative score and game counts for one player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreSummary {
    pub points: f64,
    /// Games against a real opponent. Byes and unplayed rounds award points
    /// but do not count as played games.
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl ScoreSummary {
    /// Summarize a player's history. Results belonging to other players are
    /// ignored; absent history yields all zeros.
    pub fn for_player(player: PlayerId, results: &[GameResult]) -> Self {
        let mut summary = ScoreSummary::default();
        for result in results.iter().filter(|r| r.player == player) {
            summary.points += result.points();
            match result.outcome {
                Outcome::Win => {
                    summary.wins += 1;
                    summary.games_played += 1;
                }
                Outcome::Loss => {
                    summary.losses += 1;
                    summary.games_played += 1;
                }
                Outcome::Draw => {
                    summary.draws += 1;
                    summary.games_played += 1;
                }
                Outcome::ByeHalf | Outcome::ByeFull | Outcome::Unplayed => {}
            }
        }
        summary
    }
}
