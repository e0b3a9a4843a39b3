//! Per-invocation pairing context for one section and one round.

use crate::colors::ColorHistory;
use crate::error::PairingError;
use crate::rematch::RematchGuard;
use crate::standings::ScoreSummary;
use crate::types::{GameResult, Outcome, Pairing, Player, PlayerId};

/// One eligible player's view at pairing time.
#[derive(Clone, Debug)]
pub struct Entry {
    pub id: PlayerId,
    pub name: String,
    pub rating: u32,
    pub score: f64,
    pub games_played: u32,
    pub colors: ColorHistory,
    /// Whether the player already received an automatic (non-requested) bye.
    pub had_auto_bye: bool,
    /// Whether the player pre-registered a bye for this round.
    pub requested_bye: bool,
}

impl Entry {
    /// Score in half points, exact for bracket grouping.
    pub fn half_points(&self) -> u32 {
        (self.score * 2.0).round() as u32
    }
}

/// Snapshot the pairing passes operate on. Built fresh every call and
/// dropped when the call returns; never persisted.
#[derive(Clone, Debug)]
pub struct SectionRoundContext {
    pub section: String,
    pub round: u32,
    pub entries: Vec<Entry>,
    pub guard: RematchGuard,
}

impl SectionRoundContext {
    /// Build the context from the raw snapshot for one section.
    ///
    /// `players` must already be filtered to the section's eligible players;
    /// `prior_results` and `prior_pairings` may span the whole tournament.
    pub fn build(
        section: &str,
        round: u32,
        players: &[&Player],
        prior_results: &[GameResult],
        prior_pairings: &[Pairing],
    ) -> Result<Self, PairingError> {
        validate_history(players, prior_results)?;

        let section_pairings: Vec<Pairing> = prior_pairings
            .iter()
            .filter(|p| p.section == section && p.round < round)
            .cloned()
            .collect();
        let guard = RematchGuard::from_pairings(&section_pairings);

        let entries = players
            .iter()
            .map(|player| {
                let summary = ScoreSummary::for_player(player.id, prior_results);
                Entry {
                    id: player.id,
                    name: player.name.clone(),
                    rating: player.rating,
                    score: summary.points,
                    games_played: summary.games_played,
                    colors: ColorHistory::for_player(player.id, prior_results),
                    had_auto_bye: had_automatic_bye(player, prior_results),
                    requested_bye: player.requested_bye(round),
                }
            })
            .collect();

        Ok(Self {
            section: section.to_string(),
            round,
            entries,
            guard,
        })
    }
}

/// A bye result in a round the player never asked one for.
pub(crate) fn had_automatic_bye(player: &Player, results: &[GameResult]) -> bool {
    results.iter().any(|r| {
        r.player == player.id
            && matches!(r.outcome, Outcome::ByeHalf | Outcome::ByeFull)
            && !player.requested_bye(r.round)
    })
}

/// Reject contradictory history: two results for one player in one round.
pub fn validate_history(
    players: &[&Player],
    results: &[GameResult],
) -> Result<(), PairingError> {
    use std::collections::HashSet;

    let ids: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
    let mut seen = HashSet::new();
    for result in results.iter().filter(|r| ids.contains(&r.player)) {
        if !seen.insert((result.player, result.round)) {
            return Err(PairingError::DuplicateResult {
                player: result.player,
                round: result.round,
            });
        }
    }
    Ok(())
}
