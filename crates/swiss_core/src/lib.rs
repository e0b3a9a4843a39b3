//! Swiss-system pairing and tiebreak engine.
//!
//! This crate provides the tournament math and nothing else:
//! - Round pairing generation (Swiss, round-robin, quads, team Swiss)
//! - Bye assignment and color allocation
//! - Multi-criteria tiebreak computation and standings ranking
//!
//! The engine is a pure computation over a snapshot of tournament state.
//! All history (players, results, prior pairings) arrives as input; the
//! only output is a fresh pairing list or standings table. There is no
//! I/O, no persistence and no randomness: identical inputs always produce
//! identical output, so the caller may safely invoke it concurrently for
//! different sections or tournaments.
//!
//! Constraints the engine had to relax (an accepted rematch, a color
//! imbalance) are never silent; they come back in the violations list for
//! the tournament director to review.

mod bye;
mod colors;
mod context;
mod engine;
mod error;
mod options;
mod rematch;
mod standings;
mod tiebreak;
mod types;
mod variants;

pub use colors::ColorHistory;
pub use context::{Entry, SectionRoundContext};
pub use error::PairingError;
pub use options::*;
pub use rematch::RematchGuard;
pub use standings::ScoreSummary;
pub use tiebreak::{TiebreakCalculator, TiebreakSet};
pub use types::*;
pub use variants::QUAD_ROUNDS;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generate one round of pairings for every section in the snapshot.
///
/// Sections pair completely independently, in name order. Board numbers
/// start at `options.starting_board` and continue across sections. The
/// returned violations list enumerates every constraint the engine had to
/// relax; an empty list means the round paired cleanly.
pub fn generate_pairings(
    players: &[Player],
    prior_results: &[GameResult],
    prior_pairings: &[Pairing],
    round: u32,
    options: &PairingOptions,
) -> Result<RoundPairings, PairingError> {
    if round == 0 {
        return Err(PairingError::InvalidRound { round });
    }
    if let Some(total) = options.total_rounds {
        if round > total {
            return Err(PairingError::InvalidRound { round });
        }
    }
    if matches!(options.system, PairingSystem::Quad) && round > QUAD_ROUNDS {
        return Err(PairingError::InvalidRound { round });
    }

    let mut sections: BTreeMap<&str, Vec<&Player>> = BTreeMap::new();
    for player in players.iter().filter(|p| p.is_eligible()) {
        sections.entry(&player.section).or_default().push(player);
    }

    let mut pairings = Vec::new();
    let mut violations = Vec::new();
    let mut next_board = options.starting_board;

    for (section, members) in &sections {
        if members.len() < 2 {
            return Err(PairingError::InsufficientPlayers {
                section: section.to_string(),
                count: members.len(),
            });
        }
        debug!(section, round, players = members.len(), "pairing section");

        let (mut section_pairings, mut section_violations) = match &options.system {
            PairingSystem::Swiss {
                allow_relaxed_rematch,
            } => {
                let ctx = SectionRoundContext::build(
                    section,
                    round,
                    members,
                    prior_results,
                    prior_pairings,
                )?;
                engine::pair_section(&ctx, options, *allow_relaxed_rematch, &mut next_board)
            }
            PairingSystem::RoundRobin => {
                let ctx = SectionRoundContext::build(
                    section,
                    round,
                    members,
                    prior_results,
                    prior_pairings,
                )?;
                variants::round_robin_section(&ctx, options, &mut next_board)?
            }
            PairingSystem::Quad => variants::quad_section(
                section,
                round,
                members,
                prior_results,
                prior_pairings,
                options,
                &mut next_board,
            )?,
            PairingSystem::TeamSwiss { boards_per_team } => variants::team_swiss_section(
                section,
                round,
                members,
                prior_results,
                prior_pairings,
                *boards_per_team,
                options,
                &mut next_board,
            )?,
        };
        pairings.append(&mut section_pairings);
        violations.append(&mut section_violations);
    }

    // Inactive players keep a zero-point placeholder on the wall chart;
    // withdrawn players get nothing.
    let mut inactive: Vec<&Player> = players
        .iter()
        .filter(|p| p.status == PlayerStatus::Inactive)
        .collect();
    inactive.sort_by(|a, b| (&a.section, a.id).cmp(&(&b.section, b.id)));
    for player in inactive {
        let board = next_board;
        next_board += 1;
        pairings.push(Pairing::bye(
            round,
            &player.section,
            board,
            player.id,
            ByeType::Inactive,
        ));
    }

    Ok(RoundPairings {
        round,
        pairings,
        violations,
    })
}

/// One line of a ranked standings table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    /// 1-based rank within the player's section.
    pub rank: u32,
    pub player: PlayerId,
    pub name: String,
    pub section: String,
    pub rating: u32,
    pub points: f64,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub tiebreaks: TiebreakSet,
}

/// Rank every player by points, then by the configured tiebreak criteria in
/// order, descending. Sections rank independently; rows come back grouped
/// by section name. Pure and deterministic for a given snapshot.
pub fn compute_standings(
    players: &[Player],
    results: &[GameResult],
    tiebreak_order: &[Tiebreak],
    options: TiebreakOptions,
) -> Result<Vec<StandingsRow>, PairingError> {
    let refs: Vec<&Player> = players.iter().collect();
    context::validate_history(&refs, results)?;

    let calculator = TiebreakCalculator::new(players, results, options);
    let mut rows: Vec<StandingsRow> = players
        .iter()
        .map(|player| {
            let summary = ScoreSummary::for_player(player.id, results);
            StandingsRow {
                rank: 0,
                player: player.id,
                name: player.name.clone(),
                section: player.section.clone(),
                rating: player.rating,
                points: summary.points,
                games_played: summary.games_played,
                wins: summary.wins,
                losses: summary.losses,
                draws: summary.draws,
                tiebreaks: calculator.compute(player.id),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.section
            .cmp(&b.section)
            .then_with(|| b.points.total_cmp(&a.points))
            .then_with(|| {
                for &criterion in tiebreak_order {
                    let ord = b
                        .tiebreaks
                        .get(criterion)
                        .total_cmp(&a.tiebreaks.get(criterion));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            })
            .then_with(|| a.name.cmp(&b.name))
            .then(a.player.cmp(&b.player))
    });

    let mut rank = 0;
    let mut current_section: Option<String> = None;
    for row in &mut rows {
        if current_section.as_deref() != Some(row.section.as_str()) {
            rank = 0;
            current_section = Some(row.section.clone());
        }
        rank += 1;
        row.rank = rank;
    }

    Ok(rows)
}
