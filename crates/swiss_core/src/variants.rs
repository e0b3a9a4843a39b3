//! Round-robin, quad and team-Swiss generators.
//!
//! Each variant reduces to the same primitives the Swiss engine uses:
//! `SectionRoundContext`, bye selection, the pool matcher and the shared
//! finalizer. Only the matching granularity differs.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::bye::{select_bye, ByeSelection};
use crate::colors::ColorHistory;
use crate::context::{had_automatic_bye, validate_history, Entry, SectionRoundContext};
use crate::engine::{a_takes_white, finalize_round, pair_pool, MatchedPair, PoolMatching};
use crate::error::PairingError;
use crate::options::PairingOptions;
use crate::rematch::RematchGuard;
use crate::standings::ScoreSummary;
use crate::types::{ByeType, Color, GameResult, Pairing, Player, PlayerId, Violation};

/// A quad is a 3-round round-robin among four players.
pub const QUAD_ROUNDS: u32 = 3;

/// Fixed circle-method schedule over one section.
pub(crate) fn round_robin_section(
    ctx: &SectionRoundContext,
    opts: &PairingOptions,
    next_board: &mut u32,
) -> Result<(Vec<Pairing>, Vec<Violation>), PairingError> {
    let n = ctx.entries.len();
    let padded = if n % 2 == 0 { n } else { n + 1 };
    if ctx.round > (padded - 1) as u32 {
        return Err(PairingError::InvalidRound { round: ctx.round });
    }

    let (mut pairs, scheduled_bye) = rotation(ctx, ctx.round);

    // The rotation schedules who sits out, but bye selection still follows
    // the normal rules (requested byes, no repeat automatic byes). When they
    // disagree, the scheduled player takes the chosen player's seat so the
    // rest of the rotation is untouched.
    let bye = match scheduled_bye {
        None => None,
        Some(scheduled) => {
            let selection =
                select_bye(&ctx.entries, &ctx.guard, opts.bye_policy).unwrap_or(ByeSelection {
                    index: scheduled,
                    kind: opts.bye_policy.bye_type(),
                });
            if selection.index != scheduled {
                for pair in &mut pairs {
                    if pair.a == selection.index {
                        pair.a = scheduled;
                    } else if pair.b == selection.index {
                        pair.b = scheduled;
                    }
                }
            }
            Some(selection)
        }
    };

    let matching = PoolMatching {
        pairs,
        unpaired: Vec::new(),
    };
    Ok(finalize_round(ctx, matching, bye, opts, next_board))
}

/// Circle method: highest seed fixed, every other seat rotates by one per
/// round. Odd pools get a ghost seat; whoever draws the ghost sits out.
fn rotation(ctx: &SectionRoundContext, round: u32) -> (Vec<MatchedPair>, Option<usize>) {
    let entries = &ctx.entries;
    let n = entries.len();

    let mut seeds: Vec<usize> = (0..n).collect();
    seeds.sort_by(|&a, &b| {
        (Reverse(entries[a].rating), &entries[a].name, entries[a].id).cmp(&(
            Reverse(entries[b].rating),
            &entries[b].name,
            entries[b].id,
        ))
    });

    let ghost = n;
    let mut ring = seeds;
    if n % 2 != 0 {
        ring.push(ghost);
    }
    let m = ring.len();
    let shift = (round as usize - 1) % (m - 1);

    let mut seats = Vec::with_capacity(m);
    seats.push(ring[0]);
    for k in 0..m - 1 {
        seats.push(ring[1 + (k + shift) % (m - 1)]);
    }

    let mut pairs = Vec::new();
    let mut scheduled_bye = None;
    for i in 0..m / 2 {
        let (x, y) = (seats[i], seats[m - 1 - i]);
        if x == ghost {
            scheduled_bye = Some(y);
        } else if y == ghost {
            scheduled_bye = Some(x);
        } else {
            pairs.push(MatchedPair {
                a: x,
                b: y,
                rematch: None,
            });
        }
    }
    (pairs, scheduled_bye)
}

/// Partition a section into rating-adjacent groups of four and run each as
/// an independent 3-round round-robin. Groups act as disjoint virtual
/// sections for every other component (rematch history, byes, standings).
pub(crate) fn quad_section(
    section: &str,
    round: u32,
    players: &[&Player],
    prior_results: &[GameResult],
    prior_pairings: &[Pairing],
    opts: &PairingOptions,
    next_board: &mut u32,
) -> Result<(Vec<Pairing>, Vec<Violation>), PairingError> {
    let mut sorted: Vec<&Player> = players.to_vec();
    sorted.sort_by(|a, b| {
        (Reverse(a.rating), &a.name, a.id).cmp(&(Reverse(b.rating), &b.name, b.id))
    });

    let mut pairings = Vec::new();
    let mut violations = Vec::new();

    for (k, group) in sorted.chunks(4).enumerate() {
        let virtual_section = format!("{section}/Q{}", k + 1);
        debug!(section = %virtual_section, players = group.len(), "pairing quad group");

        if group.len() == 1 {
            // A stranded tail player has nobody at all: unpaired full point.
            let board = *next_board;
            *next_board += 1;
            pairings.push(Pairing::bye(
                round,
                &virtual_section,
                board,
                group[0].id,
                ByeType::FullPoint,
            ));
            continue;
        }

        // Short tail groups run a shorter rotation; rounds past it produce
        // nothing for that group.
        let padded = if group.len() % 2 == 0 {
            group.len()
        } else {
            group.len() + 1
        };
        if round > (padded - 1) as u32 {
            continue;
        }

        let ctx = SectionRoundContext::build(
            &virtual_section,
            round,
            group,
            prior_results,
            prior_pairings,
        )?;
        let (mut group_pairings, mut group_violations) =
            round_robin_section(&ctx, opts, next_board)?;
        pairings.append(&mut group_pairings);
        violations.append(&mut group_violations);
    }

    Ok((pairings, violations))
}

/// Swiss pairing at team granularity, expanded to one board per matched
/// player slot. Team score is the sum of member game points; team color
/// balance is the sum of member balances; team rematches come from the
/// members' prior board assignments.
pub(crate) fn team_swiss_section(
    section: &str,
    round: u32,
    players: &[&Player],
    prior_results: &[GameResult],
    prior_pairings: &[Pairing],
    boards_per_team: usize,
    opts: &PairingOptions,
    next_board: &mut u32,
) -> Result<(Vec<Pairing>, Vec<Violation>), PairingError> {
    validate_history(players, prior_results)?;

    let mut teams: BTreeMap<&str, Vec<&Player>> = BTreeMap::new();
    let mut teamless: Vec<PlayerId> = Vec::new();
    for player in players {
        match player.team.as_deref() {
            Some(team) => teams.entry(team).or_default().push(player),
            None => teamless.push(player.id),
        }
    }
    if teams.len() < 2 {
        return Err(PairingError::InsufficientPlayers {
            section: section.to_string(),
            count: teams.len(),
        });
    }
    for members in teams.values_mut() {
        members.sort_by_key(|p| (Reverse(p.rating), p.id));
    }

    let team_names: Vec<&str> = teams.keys().copied().collect();
    let team_of: HashMap<PlayerId, u32> = teams
        .iter()
        .enumerate()
        .flat_map(|(i, (_, members))| members.iter().map(move |p| (p.id, i as u32)))
        .collect();

    // Aggregate each team into one synthetic pairing entry.
    let entries: Vec<Entry> = team_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let members = &teams[name];
            let mut score = 0.0;
            let mut games = 0;
            let mut balance = 0;
            let mut had_auto_bye = false;
            for member in members.iter() {
                let summary = ScoreSummary::for_player(member.id, prior_results);
                score += summary.points;
                games += summary.games_played;
                balance += ColorHistory::for_player(member.id, prior_results).balance;
                had_auto_bye |= had_automatic_bye(member, prior_results);
            }
            Entry {
                id: i as u32,
                name: name.to_string(),
                rating: members.iter().map(|p| p.rating).sum::<u32>() / members.len() as u32,
                score,
                games_played: games,
                colors: ColorHistory {
                    balance,
                    last: None,
                },
                had_auto_bye,
                requested_bye: false,
            }
        })
        .collect();

    // Team-level rematch guard, derived from member games.
    let mut synthetic = Vec::new();
    for pairing in prior_pairings
        .iter()
        .filter(|p| p.section == section && p.round < round)
    {
        if let Some((white, black)) = pairing.players() {
            if let (Some(&tw), Some(&tb)) = (team_of.get(&white), team_of.get(&black)) {
                if tw != tb {
                    synthetic.push(Pairing::game(pairing.round, section, 0, tw, tb));
                }
            }
        }
    }
    let guard = RematchGuard::from_pairings(&synthetic);

    let mut pool: Vec<usize> = (0..entries.len()).collect();
    let bye = select_bye(&entries, &guard, opts.bye_policy);
    if let Some(selection) = bye {
        pool.retain(|&i| i != selection.index);
    }

    // Leaving a team unmatched benches every member, so relaxation is
    // always preferred here.
    let matching = pair_pool(&entries, &guard, pool, true);

    let mut team_pairs = matching.pairs;
    team_pairs.sort_by_key(|pair| {
        let (ea, eb) = (&entries[pair.a], &entries[pair.b]);
        (
            Reverse(ea.half_points().max(eb.half_points())),
            Reverse(ea.rating.max(eb.rating)),
            ea.id.min(eb.id),
        )
    });

    let mut pairings = Vec::new();
    let mut violations = Vec::new();

    // A player with no team cannot be seated on any board; the director has
    // to assign them before the round can include them.
    teamless.sort_unstable();
    for player in teamless {
        violations.push(Violation::Unpaired { player });
    }

    for pair in team_pairs {
        let (ea, eb) = (&entries[pair.a], &entries[pair.b]);
        let a_white = a_takes_white(ea, eb, opts.color_tie_break);
        let (white_team, black_team) = if a_white { (pair.a, pair.b) } else { (pair.b, pair.a) };
        let white_members = &teams[team_names[white_team]];
        let black_members = &teams[team_names[black_team]];

        let slots = boards_per_team
            .min(white_members.len())
            .min(black_members.len());

        if let Some(last_met) = pair.rematch {
            violations.push(Violation::AcceptedRematch {
                white: white_members[0].id,
                black: black_members[0].id,
                last_met,
            });
        }

        // Board colors alternate down the match: the team holding white
        // takes white on boards 1, 3, ... and black on the even boards.
        for slot in 0..slots {
            let (white_player, black_player) = if slot % 2 == 0 {
                (white_members[slot], black_members[slot])
            } else {
                (black_members[slot], white_members[slot])
            };
            for (player, color) in [(white_player, Color::White), (black_player, Color::Black)] {
                let after = ColorHistory::for_player(player.id, prior_results).after(color);
                if after.abs() > 2 {
                    violations.push(Violation::ColorImbalance {
                        player: player.id,
                        balance: after,
                    });
                }
            }
            let board = *next_board;
            *next_board += 1;
            pairings.push(Pairing::game(
                round,
                section,
                board,
                white_player.id,
                black_player.id,
            ));
        }
    }

    for idx in matching.unpaired {
        for member in teams[team_names[idx]].iter().take(boards_per_team) {
            violations.push(Violation::Unpaired { player: member.id });
        }
    }

    // A team bye becomes one bye board per fielded player.
    if let Some(selection) = bye {
        for member in teams[team_names[selection.index]]
            .iter()
            .take(boards_per_team)
        {
            let board = *next_board;
            *next_board += 1;
            pairings.push(Pairing::bye(round, section, board, member.id, selection.kind));
        }
    }

    Ok((pairings, violations))
}

#[cfg(test)]
#[path = "variants_tests.rs"]
mod variants_tests;
