//! Score-bracket Swiss pairing (FIDE-Dutch-style folding).
//!
//! Pairing for one pool runs as a bounded pass machine:
//! `Strict -> Relaxed -> Done`. The strict pass folds each score bracket
//! top-half against bottom-half and floats unpairable players down one
//! bracket at most once. The relaxed pass pairs whoever remains, accepting
//! the cheapest rematch (smallest score difference, then the pair that met
//! longest ago). Whatever still cannot be paired is reported, never dropped.

use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::bye::{select_bye, ByeSelection};
use crate::context::{Entry, SectionRoundContext};
use crate::options::{ColorTieBreak, PairingOptions};
use crate::rematch::RematchGuard;
use crate::types::{Color, Pairing, Violation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Strict,
    Relaxed,
    Done,
}

/// One matched pair, in pool-entry indices. `rematch` carries the round the
/// two last met when the relaxed pass had to accept a repeat.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MatchedPair {
    pub a: usize,
    pub b: usize,
    pub rematch: Option<u32>,
}

/// Matching produced for one pool.
#[derive(Debug, Default)]
pub(crate) struct PoolMatching {
    pub pairs: Vec<MatchedPair>,
    pub unpaired: Vec<usize>,
}

/// Run the pass machine over a pool of entry indices.
pub(crate) fn pair_pool(
    entries: &[Entry],
    guard: &RematchGuard,
    pool: Vec<usize>,
    allow_relaxed: bool,
) -> PoolMatching {
    let mut matching = PoolMatching::default();
    let mut pending = pool;
    let mut state = Pass::Strict;

    while state != Pass::Done {
        state = match state {
            Pass::Strict => {
                let (pairs, leftover) = strict_pass(entries, guard, &pending);
                debug!(paired = pairs.len(), leftover = leftover.len(), "strict pass");
                matching.pairs.extend(pairs.into_iter().map(|(a, b)| MatchedPair {
                    a,
                    b,
                    rematch: None,
                }));
                pending = leftover;
                if pending.is_empty() || !allow_relaxed {
                    Pass::Done
                } else {
                    Pass::Relaxed
                }
            }
            Pass::Relaxed => {
                let (pairs, leftover) = relaxed_pass(entries, guard, pending);
                debug!(paired = pairs.len(), leftover = leftover.len(), "relaxed pass");
                matching.pairs.extend(pairs);
                pending = leftover;
                Pass::Done
            }
            Pass::Done => Pass::Done,
        };
    }

    matching.unpaired = pending;
    matching
}

/// Bracket-by-bracket fold pairing. Returns pairs plus the indices that
/// could not be paired without a rematch.
fn strict_pass(
    entries: &[Entry],
    guard: &RematchGuard,
    pool: &[usize],
) -> (Vec<(usize, usize)>, Vec<usize>) {
    let brackets = build_brackets(entries, pool);
    let mut pairs = Vec::new();
    let mut unpaired = Vec::new();
    let mut floaters: Vec<usize> = Vec::new();
    let mut floated: HashSet<usize> = HashSet::new();

    for bracket in brackets {
        // Downfloaters from the bracket above pair first.
        let mut members = floaters.clone();
        floaters.clear();
        members.extend(bracket);

        let (bracket_pairs, leftovers) = pair_bracket(entries, guard, &members);
        pairs.extend(bracket_pairs);
        for idx in leftovers {
            if floated.insert(idx) {
                floaters.push(idx);
            } else {
                // Already floated once this round; no second downfloat.
                unpaired.push(idx);
            }
        }
    }

    unpaired.extend(floaters);
    (pairs, unpaired)
}

/// Group a pool into descending score brackets, each ordered by rating
/// descending (name then id for determinism).
fn build_brackets(entries: &[Entry], pool: &[usize]) -> Vec<Vec<usize>> {
    let mut sorted: Vec<usize> = pool.to_vec();
    sorted.sort_by(|&a, &b| {
        let (ea, eb) = (&entries[a], &entries[b]);
        (Reverse(ea.half_points()), Reverse(ea.rating), &ea.name, ea.id)
            .cmp(&(Reverse(eb.half_points()), Reverse(eb.rating), &eb.name, eb.id))
    });

    let mut brackets: Vec<Vec<usize>> = Vec::new();
    for idx in sorted {
        match brackets.last_mut() {
            Some(bracket)
                if entries[bracket[0]].half_points() == entries[idx].half_points() =>
            {
                bracket.push(idx);
            }
            _ => brackets.push(vec![idx]),
        }
    }
    brackets
}

/// Classic Swiss fold within one bracket: top half against bottom half,
/// scanning forward for the first non-forbidden candidate when the fold
/// partner has already met the player.
fn pair_bracket(
    entries: &[Entry],
    guard: &RematchGuard,
    members: &[usize],
) -> (Vec<(usize, usize)>, Vec<usize>) {
    let n = members.len();
    let half = n / 2;
    let mut used = vec![false; n];
    let mut pairs = Vec::new();

    for i in 0..half {
        if used[i] {
            continue;
        }
        let a = members[i];
        // Preference order: the fold partner, the rest of the bottom half,
        // then remaining top-half players.
        let candidates = (half + i..n).chain(half..half + i).chain(i + 1..half);
        let mut chosen = None;
        for j in candidates {
            if used[j] {
                continue;
            }
            if guard.forbids(entries[a].id, entries[members[j]].id) {
                continue;
            }
            chosen = Some(j);
            break;
        }
        if let Some(j) = chosen {
            used[i] = true;
            used[j] = true;
            pairs.push((a, members[j]));
        }
    }

    let leftovers = (0..n).filter(|&k| !used[k]).map(|k| members[k]).collect();
    (pairs, leftovers)
}

/// Pair everyone the strict pass left over, permitting rematches. The
/// relaxation order is deterministic: a never-met opponent always beats a
/// rematch; among rematches, smallest score difference first, then the pair
/// whose previous meeting was longest ago.
fn relaxed_pass(
    entries: &[Entry],
    guard: &RematchGuard,
    pool: Vec<usize>,
) -> (Vec<MatchedPair>, Vec<usize>) {
    let mut pool = pool;
    pool.sort_by_key(|&i| {
        (
            Reverse(entries[i].half_points()),
            Reverse(entries[i].rating),
            entries[i].id,
        )
    });

    let mut pairs = Vec::new();
    while pool.len() >= 2 {
        let a = pool.remove(0);
        let best = pool
            .iter()
            .enumerate()
            .min_by_key(|&(_, &b)| {
                let (ea, eb) = (&entries[a], &entries[b]);
                let diff = (ea.half_points() as i64 - eb.half_points() as i64).abs();
                let met = guard.last_met(ea.id, eb.id);
                (met.is_some(), diff, met.unwrap_or(0), eb.id)
            })
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        let b = pool.remove(best);
        let rematch = guard.last_met(entries[a].id, entries[b].id);
        if let Some(last_met) = rematch {
            warn!(
                a = entries[a].id,
                b = entries[b].id,
                last_met,
                "accepting rematch to complete the round"
            );
        }
        pairs.push(MatchedPair { a, b, rematch });
    }

    (pairs, pool)
}

/// True when `a` should take white against `b`.
///
/// Lower balance (more black games so far) gets white; on a balance tie the
/// players alternate away from their last color; if that resolves nothing
/// the configured rating convention decides.
pub(crate) fn a_takes_white(a: &Entry, b: &Entry, tie: ColorTieBreak) -> bool {
    use std::cmp::Ordering;

    match a.colors.balance.cmp(&b.colors.balance) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => match (a.colors.last, b.colors.last) {
            (Some(Color::Black), Some(Color::White)) => true,
            (Some(Color::White), Some(Color::Black)) => false,
            (Some(Color::Black), None) => true,
            (None, Some(Color::White)) => true,
            (Some(Color::White), None) => false,
            (None, Some(Color::Black)) => false,
            _ => match tie {
                ColorTieBreak::HigherRatedWhite => {
                    (a.rating, b.id) > (b.rating, a.id)
                }
                ColorTieBreak::LowerRatedWhite => {
                    (Reverse(a.rating), b.id) > (Reverse(b.rating), a.id)
                }
            },
        },
    }
}

/// Pair one section end to end: bye selection, pass machine, colors and
/// board numbers. `next_board` continues across sections.
pub(crate) fn pair_section(
    ctx: &SectionRoundContext,
    opts: &PairingOptions,
    allow_relaxed: bool,
    next_board: &mut u32,
) -> (Vec<Pairing>, Vec<Violation>) {
    let mut pool: Vec<usize> = (0..ctx.entries.len()).collect();

    let bye = select_bye(&ctx.entries, &ctx.guard, opts.bye_policy);
    if let Some(selection) = bye {
        pool.retain(|&i| i != selection.index);
    }

    let matching = pair_pool(&ctx.entries, &ctx.guard, pool, allow_relaxed);
    finalize_round(ctx, matching, bye, opts, next_board)
}

/// Turn a matching into the section's board list: color allocation, board
/// numbering, and the violation report. Shared by every pairing system.
pub(crate) fn finalize_round(
    ctx: &SectionRoundContext,
    matching: PoolMatching,
    bye: Option<ByeSelection>,
    opts: &PairingOptions,
    next_board: &mut u32,
) -> (Vec<Pairing>, Vec<Violation>) {
    let mut violations = Vec::new();

    // Board order: stronger seat first, by score then rating.
    let mut pairs = matching.pairs;
    pairs.sort_by_key(|pair| {
        let (ea, eb) = (&ctx.entries[pair.a], &ctx.entries[pair.b]);
        (
            Reverse(ea.half_points().max(eb.half_points())),
            Reverse(ea.rating.max(eb.rating)),
            ea.id.min(eb.id),
        )
    });

    let mut pairings = Vec::new();
    for pair in pairs {
        let (ea, eb) = (&ctx.entries[pair.a], &ctx.entries[pair.b]);
        let (white, black) = if a_takes_white(ea, eb, opts.color_tie_break) {
            (ea, eb)
        } else {
            (eb, ea)
        };

        // The guard is the authority on repeats: matchers that bypass it
        // (fixed rotations, bye seat swaps) still get their rematch reported.
        let rematch = pair
            .rematch
            .or_else(|| ctx.guard.last_met(white.id, black.id));
        if let Some(last_met) = rematch {
            violations.push(Violation::AcceptedRematch {
                white: white.id,
                black: black.id,
                last_met,
            });
        }
        for (entry, color) in [(white, Color::White), (black, Color::Black)] {
            let after = entry.colors.after(color);
            if after.abs() > 2 {
                violations.push(Violation::ColorImbalance {
                    player: entry.id,
                    balance: after,
                });
            }
        }

        let board = *next_board;
        *next_board += 1;
        pairings.push(Pairing::game(ctx.round, &ctx.section, board, white.id, black.id));
    }

    for idx in matching.unpaired {
        violations.push(Violation::Unpaired {
            player: ctx.entries[idx].id,
        });
    }

    // The bye takes the last board of the section.
    if let Some(selection) = bye {
        let board = *next_board;
        *next_board += 1;
        pairings.push(Pairing::bye(
            ctx.round,
            &ctx.section,
            board,
            ctx.entries[selection.index].id,
            selection.kind,
        ));
    }

    (pairings, violations)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
