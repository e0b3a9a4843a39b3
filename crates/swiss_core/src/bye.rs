//! Bye selection for odd-sized pools.

use tracing::debug;

use crate::context::Entry;
use crate::options::ByePolicy;
use crate::rematch::RematchGuard;
use crate::types::ByeType;

/// The player (by index into the pool) pulled out before pairing runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByeSelection {
    pub index: usize,
    pub kind: ByeType,
}

/// Pick the bye recipient for an odd pool.
///
/// Order of preference: a player who pre-registered a bye for this round;
/// otherwise the player with the fewest games played and lowest score who
/// has not yet received an automatic bye, ties broken by lowest rating then
/// id. Returns `None` for an even pool.
pub fn select_bye(entries: &[Entry], guard: &RematchGuard, policy: ByePolicy) -> Option<ByeSelection> {
    if entries.len() % 2 == 0 {
        return None;
    }

    if let Some(index) = requested_candidate(entries) {
        debug!(player = entries[index].id, "bye granted on request");
        return Some(ByeSelection {
            index,
            kind: ByeType::HalfPoint,
        });
    }

    let index = automatic_candidate(entries)?;
    let kind = if no_available_opponent(entries, guard, index) {
        // Nobody left to play at all: full point, not a half-point bye.
        ByeType::FullPoint
    } else {
        policy.bye_type()
    };
    debug!(player = entries[index].id, ?kind, "automatic bye");
    Some(ByeSelection { index, kind })
}

fn requested_candidate(entries: &[Entry]) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.requested_bye)
        .min_by_key(|(_, e)| (e.rating, e.id))
        .map(|(i, _)| i)
}

fn automatic_candidate(entries: &[Entry]) -> Option<usize> {
    let fresh = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.had_auto_bye)
        .min_by_key(|(_, e)| (e.games_played, e.half_points(), e.rating, e.id))
        .map(|(i, _)| i);
    // Everyone has had one already: fall back to the same ordering over all.
    fresh.or_else(|| {
        entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| (e.games_played, e.half_points(), e.rating, e.id))
            .map(|(i, _)| i)
    })
}

fn no_available_opponent(entries: &[Entry], guard: &RematchGuard, index: usize) -> bool {
    entries
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .all(|(_, other)| guard.forbids(entries[index].id, other.id))
}

#[cfg(test)]
#[path = "bye_tests.rs"]
mod bye_tests;
