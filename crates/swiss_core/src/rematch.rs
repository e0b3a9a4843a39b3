//! Prior-opponent index that forbids repeat pairings.

use std::collections::HashMap;

use crate::types::{Pairing, PlayerId};

/// Unordered-pair lookup over every game already played in a section.
///
/// Built once per invocation; queries are O(1) amortized. The round each
/// pair last met drives the deterministic relaxation order when a rematch
/// has to be accepted.
#[derive(Clone, Debug, Default)]
pub struct RematchGuard {
    met: HashMap<(PlayerId, PlayerId), u32>,
}

impl RematchGuard {
    pub fn from_pairings(pairings: &[Pairing]) -> Self {
        let mut met = HashMap::new();
        for pairing in pairings {
            if let Some((white, black)) = pairing.players() {
                let entry = met.entry(Self::key(white, black)).or_insert(0);
                *entry = (*entry).max(pairing.round);
            }
        }
        Self { met }
    }

    pub fn forbids(&self, a: PlayerId, b: PlayerId) -> bool {
        self.met.contains_key(&Self::key(a, b))
    }

    /// Round the two last faced each other, if ever.
    pub fn last_met(&self, a: PlayerId, b: PlayerId) -> Option<u32> {
        self.met.get(&Self::key(a, b)).copied()
    }

    fn key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
        (a.min(b), a.max(b))
    }
}
