//! Multi-criteria tiebreak computation.
//!
//! Purely derived from completed-game history; pairing generation never
//! feeds back into it. The calculator only supplies values -- the ranking
//! order is whatever ordered criterion list the caller configures.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::options::{Tiebreak, TiebreakOptions};
use crate::types::{GameResult, Outcome, Player, PlayerId};

/// Performance-rating clamp: the conventional dp-table asymptotes.
const MAX_RATING_DELTA: f64 = 800.0;

/// Per-player criterion -> value mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TiebreakSet {
    values: BTreeMap<Tiebreak, f64>,
}

impl TiebreakSet {
    pub fn get(&self, criterion: Tiebreak) -> f64 {
        self.values.get(&criterion).copied().unwrap_or(0.0)
    }

    pub fn insert(&mut self, criterion: Tiebreak, value: f64) {
        self.values.insert(criterion, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tiebreak, f64)> + '_ {
        self.values.iter().map(|(&t, &v)| (t, v))
    }
}

/// Computes every supported criterion for the players of one tournament.
pub struct TiebreakCalculator<'a> {
    results_by_player: HashMap<PlayerId, Vec<&'a GameResult>>,
    final_scores: HashMap<PlayerId, f64>,
    ratings: HashMap<PlayerId, u32>,
    cut: usize,
}

impl<'a> TiebreakCalculator<'a> {
    pub fn new(players: &'a [Player], results: &'a [GameResult], opts: TiebreakOptions) -> Self {
        let mut results_by_player: HashMap<PlayerId, Vec<&GameResult>> = HashMap::new();
        for result in results {
            results_by_player.entry(result.player).or_default().push(result);
        }
        for list in results_by_player.values_mut() {
            list.sort_by_key(|r| r.round);
        }

        let final_scores = results_by_player
            .iter()
            .map(|(&id, list)| (id, list.iter().map(|r| r.points()).sum()))
            .collect();
        let ratings = players.iter().map(|p| (p.id, p.rating)).collect();

        Self {
            results_by_player,
            final_scores,
            ratings,
            cut: opts.median_cut,
        }
    }

    /// All criteria for one player.
    pub fn compute(&self, player: PlayerId) -> TiebreakSet {
        let mut set = TiebreakSet::default();
        set.insert(Tiebreak::Cumulative, self.cumulative(player));
        set.insert(Tiebreak::Buchholz, self.buchholz(player));
        set.insert(Tiebreak::MedianBuchholz, self.median_buchholz(player));
        set.insert(Tiebreak::SonnebornBerger, self.sonneborn_berger(player));
        set.insert(Tiebreak::PerformanceRating, self.performance_rating(player));
        set.insert(
            Tiebreak::Rating,
            self.ratings.get(&player).copied().unwrap_or(0) as f64,
        );
        set
    }

    fn results(&self, player: PlayerId) -> &[&'a GameResult] {
        self.results_by_player
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn opponent_score(&self, opponent: PlayerId) -> f64 {
        self.final_scores.get(&opponent).copied().unwrap_or(0.0)
    }

    /// Running total after each round, summed. Rewards early wins.
    fn cumulative(&self, player: PlayerId) -> f64 {
        let results = self.results(player);
        let last_round = results.iter().map(|r| r.round).max().unwrap_or(0);
        let mut total = 0.0;
        let mut progressive = 0.0;
        for round in 1..=last_round {
            total += results
                .iter()
                .filter(|r| r.round == round)
                .map(|r| r.points())
                .sum::<f64>();
            progressive += total;
        }
        progressive
    }

    /// Sum of all opponents' final scores.
    fn buchholz(&self, player: PlayerId) -> f64 {
        self.opponent_scores(player).iter().sum()
    }

    /// Buchholz with the top and bottom `cut` opponent scores dropped.
    fn median_buchholz(&self, player: PlayerId) -> f64 {
        let mut scores = self.opponent_scores(player);
        scores.sort_by(f64::total_cmp);
        if scores.len() > 2 * self.cut {
            scores[self.cut..scores.len() - self.cut].iter().sum()
        } else {
            scores.iter().sum()
        }
    }

    /// Sum of beaten opponents' scores plus half of drawn opponents'.
    fn sonneborn_berger(&self, player: PlayerId) -> f64 {
        self.results(player)
            .iter()
            .filter_map(|r| {
                let opponent = r.opponent?;
                let weight = match r.outcome {
                    Outcome::Win => 1.0,
                    Outcome::Draw => 0.5,
                    _ => return None,
                };
                Some(weight * self.opponent_score(opponent))
            })
            .sum()
    }

    /// Average opponent rating adjusted by score percentage through the
    /// logistic mapping, clamped at +/-800. Byes and unplayed rounds carry
    /// no opponent and are excluded.
    fn performance_rating(&self, player: PlayerId) -> f64 {
        let mut rating_sum = 0.0;
        let mut score = 0.0;
        let mut games = 0u32;
        for result in self.results(player) {
            let Some(opponent) = result.opponent else { continue };
            let Some(&rating) = self.ratings.get(&opponent) else { continue };
            if !result.outcome.is_game() {
                continue;
            }
            rating_sum += rating as f64;
            score += result.points();
            games += 1;
        }
        if games == 0 {
            return 0.0;
        }
        let average = rating_sum / games as f64;
        let p = score / games as f64;
        average + rating_delta(p)
    }

    /// Opponent final scores over played games only.
    fn opponent_scores(&self, player: PlayerId) -> Vec<f64> {
        self.results(player)
            .iter()
            .filter(|r| r.outcome.is_game())
            .filter_map(|r| r.opponent)
            .map(|opponent| self.opponent_score(opponent))
            .collect()
    }
}

/// Logistic dp mapping: 400 * log10(p / (1 - p)), clamped.
fn rating_delta(p: f64) -> f64 {
    if p <= 0.0 {
        return -MAX_RATING_DELTA;
    }
    if p >= 1.0 {
        return MAX_RATING_DELTA;
    }
    (400.0 * (p / (1.0 - p)).log10()).clamp(-MAX_RATING_DELTA, MAX_RATING_DELTA)
}

#[cfg(test)]
#[path = "tiebreak_tests.rs"]
mod tiebreak_tests;
