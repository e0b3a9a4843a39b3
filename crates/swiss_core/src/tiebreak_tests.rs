use super::*;
use crate::types::{Color, PlayerStatus};

fn player(id: PlayerId, rating: u32) -> Player {
    Player {
        id,
        name: format!("player-{id:02}"),
        rating,
        section: "Open".to_string(),
        status: PlayerStatus::Active,
        requested_byes: vec![],
        team: None,
    }
}

fn game(round: u32, player: PlayerId, opponent: PlayerId, outcome: Outcome) -> GameResult {
    GameResult {
        round,
        player,
        opponent: Some(opponent),
        color: Some(Color::White),
        outcome,
    }
}

/// Three rounds, four players, all decisive:
/// R1: 1>2, 3>4; R2: 1>3, 2>4; R3: 1>4, 2>3.
/// Final scores: 1 -> 3.0, 2 -> 2.0, 3 -> 1.0, 4 -> 0.0.
fn fixture() -> (Vec<Player>, Vec<GameResult>) {
    let players = vec![
        player(1, 1800),
        player(2, 1700),
        player(3, 1600),
        player(4, 1500),
    ];
    let mut results = Vec::new();
    let rounds = [
        [(1, 2), (3, 4)],
        [(1, 3), (2, 4)],
        [(1, 4), (2, 3)],
    ];
    for (i, games) in rounds.iter().enumerate() {
        let round = i as u32 + 1;
        for &(winner, loser) in games {
            results.push(game(round, winner, loser, Outcome::Win));
            results.push(game(round, loser, winner, Outcome::Loss));
        }
    }
    (players, results)
}

#[test]
fn buchholz_sums_opponent_scores() {
    let (players, results) = fixture();
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    // Player 1 faced 2 (2.0), 3 (1.0), 4 (0.0).
    assert_eq!(calc.compute(1).get(Tiebreak::Buchholz), 3.0);
    // Player 4 faced 3 (1.0), 2 (2.0), 1 (3.0).
    assert_eq!(calc.compute(4).get(Tiebreak::Buchholz), 6.0);
}

#[test]
fn median_buchholz_drops_the_extremes() {
    let (players, results) = fixture();
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    // Player 1 opponent scores [2.0, 1.0, 0.0]; cut 1 leaves 1.0.
    assert_eq!(calc.compute(1).get(Tiebreak::MedianBuchholz), 1.0);
}

#[test]
fn median_cut_is_skipped_for_short_histories() {
    let players = vec![player(1, 1800), player(2, 1700)];
    let results = vec![
        game(1, 1, 2, Outcome::Win),
        game(1, 2, 1, Outcome::Loss),
    ];
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    assert_eq!(calc.compute(1).get(Tiebreak::MedianBuchholz), 0.0);
    assert_eq!(calc.compute(2).get(Tiebreak::MedianBuchholz), 1.0);
}

#[test]
fn sonneborn_berger_weights_wins_and_draws() {
    let (players, results) = fixture();
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    // Player 1 beat everyone: full opponent scores.
    assert_eq!(calc.compute(1).get(Tiebreak::SonnebornBerger), 3.0);
    // Player with zero wins and draws scores exactly 0.
    assert_eq!(calc.compute(4).get(Tiebreak::SonnebornBerger), 0.0);
}

#[test]
fn sonneborn_berger_halves_draws() {
    let players = vec![player(1, 1800), player(2, 1700), player(3, 1600)];
    let results = vec![
        game(1, 1, 2, Outcome::Draw),
        game(1, 2, 1, Outcome::Draw),
        game(2, 1, 3, Outcome::Win),
        game(2, 3, 1, Outcome::Loss),
        game(3, 2, 3, Outcome::Win),
        game(3, 3, 2, Outcome::Loss),
    ];
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    // Player 1: draw vs 2 (1.5 final) + win vs 3 (0.0 final).
    assert_eq!(calc.compute(1).get(Tiebreak::SonnebornBerger), 0.75);
}

#[test]
fn cumulative_rewards_early_scoring() {
    let (players, results) = fixture();
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    // Running totals 1, 2, 3.
    assert_eq!(calc.compute(1).get(Tiebreak::Cumulative), 6.0);
    // Player 4 never scored.
    assert_eq!(calc.compute(4).get(Tiebreak::Cumulative), 0.0);
}

#[test]
fn performance_rating_tracks_opponent_average() {
    let (players, results) = fixture();
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    // Player 1 swept opponents averaging 1600: clamped at +800.
    assert_eq!(calc.compute(1).get(Tiebreak::PerformanceRating), 2400.0);
    // Player 4 lost every game against a 1700 average: clamped at -800.
    assert_eq!(calc.compute(4).get(Tiebreak::PerformanceRating), 900.0);
}

#[test]
fn performance_rating_even_score_is_the_average() {
    let players = vec![player(1, 1550), player(2, 1650)];
    let results = vec![
        game(1, 1, 2, Outcome::Draw),
        game(1, 2, 1, Outcome::Draw),
    ];
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    assert_eq!(calc.compute(1).get(Tiebreak::PerformanceRating), 1650.0);
    assert_eq!(calc.compute(2).get(Tiebreak::PerformanceRating), 1550.0);
}

#[test]
fn byes_are_excluded_from_opponent_based_criteria() {
    let players = vec![player(1, 1800), player(2, 1700)];
    let results = vec![
        GameResult {
            round: 1,
            player: 1,
            opponent: None,
            color: None,
            outcome: Outcome::ByeHalf,
        },
        game(2, 1, 2, Outcome::Win),
        game(2, 2, 1, Outcome::Loss),
    ];
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    let set = calc.compute(1);
    assert_eq!(set.get(Tiebreak::Buchholz), 0.0);
    assert_eq!(set.get(Tiebreak::PerformanceRating), 2500.0);
    // The bye still counts toward the cumulative running total.
    assert_eq!(set.get(Tiebreak::Cumulative), 2.0);
}

#[test]
fn rating_criterion_mirrors_the_snapshot() {
    let (players, results) = fixture();
    let calc = TiebreakCalculator::new(&players, &results, TiebreakOptions::default());
    assert_eq!(calc.compute(3).get(Tiebreak::Rating), 1600.0);
}
