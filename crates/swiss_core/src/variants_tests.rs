use super::*;
use crate::options::PairingSystem;
use crate::types::{Outcome, PlayerStatus, RoundPairings};
use crate::{generate_pairings, PairingOptions};

fn player(id: u32, rating: u32) -> Player {
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

fn options(system: PairingSystem) -> PairingOptions {
    PairingOptions {
        system,
        ..PairingOptions::default()
    }
}

fn unordered(pairing: &Pairing) -> (u32, u32) {
    let (white, black) = pairing.players().unwrap();
    (white.min(black), white.max(black))
}

#[test]
fn round_robin_four_players_meet_everyone_once() {
    let players: Vec<Player> = (1..=4).map(|i| player(i, 1900 - i * 100)).collect();
    let opts = options(PairingSystem::RoundRobin);

    let mut met = std::collections::HashSet::new();
    for round in 1..=3 {
        let result = generate_pairings(&players, &[], &[], round, &opts).unwrap();
        assert_eq!(result.pairings.len(), 2);
        for pairing in &result.pairings {
            assert!(met.insert(unordered(pairing)), "repeat {pairing:?}");
        }
    }
    assert_eq!(met.len(), 6);
}

#[test]
fn round_robin_past_rotation_is_invalid() {
    let players: Vec<Player> = (1..=4).map(|i| player(i, 1900 - i * 100)).collect();
    let opts = options(PairingSystem::RoundRobin);
    let err = generate_pairings(&players, &[], &[], 4, &opts).unwrap_err();
    assert_eq!(err, PairingError::InvalidRound { round: 4 });
}

#[test]
fn round_robin_odd_count_delegates_bye_choice() {
    let players: Vec<Player> = (1..=5).map(|i| player(i, 2000 - i * 100)).collect();
    let opts = options(PairingSystem::RoundRobin);
    let result = generate_pairings(&players, &[], &[], 1, &opts).unwrap();

    let byes: Vec<_> = result.pairings.iter().filter(|p| p.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    // The rotation would bench the top seed; bye rules pick the bottom one
    // and the top seed takes the vacated seat.
    assert_eq!(byes[0].white, Some(5));
    let seated: std::collections::HashSet<_> = result
        .pairings
        .iter()
        .filter(|p| !p.is_bye())
        .flat_map(|p| p.seated())
        .collect();
    assert!(seated.contains(&1));
    assert_eq!(seated.len(), 4);
}

/// Score every board (higher rating wins) and append the round's results
/// and pairings to the running history.
fn apply_round(
    players: &[Player],
    result: &RoundPairings,
    results: &mut Vec<GameResult>,
    history: &mut Vec<Pairing>,
) {
    let rating = |id: u32| players.iter().find(|p| p.id == id).unwrap().rating;
    for pairing in &result.pairings {
        if let Some((white, black)) = pairing.players() {
            let white_wins = rating(white) >= rating(black);
            results.push(GameResult {
                round: pairing.round,
                player: white,
                opponent: Some(black),
                color: Some(Color::White),
                outcome: if white_wins { Outcome::Win } else { Outcome::Loss },
            });
            results.push(GameResult {
                round: pairing.round,
                player: black,
                opponent: Some(white),
                color: Some(Color::Black),
                outcome: if white_wins { Outcome::Loss } else { Outcome::Win },
            });
        } else if let (Some(player), Some(kind)) = (pairing.white, pairing.bye) {
            results.push(GameResult {
                round: pairing.round,
                player,
                opponent: None,
                color: None,
                outcome: match kind {
                    ByeType::HalfPoint => Outcome::ByeHalf,
                    ByeType::FullPoint => Outcome::ByeFull,
                    ByeType::Inactive => Outcome::Unplayed,
                },
            });
        }
        history.push(pairing.clone());
    }
}

#[test]
fn round_robin_bye_swap_reports_resulting_rematches() {
    // Five players: each round the bye rules override the rotation's
    // scheduled sit-out, so some later pairing repeats an earlier one.
    // Every repeat must surface as an accepted-rematch violation.
    let players: Vec<Player> = (1..=5).map(|i| player(i, 2000 - i * 100)).collect();
    let opts = options(PairingSystem::RoundRobin);

    let mut results = Vec::new();
    let mut history: Vec<Pairing> = Vec::new();
    let mut met = std::collections::HashSet::new();
    let mut repeats = 0;

    for round in 1..=5 {
        let result = generate_pairings(&players, &results, &history, round, &opts).unwrap();
        for pairing in result.pairings.iter().filter(|p| !p.is_bye()) {
            let (white, black) = pairing.players().unwrap();
            if !met.insert(unordered(pairing)) {
                repeats += 1;
                assert!(
                    result.violations.iter().any(|v| matches!(
                        v,
                        Violation::AcceptedRematch { white: w, black: b, .. }
                            if *w == white && *b == black
                    )),
                    "round {round}: silent rematch ({white}, {black})"
                );
            }
        }
        apply_round(&players, &result, &mut results, &mut history);
    }

    // The swaps guarantee the schedule degenerates at least once.
    assert!(repeats > 0);
}

#[test]
fn quad_of_four_runs_a_full_three_round_cycle() {
    let players: Vec<Player> = (1..=4).map(|i| player(i, 1900 - i * 100)).collect();
    let opts = options(PairingSystem::Quad);

    let mut met = std::collections::HashSet::new();
    for round in 1..=QUAD_ROUNDS {
        let result = generate_pairings(&players, &[], &[], round, &opts).unwrap();
        assert_eq!(result.pairings.len(), 2);
        assert!(result.pairings.iter().all(|p| !p.is_bye()));
        assert!(result.pairings.iter().all(|p| p.section == "Open/Q1"));
        for pairing in &result.pairings {
            assert!(met.insert(unordered(pairing)));
        }
    }
    // Every player faced the other three exactly once.
    assert_eq!(met.len(), 6);

    let err = generate_pairings(&players, &[], &[], 4, &opts).unwrap_err();
    assert_eq!(err, PairingError::InvalidRound { round: 4 });
}

#[test]
fn quads_split_by_rating_proximity() {
    let players: Vec<Player> = (1..=8).map(|i| player(i, 2000 - i * 100)).collect();
    let opts = options(PairingSystem::Quad);
    let result = generate_pairings(&players, &[], &[], 1, &opts).unwrap();

    // Top four in Q1, bottom four in Q2.
    for pairing in &result.pairings {
        let (a, b) = pairing.players().unwrap();
        if pairing.section == "Open/Q1" {
            assert!(a <= 4 && b <= 4);
        } else {
            assert_eq!(pairing.section, "Open/Q2");
            assert!(a > 4 && b > 4);
        }
    }
}

#[test]
fn stranded_quad_tail_player_gets_full_point_bye() {
    let players: Vec<Player> = (1..=9).map(|i| player(i, 2000 - i * 100)).collect();
    let opts = options(PairingSystem::Quad);
    let result = generate_pairings(&players, &[], &[], 1, &opts).unwrap();

    let bye = result.pairings.iter().find(|p| p.is_bye()).unwrap();
    assert_eq!(bye.white, Some(9));
    assert_eq!(bye.bye, Some(ByeType::FullPoint));
    assert_eq!(bye.section, "Open/Q3");
}

fn team_player(id: u32, rating: u32, team: &str) -> Player {
    Player {
        team: Some(team.to_string()),
        ..player(id, rating)
    }
}

#[test]
fn team_swiss_expands_to_boards_with_alternating_colors() {
    let players = vec![
        team_player(1, 1900, "Alpha"),
        team_player(2, 1700, "Alpha"),
        team_player(3, 1800, "Beta"),
        team_player(4, 1600, "Beta"),
    ];
    let opts = options(PairingSystem::TeamSwiss { boards_per_team: 2 });
    let result = generate_pairings(&players, &[], &[], 1, &opts).unwrap();

    assert_eq!(result.pairings.len(), 2);
    // Alpha (higher average) holds white on board one, black on board two.
    assert_eq!(result.pairings[0].white, Some(1));
    assert_eq!(result.pairings[0].black, Some(3));
    assert_eq!(result.pairings[1].white, Some(4));
    assert_eq!(result.pairings[1].black, Some(2));
}

#[test]
fn odd_team_count_benches_the_weakest_team() {
    let players = vec![
        team_player(1, 1900, "Alpha"),
        team_player(2, 1700, "Alpha"),
        team_player(3, 1800, "Beta"),
        team_player(4, 1600, "Beta"),
        team_player(5, 1200, "Gamma"),
        team_player(6, 1100, "Gamma"),
    ];
    let opts = options(PairingSystem::TeamSwiss { boards_per_team: 2 });
    let result = generate_pairings(&players, &[], &[], 1, &opts).unwrap();

    let byes: Vec<_> = result.pairings.iter().filter(|p| p.is_bye()).collect();
    assert_eq!(byes.len(), 2);
    assert!(byes.iter().all(|p| matches!(p.white, Some(5) | Some(6))));
}

#[test]
fn requested_bye_keeps_team_eligible_for_automatic_bye() {
    let mut p3 = team_player(3, 1400, "Gamma");
    p3.requested_byes = vec![1];
    let players = vec![
        team_player(1, 1800, "Alpha"),
        team_player(2, 1600, "Beta"),
        p3,
    ];
    // Round 1: Alpha beat Beta, Gamma sat out on request.
    let results = vec![
        GameResult {
            round: 1,
            player: 1,
            opponent: Some(2),
            color: Some(Color::White),
            outcome: Outcome::Win,
        },
        GameResult {
            round: 1,
            player: 2,
            opponent: Some(1),
            color: Some(Color::Black),
            outcome: Outcome::Loss,
        },
        GameResult {
            round: 1,
            player: 3,
            opponent: None,
            color: None,
            outcome: Outcome::ByeHalf,
        },
    ];
    let prior = vec![
        Pairing::game(1, "Open", 1, 1, 2),
        Pairing::bye(1, "Open", 2, 3, ByeType::HalfPoint),
    ];
    let opts = options(PairingSystem::TeamSwiss { boards_per_team: 1 });
    let result = generate_pairings(&players, &results, &prior, 2, &opts).unwrap();

    // Gamma's round-1 bye was requested, so it still has the fewest games
    // and takes the round-2 bye; Alpha and Beta replay with a reported
    // rematch rather than benching Beta.
    let bye = result.pairings.iter().find(|p| p.is_bye()).unwrap();
    assert_eq!(bye.white, Some(3));
    assert!(result
        .violations
        .iter()
        .any(|v| matches!(v, Violation::AcceptedRematch { .. })));
}

#[test]
fn player_without_a_team_is_reported_unpaired() {
    let players = vec![
        team_player(1, 1900, "Alpha"),
        team_player(2, 1700, "Alpha"),
        team_player(3, 1800, "Beta"),
        team_player(4, 1600, "Beta"),
        player(5, 1500),
    ];
    let opts = options(PairingSystem::TeamSwiss { boards_per_team: 2 });
    let result = generate_pairings(&players, &[], &[], 1, &opts).unwrap();

    assert!(result
        .violations
        .contains(&Violation::Unpaired { player: 5 }));
    assert!(result.pairings.iter().all(|p| p.seated().all(|id| id != 5)));
}

#[test]
fn teams_that_met_are_not_re_paired() {
    let players = vec![
        team_player(1, 1900, "Alpha"),
        team_player(2, 1800, "Beta"),
        team_player(3, 1700, "Gamma"),
        team_player(4, 1600, "Delta"),
    ];
    // Alpha already faced Beta, Gamma faced Delta.
    let prior = vec![
        Pairing::game(1, "Open", 1, 1, 2),
        Pairing::game(1, "Open", 2, 3, 4),
    ];
    let opts = options(PairingSystem::TeamSwiss { boards_per_team: 1 });
    let result = generate_pairings(&players, &[], &prior, 2, &opts).unwrap();

    assert!(result.violations.is_empty());
    for pairing in &result.pairings {
        let pair = unordered(pairing);
        assert_ne!(pair, (1, 2));
        assert_ne!(pair, (3, 4));
    }
}
