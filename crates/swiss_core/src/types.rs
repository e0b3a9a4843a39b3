//! Core tournament data model: players, game results, pairings.
//!
//! Everything here is a plain read-only snapshot type. The engine never
//! mutates its inputs; the only value it produces is a fresh pairing list.

use serde::{Deserialize, Serialize};

/// Stable player identifier, unique within a tournament.
pub type PlayerId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Registration state of a player. Only `Active` players are paired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Inactive,
    Withdrawn,
}

/// A tournament participant.
///
/// Identity is immutable; rating and status are mutated externally between
/// rounds and the engine only ever sees the current snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: u32,
    /// Section name. Sections pair completely independently.
    pub section: String,
    pub status: PlayerStatus,
    /// Rounds for which the player pre-registered a bye.
    #[serde(default)]
    pub requested_byes: Vec<u32>,
    /// Team name for team-Swiss events; ignored by the other systems.
    #[serde(default)]
    pub team: Option<String>,
}

impl Player {
    pub fn is_eligible(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub fn requested_bye(&self, round: u32) -> bool {
        self.requested_byes.contains(&round)
    }
}

/// Outcome of a single round from one player's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    /// Half-point bye (requested or automatic).
    ByeHalf,
    /// Full-point bye for a player left without any available opponent.
    ByeFull,
    /// Round skipped entirely (no pairing, no points).
    Unplayed,
}

impl Outcome {
    /// Points awarded for this outcome.
    pub fn points(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Draw => 0.5,
            Outcome::ByeHalf => 0.5,
            Outcome::ByeFull => 1.0,
            Outcome::Unplayed => 0.0,
        }
    }

    /// Whether the outcome came from a game against a real opponent.
    pub fn is_game(self) -> bool {
        matches!(self, Outcome::Win | Outcome::Loss | Outcome::Draw)
    }
}

/// One completed round for one player. Append-only; at most one result per
/// (player, round).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub round: u32,
    pub player: PlayerId,
    /// None for byes and unplayed rounds.
    pub opponent: Option<PlayerId>,
    /// Color the player held; None for byes and unplayed rounds.
    pub color: Option<Color>,
    pub outcome: Outcome,
}

impl GameResult {
    pub fn points(&self) -> f64 {
        self.outcome.points()
    }
}

/// Kind of bye carried by a single-seat pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByeType {
    /// Standard bye: 0.5 points.
    HalfPoint,
    /// Unpaired bye: 1.0 points, granted when no opponent exists at all.
    FullPoint,
    /// Placeholder for an inactive player: 0 points.
    Inactive,
}

impl ByeType {
    pub fn points(self) -> f64 {
        match self {
            ByeType::HalfPoint => 0.5,
            ByeType::FullPoint => 1.0,
            ByeType::Inactive => 0.0,
        }
    }
}

/// Game outcome of a board, from white's perspective. None while pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardOutcome {
    WhiteWin,
    BlackWin,
    Draw,
}

/// One board of one round.
///
/// Invariant: either both seats are filled (a game, exactly one white and one
/// black) or exactly one seat is filled and `bye` carries the bye type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub round: u32,
    pub section: String,
    pub board: u32,
    pub white: Option<PlayerId>,
    pub black: Option<PlayerId>,
    #[serde(default)]
    pub bye: Option<ByeType>,
    #[serde(default)]
    pub outcome: Option<BoardOutcome>,
}

impl Pairing {
    pub fn game(round: u32, section: &str, board: u32, white: PlayerId, black: PlayerId) -> Self {
        Self {
            round,
            section: section.to_string(),
            board,
            white: Some(white),
            black: Some(black),
            bye: None,
            outcome: None,
        }
    }

    pub fn bye(round: u32, section: &str, board: u32, player: PlayerId, kind: ByeType) -> Self {
        Self {
            round,
            section: section.to_string(),
            board,
            white: Some(player),
            black: None,
            bye: Some(kind),
            outcome: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.bye.is_some()
    }

    /// Both seats, when this pairing is a game.
    pub fn players(&self) -> Option<(PlayerId, PlayerId)> {
        match (self.white, self.black) {
            (Some(w), Some(b)) => Some((w, b)),
            _ => None,
        }
    }

    /// Every player seated on this board (one for a bye, two for a game).
    pub fn seated(&self) -> impl Iterator<Item = PlayerId> {
        self.white.into_iter().chain(self.black)
    }
}

/// A constraint the engine had to relax (or could not satisfy) to finish the
/// round. Always surfaced to the caller, never silently discarded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Two players were re-paired despite having met before.
    AcceptedRematch {
        white: PlayerId,
        black: PlayerId,
        last_met: u32,
    },
    /// A color assignment pushed a player's white/black balance past the
    /// usual |balance| <= 2 bound.
    ColorImbalance { player: PlayerId, balance: i32 },
    /// The player could not be paired at all, even after relaxation.
    Unpaired { player: PlayerId },
}

/// Output of one pairing invocation: the full board list for the round plus
/// every constraint relaxation that was needed to produce it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundPairings {
    pub round: u32,
    pub pairings: Vec<Pairing>,
    pub violations: Vec<Violation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_points() {
        assert_eq!(Outcome::Win.points(), 1.0);
        assert_eq!(Outcome::Draw.points(), 0.5);
        assert_eq!(Outcome::ByeHalf.points(), 0.5);
        assert_eq!(Outcome::ByeFull.points(), 1.0);
        assert_eq!(Outcome::Unplayed.points(), 0.0);
        assert!(!Outcome::ByeHalf.is_game());
        assert!(Outcome::Draw.is_game());
    }

    #[test]
    fn pairing_constructors() {
        let game = Pairing::game(2, "Open", 1, 10, 20);
        assert_eq!(game.players(), Some((10, 20)));
        assert!(!game.is_bye());

        let bye = Pairing::bye(2, "Open", 3, 30, ByeType::HalfPoint);
        assert!(bye.is_bye());
        assert_eq!(bye.players(), None);
        assert_eq!(bye.seated().collect::<Vec<_>>(), vec![30]);
    }
}
