//! White/black balance tracking used for color allocation.

use crate::types::{Color, GameResult, PlayerId};

/// A player's color record going into a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorHistory {
    /// +1 per white game, -1 per black game. Byes excluded.
    pub balance: i32,
    /// Color of the most recent played game, if any.
    pub last: Option<Color>,
}

impl ColorHistory {
    pub fn for_player(player: PlayerId, results: &[GameResult]) -> Self {
        let mut balance = 0;
        let mut last: Option<(u32, Color)> = None;
        for result in results.iter().filter(|r| r.player == player) {
            if let Some(color) = result.color {
                balance += match color {
                    Color::White => 1,
                    Color::Black => -1,
                };
                // History may arrive unordered; track the latest round seen.
                if last.map_or(true, |(round, _)| result.round > round) {
                    last = Some((result.round, color));
                }
            }
        }
        Self {
            balance,
            last: last.map(|(_, color)| color),
        }
    }

    /// Balance after playing one more game with the given color.
    pub fn after(self, color: Color) -> i32 {
        match color {
            Color::White => self.balance + 1,
            Color::Black => self.balance - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    fn game(round: u32, player: PlayerId, color: Color) -> GameResult {
        GameResult {
            round,
            player,
            opponent: Some(99),
            color: Some(color),
            outcome: Outcome::Draw,
        }
    }

    fn bye(round: u32, player: PlayerId) -> GameResult {
        GameResult {
            round,
            player,
            opponent: None,
            color: None,
            outcome: Outcome::ByeHalf,
        }
    }

    #[test]
    fn no_history() {
        let history = ColorHistory::for_player(1, &[]);
        assert_eq!(history.balance, 0);
        assert_eq!(history.last, None);
    }

    #[test]
    fn balance_counts_colors_and_skips_byes() {
        let results = vec![
            game(1, 1, Color::White),
            game(2, 1, Color::White),
            bye(3, 1),
            game(4, 1, Color::Black),
        ];
        let history = ColorHistory::for_player(1, &results);
        assert_eq!(history.balance, 1);
        assert_eq!(history.last, Some(Color::Black));
    }

    #[test]
    fn last_color_uses_latest_round_even_unordered() {
        let results = vec![game(3, 1, Color::Black), game(1, 1, Color::White)];
        let history = ColorHistory::for_player(1, &results);
        assert_eq!(history.last, Some(Color::Black));
    }
}
