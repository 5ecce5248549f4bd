//! Per-player rule parameters: win length, line directions, misère scoring
//! and opening-move allotments.
//!
//! Every query here is a pure function of `(player, rules)`, so a single
//! `BoardRules` can be shared by any number of game states.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::board::Player;

/// A line direction on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    /// Row/column step taken when walking a line
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }

    /// Short configuration key
    pub fn key(self) -> &'static str {
        match self {
            Direction::Horizontal => "h",
            Direction::Vertical => "v",
            Direction::Diagonal => "d1",
            Direction::AntiDiagonal => "d2",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Ok(Direction::Horizontal),
            "v" | "vertical" => Ok(Direction::Vertical),
            "d1" | "diagonal" => Ok(Direction::Diagonal),
            "d2" | "anti-diagonal" | "anti_diagonal" | "antidiagonal" => {
                Ok(Direction::AntiDiagonal)
            }
            _ => Err(crate::Error::UnknownDirection { key: s.to_string() }),
        }
    }
}

/// Rule set of an M,N,K game.
///
/// Player-indexed arrays use [`Player::index`]. Use the builder methods to
/// derive variants from [`BoardRules::new`]:
///
/// ```
/// use mnk_lab::mnk::{BoardRules, Direction, Player};
///
/// let rules = BoardRules::new(3)
///     .with_misere(true)
///     .with_extra_win_length(Player::O, 1)
///     .with_directions(Player::X, [Direction::Horizontal, Direction::Vertical])
///     .with_opening_moves(Player::O, 2);
///
/// assert_eq!(rules.win_length(Player::X), 3);
/// assert_eq!(rules.win_length(Player::O), 4);
/// assert_eq!(rules.directions(Player::X).len(), 2);
/// assert_eq!(rules.directions(Player::O).len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRules {
    base_win_length: usize,
    extra_win_length: [i64; 2],
    allowed_directions: [Vec<Direction>; 2],
    misere: bool,
    opening_moves: [usize; 2],
}

impl BoardRules {
    /// Standard rules with win length `k`, all four directions, normal
    /// scoring and one move per turn.
    pub fn new(k: usize) -> Self {
        BoardRules {
            base_win_length: k,
            extra_win_length: [0, 0],
            allowed_directions: [Direction::ALL.to_vec(), Direction::ALL.to_vec()],
            misere: false,
            opening_moves: [1, 1],
        }
    }

    /// Add a (possibly negative) bonus to one player's win length.
    pub fn with_extra_win_length(mut self, player: Player, extra: i64) -> Self {
        self.extra_win_length[player.index()] = extra;
        self
    }

    /// Restrict the directions in which a player's lines count.
    pub fn with_directions<I>(mut self, player: Player, directions: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        let mut allowed = Vec::new();
        for direction in directions {
            if !allowed.contains(&direction) {
                allowed.push(direction);
            }
        }
        self.allowed_directions[player.index()] = allowed;
        self
    }

    /// Invert scoring: completing a line loses.
    pub fn with_misere(mut self, misere: bool) -> Self {
        self.misere = misere;
        self
    }

    /// Number of consecutive placements a player makes on their opening turn.
    pub fn with_opening_moves(mut self, player: Player, moves: usize) -> Self {
        self.opening_moves[player.index()] = moves;
        self
    }

    pub fn base_win_length(&self) -> usize {
        self.base_win_length
    }

    /// Win length before validation; may be below 1 for a malformed rule set.
    pub fn raw_win_length(&self, player: Player) -> i64 {
        self.base_win_length as i64 + self.extra_win_length[player.index()]
    }

    /// Number of stones in a row a player needs
    pub fn win_length(&self, player: Player) -> usize {
        usize::try_from(self.raw_win_length(player)).unwrap_or(0)
    }

    /// Directions in which a player's lines count
    pub fn directions(&self, player: Player) -> &[Direction] {
        &self.allowed_directions[player.index()]
    }

    pub fn is_misere(&self) -> bool {
        self.misere
    }

    /// Configured opening allotment, regardless of ply
    pub fn opening_moves(&self, player: Player) -> usize {
        self.opening_moves[player.index()]
    }

    /// Placements granted to `player` when their turn starts after
    /// `move_count` plies. Opening allotments only apply during the first two
    /// plies; afterwards every turn is a single placement.
    pub fn moves_for_turn(&self, player: Player, move_count: usize) -> usize {
        if move_count <= 1 {
            self.opening_moves(player)
        } else {
            1
        }
    }
}

impl Default for BoardRules {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = BoardRules::default();
        for player in Player::BOTH {
            assert_eq!(rules.win_length(player), 3);
            assert_eq!(rules.directions(player), &Direction::ALL);
            assert_eq!(rules.opening_moves(player), 1);
        }
        assert!(!rules.is_misere());
    }

    #[test]
    fn test_negative_extra_win_length() {
        let rules = BoardRules::new(2).with_extra_win_length(Player::X, -3);
        assert_eq!(rules.raw_win_length(Player::X), -1);
        assert_eq!(rules.win_length(Player::X), 0);
        assert_eq!(rules.win_length(Player::O), 2);
    }

    #[test]
    fn test_with_directions_deduplicates() {
        let rules = BoardRules::new(3).with_directions(
            Player::O,
            [Direction::Vertical, Direction::Vertical, Direction::Diagonal],
        );
        assert_eq!(
            rules.directions(Player::O),
            &[Direction::Vertical, Direction::Diagonal]
        );
    }

    #[test]
    fn test_opening_moves_only_apply_early() {
        let rules = BoardRules::new(3).with_opening_moves(Player::O, 2);
        assert_eq!(rules.moves_for_turn(Player::O, 0), 2);
        assert_eq!(rules.moves_for_turn(Player::O, 1), 2);
        assert_eq!(rules.moves_for_turn(Player::O, 2), 1);
        assert_eq!(rules.moves_for_turn(Player::X, 0), 1);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("h".parse::<Direction>().unwrap(), Direction::Horizontal);
        assert_eq!(" V ".parse::<Direction>().unwrap(), Direction::Vertical);
        assert_eq!("d1".parse::<Direction>().unwrap(), Direction::Diagonal);
        assert_eq!("d2".parse::<Direction>().unwrap(), Direction::AntiDiagonal);
        let err = "d3".parse::<Direction>().unwrap_err();
        assert!(err.to_string().contains("d3"));
    }

    #[test]
    fn test_direction_keys_roundtrip() {
        for direction in Direction::ALL {
            assert_eq!(direction.key().parse::<Direction>().unwrap(), direction);
        }
    }
}
