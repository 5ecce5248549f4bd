//! Feature-annotated dataset records

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::mnk::{GameState, LineAnalyzer, Player};

/// Tactical standing of the player to move, judged by chain lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeLabel {
    Winning,
    Tied,
    Losing,
}

impl OutcomeLabel {
    /// Compare the mover's longest chain with the opponent's
    pub fn from_chains(chain_self: usize, chain_opponent: usize) -> Self {
        match chain_self.cmp(&chain_opponent) {
            std::cmp::Ordering::Greater => OutcomeLabel::Winning,
            std::cmp::Ordering::Equal => OutcomeLabel::Tied,
            std::cmp::Ordering::Less => OutcomeLabel::Losing,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeLabel::Winning => "winning",
            OutcomeLabel::Tied => "tied",
            OutcomeLabel::Losing => "losing",
        }
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winning" => Ok(OutcomeLabel::Winning),
            "tied" => Ok(OutcomeLabel::Tied),
            "losing" => Ok(OutcomeLabel::Losing),
            _ => Err(crate::Error::InvalidConfiguration {
                message: format!("invalid outcome label '{s}' (expected winning, tied or losing)"),
            }),
        }
    }
}

/// Value of a named record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Bool(bool),
    Outcome(OutcomeLabel),
    Player(Player),
}

impl FieldValue {
    /// Equality used by field filters: players also match their numeric id.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Player(p), FieldValue::Int(i)) | (FieldValue::Int(i), FieldValue::Player(p)) => {
                p.index() as i64 == *i
            }
            _ => self == other,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "integer",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Outcome(_) => "outcome label",
            FieldValue::Player(_) => "player",
        }
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<OutcomeLabel> for FieldValue {
    fn from(value: OutcomeLabel) -> Self {
        FieldValue::Outcome(value)
    }
}

impl From<Player> for FieldValue {
    fn from(value: Player) -> Self {
        FieldValue::Player(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Outcome(v) => write!(f, "{v}"),
            FieldValue::Player(v) => write!(f, "{v}"),
        }
    }
}

/// Names accepted by [`StateRecord::field`]
pub const FIELD_NAMES: &[&str] = &[
    "longest_chain_me",
    "chain_self",
    "longest_chain_opp",
    "chain_opponent",
    "freespace",
    "free_cells",
    "num_turns",
    "ply",
    "current_player",
    "outcome",
    "winning",
    "tied",
    "losing",
    "terminal",
];

/// One enumerated position with its tactical features.
///
/// Chain lengths and the outcome label are relative to `current_player`,
/// which for a finished game is the player who made the final placement.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    /// Owned snapshot of the position
    pub state: GameState,
    /// Longest chain of the player to move
    pub chain_self: usize,
    /// Longest chain of the opponent
    pub chain_opponent: usize,
    /// Empty cells (legal actions for a live position)
    pub free_cells: usize,
    pub outcome: OutcomeLabel,
    pub current_player: Player,
    /// Depth in plies from the enumeration root
    pub ply: usize,
}

impl StateRecord {
    /// Compute the features of `state` and snapshot it.
    pub fn annotate(state: &GameState, ply: usize) -> Self {
        let mover = state.current_player();
        let chain_self = longest_chain(state, mover);
        let chain_opponent = longest_chain(state, mover.opponent());

        StateRecord {
            state: state.clone(),
            chain_self,
            chain_opponent,
            free_cells: state.free_cells(),
            outcome: OutcomeLabel::from_chains(chain_self, chain_opponent),
            current_player: mover,
            ply,
        }
    }

    /// Look up a field by name; `None` for unknown names.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "longest_chain_me" | "chain_self" => self.chain_self.into(),
            "longest_chain_opp" | "chain_opponent" => self.chain_opponent.into(),
            "freespace" | "free_cells" => self.free_cells.into(),
            "num_turns" | "ply" => self.ply.into(),
            "current_player" => self.current_player.into(),
            "outcome" => self.outcome.into(),
            "winning" => (self.outcome == OutcomeLabel::Winning).into(),
            "tied" => (self.outcome == OutcomeLabel::Tied).into(),
            "losing" => (self.outcome == OutcomeLabel::Losing).into(),
            "terminal" => self.state.is_terminal().into(),
            _ => return None,
        };
        Some(value)
    }

    pub fn is_winning(&self) -> bool {
        self.outcome == OutcomeLabel::Winning
    }

    pub fn is_tied(&self) -> bool {
        self.outcome == OutcomeLabel::Tied
    }

    pub fn is_losing(&self) -> bool {
        self.outcome == OutcomeLabel::Losing
    }
}

/// Longest chain of `player` along that player's allowed directions
pub fn longest_chain(state: &GameState, player: Player) -> usize {
    LineAnalyzer::longest_chain(
        state.board(),
        player,
        state.game().valid_directions(player),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnk::{BoardRules, Direction, MnkGame};

    #[test]
    fn test_outcome_label_from_chains() {
        assert_eq!(OutcomeLabel::from_chains(2, 1), OutcomeLabel::Winning);
        assert_eq!(OutcomeLabel::from_chains(1, 1), OutcomeLabel::Tied);
        assert_eq!(OutcomeLabel::from_chains(0, 2), OutcomeLabel::Losing);
    }

    #[test]
    fn test_annotate_initial_state() {
        let state = MnkGame::tic_tac_toe().new_initial_state();
        let record = StateRecord::annotate(&state, 0);
        assert_eq!(record.chain_self, 0);
        assert_eq!(record.chain_opponent, 0);
        assert_eq!(record.free_cells, 9);
        assert_eq!(record.outcome, OutcomeLabel::Tied);
        assert_eq!(record.current_player, Player::X);
        assert_eq!(record.ply, 0);
    }

    #[test]
    fn test_annotate_is_relative_to_mover() {
        // X: 0 1, O: 4 -> X to move with a chain of two
        let game = MnkGame::tic_tac_toe();
        let mut state = game.new_initial_state();
        for action in [0, 4, 1] {
            state.apply_action(action).unwrap();
        }
        let record = StateRecord::annotate(&state, 3);
        assert_eq!(record.current_player, Player::O);
        assert_eq!(record.chain_self, 1);
        assert_eq!(record.chain_opponent, 2);
        assert!(record.is_losing());
        assert_eq!(record.field("losing"), Some(FieldValue::Bool(true)));
        assert_eq!(record.field("num_turns"), Some(FieldValue::Int(3)));
    }

    #[test]
    fn test_chain_uses_each_players_directions() {
        let rules = BoardRules::new(3).with_directions(Player::O, [Direction::Horizontal]);
        let game = MnkGame::new(3, 3, rules).unwrap();
        let mut state = game.new_initial_state();
        // X 0, O 1, X 8, O 4 -> O has a vertical pair 1-4 that does not count
        for action in [0, 1, 8, 4] {
            state.apply_action(action).unwrap();
        }
        assert_eq!(longest_chain(&state, Player::O), 1);
        assert_eq!(longest_chain(&state, Player::X), 1);
    }

    #[test]
    fn test_unknown_field_is_none() {
        let record = StateRecord::annotate(&MnkGame::tic_tac_toe().new_initial_state(), 0);
        assert_eq!(record.field("nope"), None);
        for name in FIELD_NAMES {
            assert!(record.field(name).is_some(), "missing field {name}");
        }
    }

    #[test]
    fn test_field_value_player_matches_index() {
        assert!(FieldValue::Player(Player::O).matches(&FieldValue::Int(1)));
        assert!(FieldValue::Int(0).matches(&FieldValue::Player(Player::X)));
        assert!(!FieldValue::Player(Player::X).matches(&FieldValue::Int(1)));
        assert!(!FieldValue::Bool(true).matches(&FieldValue::Int(1)));
    }

    #[test]
    fn test_outcome_label_parse() {
        assert_eq!("Winning".parse::<OutcomeLabel>().unwrap(), OutcomeLabel::Winning);
        assert!("won".parse::<OutcomeLabel>().is_err());
    }
}
