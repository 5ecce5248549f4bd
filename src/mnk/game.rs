//! Immutable game definitions

use std::sync::Arc;

use super::{BoardRules, Direction, GameState, Player};

/// Description of an M,N,K game instance: board dimensions plus rules.
///
/// The rules live behind an `Arc`, so cloning a definition is cheap and
/// every [`GameState`] carries its own handle to the definition it was
/// created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MnkGame {
    rows: usize,
    cols: usize,
    rules: Arc<BoardRules>,
}

impl MnkGame {
    /// Create a game definition.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - either dimension is zero
    /// - a player's win length is below 1
    /// - a player's opening allotment is zero
    /// - neither axis is long enough for the larger win length
    pub fn new(rows: usize, cols: usize, rules: BoardRules) -> crate::Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("board dimensions must be positive, got {rows}x{cols}"),
            });
        }

        for player in Player::BOTH {
            let win_length = rules.raw_win_length(player);
            if win_length < 1 {
                return Err(crate::Error::InvalidWinLength {
                    player: player.index(),
                    win_length,
                });
            }
            if rules.opening_moves(player) == 0 {
                return Err(crate::Error::InvalidOpeningMoves {
                    player: player.index(),
                });
            }
        }

        let max_k = Player::BOTH
            .iter()
            .map(|&player| rules.win_length(player))
            .max()
            .unwrap_or(0);
        if rows.max(cols) < max_k {
            return Err(crate::Error::BoardTooSmall {
                rows,
                cols,
                win_length: max_k,
            });
        }

        Ok(MnkGame {
            rows,
            cols,
            rules: Arc::new(rules),
        })
    }

    /// Standard 3x3 tic-tac-toe
    pub fn tic_tac_toe() -> Self {
        MnkGame {
            rows: 3,
            cols: 3,
            rules: Arc::new(BoardRules::new(3)),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn num_players(&self) -> usize {
        2
    }

    pub fn max_game_length(&self) -> usize {
        self.num_cells()
    }

    /// Shape of [`GameState::observation_tensor`]: planes, rows, cols
    pub fn observation_tensor_shape(&self) -> (usize, usize, usize) {
        (3, self.rows, self.cols)
    }

    pub fn rules(&self) -> &BoardRules {
        &self.rules
    }

    pub fn win_length(&self, player: Player) -> usize {
        self.rules.win_length(player)
    }

    pub fn valid_directions(&self, player: Player) -> &[Direction] {
        self.rules.directions(player)
    }

    pub fn is_misere(&self) -> bool {
        self.rules.is_misere()
    }

    /// Empty board, X to move with its opening allotment
    pub fn new_initial_state(&self) -> GameState {
        GameState::initial(self.clone())
    }

    /// Legal actions of a state; empty once the game is over
    pub fn legal_actions(&self, state: &GameState) -> Vec<usize> {
        state.legal_actions()
    }

    /// Apply one action to a state of this game
    ///
    /// # Errors
    ///
    /// See [`GameState::apply_action`].
    pub fn apply_action(&self, state: &mut GameState, action: usize) -> crate::Result<()> {
        state.apply_action(action)
    }
}

impl Default for MnkGame {
    fn default() -> Self {
        Self::tic_tac_toe()
    }
}
