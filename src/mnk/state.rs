//! Mutable game positions and the transition function

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Board, LineAnalyzer, MnkGame, Player};

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

/// A position in an M,N,K game.
///
/// A state owns its board buffer; `clone` is a deep copy, which the explorer
/// relies on to branch over every legal action. Once `terminal` is set the
/// player to move is frozen at whoever made the final placement.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    game: MnkGame,
    board: Board,
    current_player: Player,
    moves_remaining_in_turn: usize,
    move_count: usize,
    terminal: bool,
    returns: [f64; 2],
}

impl GameState {
    pub(crate) fn initial(game: MnkGame) -> Self {
        let board = Board::new(game.rows(), game.cols());
        let moves_remaining_in_turn = game.rules().moves_for_turn(Player::X, 0);
        GameState {
            game,
            board,
            current_player: Player::X,
            moves_remaining_in_turn,
            move_count: 0,
            terminal: false,
            returns: [0.0, 0.0],
        }
    }

    pub fn game(&self) -> &MnkGame {
        &self.game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move, or the player who made the final placement once the
    /// game is over
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Placements the current player still has before the turn passes
    pub fn moves_remaining_in_turn(&self) -> usize {
        self.moves_remaining_in_turn
    }

    /// Plies played so far
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Per-player returns: `+1` win, `-1` loss, `0` draw or unfinished
    pub fn returns(&self) -> [f64; 2] {
        self.returns
    }

    pub fn player_return(&self, player: Player) -> f64 {
        self.returns[player.index()]
    }

    /// Winner of a finished game (after misère inversion)
    pub fn winner(&self) -> Option<Player> {
        Player::BOTH
            .into_iter()
            .find(|&player| self.returns[player.index()] > 0.0)
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.terminal {
            return None;
        }
        Some(match self.winner() {
            Some(player) => GameOutcome::Win(player),
            None => GameOutcome::Draw,
        })
    }

    /// Empty cells in ascending order; empty once the game is over
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.terminal {
            return Vec::new();
        }
        self.board.empty_positions()
    }

    /// Number of empty cells
    pub fn free_cells(&self) -> usize {
        self.board.empty_count()
    }

    /// Place a stone for the current player.
    ///
    /// Evaluation order after the placement: win check for the mover, then
    /// draw check on a full board, then turn advance once the mover's
    /// allotment is used up. A line completed with the last empty cell is a
    /// win, not a draw.
    ///
    /// # Errors
    ///
    /// Returns error without touching the state if the game is over, the
    /// action is out of range or the target cell is occupied.
    pub fn apply_action(&mut self, action: usize) -> crate::Result<()> {
        if self.terminal {
            return Err(crate::Error::GameOver);
        }
        if action >= self.board.len() {
            return Err(crate::Error::InvalidAction {
                action,
                cells: self.board.len(),
            });
        }
        if !self.board.is_empty_at(action) {
            return Err(crate::Error::OccupiedCell { action });
        }

        let mover = self.current_player;
        self.board.set(action, mover.to_cell());
        self.move_count += 1;
        self.moves_remaining_in_turn = self.moves_remaining_in_turn.saturating_sub(1);

        let rules = self.game.rules();
        if LineAnalyzer::has_line(
            &self.board,
            mover,
            rules.win_length(mover),
            rules.directions(mover),
        ) {
            self.terminal = true;
            let score = if rules.is_misere() { -1.0 } else { 1.0 };
            self.returns[mover.index()] = score;
            self.returns[mover.opponent().index()] = -score;
        } else if self.board.is_full() {
            self.terminal = true;
            self.returns = [0.0, 0.0];
        }

        if !self.terminal && self.moves_remaining_in_turn == 0 {
            self.current_player = mover.opponent();
            self.moves_remaining_in_turn = rules.moves_for_turn(self.current_player, self.move_count);
        }

        Ok(())
    }

    /// Clone the state and apply an action to the copy
    #[must_use = "child returns a new state; the original is unchanged"]
    pub fn child(&self, action: usize) -> crate::Result<GameState> {
        let mut next = self.clone();
        next.apply_action(action)?;
        Ok(next)
    }

    /// Deduplication key: the board rows plus the player to move, e.g.
    /// `X../.O./..._X`. Ply count is deliberately left out; the turn order is
    /// a function of the number of stones, so board and player determine
    /// every other field.
    pub fn encode(&self) -> String {
        format!("{}_{}", self.board.encode(), self.current_player)
    }

    /// One-hot planes for X, O and empty cells, flattened plane-major
    pub fn observation_tensor(&self) -> Vec<f32> {
        let n = self.board.len();
        let mut obs = vec![0.0; 3 * n];
        for (idx, cell) in self.board.cells().iter().enumerate() {
            let plane = match cell.owner() {
                Some(player) => player.index(),
                None => 2,
            };
            obs[plane * n + idx] = 1.0;
        }
        obs
    }

    /// Render an action as `(row,col)`
    pub fn action_to_string(&self, action: usize) -> String {
        let (row, col) = self.board.position(action);
        format!("({row},{col})")
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnk::{BoardRules, Cell, Direction};

    fn play(game: &MnkGame, actions: &[usize]) -> GameState {
        let mut state = game.new_initial_state();
        for &action in actions {
            state.apply_action(action).unwrap();
        }
        state
    }

    #[test]
    fn test_initial_state() {
        let state = MnkGame::tic_tac_toe().new_initial_state();
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.moves_remaining_in_turn(), 1);
        assert_eq!(state.move_count(), 0);
        assert!(!state.is_terminal());
        assert_eq!(state.returns(), [0.0, 0.0]);
        assert_eq!(state.legal_actions().len(), 9);
        assert_eq!(state.encode(), ".../.../..._X");
    }

    #[test]
    fn test_player_alternation() {
        let mut state = MnkGame::tic_tac_toe().new_initial_state();
        state.apply_action(0).unwrap();
        assert_eq!(state.current_player(), Player::O);
        state.apply_action(1).unwrap();
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.board().get(0), Cell::X);
        assert_eq!(state.board().get(1), Cell::O);
        assert_eq!(state.move_count(), 2);
    }

    #[test]
    fn test_win_detection() {
        // X: 0 1 2, O: 3 4
        let state = play(&MnkGame::tic_tac_toe(), &[0, 3, 1, 4, 2]);
        assert!(state.is_terminal());
        assert_eq!(state.returns(), [1.0, -1.0]);
        assert_eq!(state.winner(), Some(Player::X));
        assert_eq!(state.outcome(), Some(GameOutcome::Win(Player::X)));
        assert_eq!(state.current_player(), Player::X);
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn test_misere_inverts_returns() {
        let game = MnkGame::new(3, 3, BoardRules::new(3).with_misere(true)).unwrap();
        let state = play(&game, &[0, 3, 1, 4, 2]);
        assert!(state.is_terminal());
        assert_eq!(state.returns(), [-1.0, 1.0]);
        assert_eq!(state.winner(), Some(Player::O));
    }

    #[test]
    fn test_draw_detection() {
        // X O X
        // X O O
        // O X X
        let state = play(&MnkGame::tic_tac_toe(), &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(state.is_terminal());
        assert_eq!(state.returns(), [0.0, 0.0]);
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_win_on_last_cell_is_not_a_draw() {
        // X O X
        // O X O
        // O X X  <- X's final placement at 8 fills the board and the diagonal
        let state = play(&MnkGame::tic_tac_toe(), &[0, 1, 2, 3, 4, 5, 7, 6, 8]);
        assert!(state.board().is_full());
        assert_eq!(state.returns(), [1.0, -1.0]);
    }

    #[test]
    fn test_apply_on_terminal_fails_without_mutation() {
        let mut state = play(&MnkGame::tic_tac_toe(), &[0, 3, 1, 4, 2]);
        let before = state.clone();
        let err = state.apply_action(5).unwrap_err();
        assert!(matches!(err, crate::Error::GameOver));
        assert_eq!(state, before);
    }

    #[test]
    fn test_invalid_actions_are_rejected() {
        let mut state = MnkGame::tic_tac_toe().new_initial_state();
        assert!(matches!(
            state.apply_action(9).unwrap_err(),
            crate::Error::InvalidAction { action: 9, cells: 9 }
        ));
        state.apply_action(4).unwrap();
        let before = state.clone();
        assert!(matches!(
            state.apply_action(4).unwrap_err(),
            crate::Error::OccupiedCell { action: 4 }
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_second_player_opening_double_move() {
        let game = MnkGame::new(3, 3, BoardRules::new(3).with_opening_moves(Player::O, 2)).unwrap();
        let mut state = game.new_initial_state();
        state.apply_action(0).unwrap();
        assert_eq!(state.current_player(), Player::O);
        assert_eq!(state.moves_remaining_in_turn(), 2);
        state.apply_action(4).unwrap();
        assert_eq!(state.current_player(), Player::O);
        assert_eq!(state.moves_remaining_in_turn(), 1);
        state.apply_action(8).unwrap();
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.moves_remaining_in_turn(), 1);
        state.apply_action(1).unwrap();
        assert_eq!(state.current_player(), Player::O);
        assert_eq!(state.moves_remaining_in_turn(), 1);
    }

    #[test]
    fn test_first_player_opening_double_move() {
        let game = MnkGame::new(3, 3, BoardRules::new(3).with_opening_moves(Player::X, 2)).unwrap();
        let mut state = game.new_initial_state();
        assert_eq!(state.moves_remaining_in_turn(), 2);
        state.apply_action(0).unwrap();
        assert_eq!(state.current_player(), Player::X);
        state.apply_action(1).unwrap();
        assert_eq!(state.current_player(), Player::O);
        assert_eq!(state.moves_remaining_in_turn(), 1);
    }

    #[test]
    fn test_restricted_directions_ignore_diagonal() {
        let rules = BoardRules::new(3)
            .with_directions(Player::X, [Direction::Horizontal, Direction::Vertical]);
        let game = MnkGame::new(3, 3, rules).unwrap();
        // X on the main diagonal, O scattered on non-line cells
        let state = play(&game, &[0, 1, 4, 2, 8]);
        assert!(!state.is_terminal());
        assert_eq!(state.current_player(), Player::O);
    }

    #[test]
    fn test_per_player_win_length() {
        let rules = BoardRules::new(3).with_extra_win_length(Player::X, 1);
        let game = MnkGame::new(4, 4, rules).unwrap();
        // X: 0 1 2 (three in a row is not enough)
        let state = play(&game, &[0, 4, 1, 5, 2]);
        assert!(!state.is_terminal());
        // O: 4 5 6 completes three
        let state = play(&game, &[0, 4, 1, 5, 2, 6]);
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Player::O));
    }

    #[test]
    fn test_clone_is_independent() {
        let state = MnkGame::tic_tac_toe().new_initial_state();
        let child = state.child(4).unwrap();
        assert_eq!(state.board().get(4), Cell::Empty);
        assert_eq!(child.board().get(4), Cell::X);
        assert_eq!(child.encode(), ".../.X./..._O");
    }

    #[test]
    fn test_observation_tensor() {
        let state = play(&MnkGame::tic_tac_toe(), &[0, 4]);
        let obs = state.observation_tensor();
        assert_eq!(obs.len(), 27);
        assert_eq!(obs[0], 1.0);
        assert_eq!(obs[9 + 4], 1.0);
        assert_eq!(obs[18 + 1], 1.0);
        assert_eq!(obs[18], 0.0);
        assert_eq!(obs.iter().sum::<f32>(), 9.0);
    }

    #[test]
    fn test_display_and_action_string() {
        let state = play(&MnkGame::tic_tac_toe(), &[0, 4]);
        assert_eq!(format!("{state}"), "X../.O./...".replace('/', "\n"));
        assert_eq!(state.action_to_string(5), "(1,2)");
    }
}
