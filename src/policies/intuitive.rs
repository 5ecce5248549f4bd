//! Heuristic "intuitive gamer" policy.
//!
//! Each legal action is scored by three utilities:
//!
//! - `u_self`: the mover's longest chain after playing the action, relative
//!   to its win length, plus a bonus when the action completes a line
//! - `u_opp`: the same quantity for the opponent had it played there, so
//!   cells that block a strong opponent line score high
//! - `u_aux`: centrality, 1 at the board centre falling to 0 at the corners
//!
//! Under misère scoring completing a line loses, so `u_self` and `u_opp`
//! change sign. The likelihood of an action is
//! `exp(beta * (w_self * u_self + w_opp * u_opp + w_aux * u_aux))`,
//! normalised over legal actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    mnk::{Board, GameState, LineAnalyzer, Player},
    ports::Policy,
};

/// Added to `u_self` when the action wins on the spot
const WIN_BONUS: f64 = 4.0;
/// Added to `u_opp` when the action takes the opponent's winning cell
const BLOCK_BONUS: f64 = 2.0;

/// Inverse temperature and utility weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntuitiveGamerParams {
    pub beta: f64,
    pub w_self: f64,
    pub w_opp: f64,
    pub w_aux: f64,
}

impl Default for IntuitiveGamerParams {
    fn default() -> Self {
        Self {
            beta: 1.0,
            w_self: 1.0,
            w_opp: 1.0,
            w_aux: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntuitiveGamerPolicy {
    name: String,
    params: IntuitiveGamerParams,
}

impl IntuitiveGamerPolicy {
    pub fn new(params: IntuitiveGamerParams) -> Self {
        Self {
            name: "intuitive_gamer".to_string(),
            params,
        }
    }

    pub fn params(&self) -> &IntuitiveGamerParams {
        &self.params
    }

    /// Combined utility of placing the mover's stone on `action`
    pub fn utility(&self, state: &GameState, action: usize) -> f64 {
        let me = state.current_player();
        let p = &self.params;
        p.w_self * u_line(state, action, me, WIN_BONUS)
            + p.w_opp * u_line(state, action, me.opponent(), BLOCK_BONUS)
            + p.w_aux * u_aux(state.board(), action)
    }
}

impl Default for IntuitiveGamerPolicy {
    fn default() -> Self {
        Self::new(IntuitiveGamerParams::default())
    }
}

impl Policy for IntuitiveGamerPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts_opponent_inference(&self) -> bool {
        true
    }

    fn action_likelihoods(&self, state: &GameState) -> BTreeMap<usize, f64> {
        let scored: Vec<(usize, f64)> = state
            .legal_actions()
            .into_iter()
            .map(|action| (action, self.params.beta * self.utility(state, action)))
            .collect();
        let Some(max) = scored.iter().map(|&(_, s)| s).reduce(f64::max) else {
            return BTreeMap::new();
        };

        let weights: Vec<(usize, f64)> = scored
            .into_iter()
            .map(|(action, s)| (action, (s - max).exp()))
            .collect();
        let total: f64 = weights.iter().map(|&(_, w)| w).sum();
        weights
            .into_iter()
            .map(|(action, w)| (action, w / total))
            .collect()
    }
}

/// Chain `player` would reach by playing `action`, relative to its win length
fn u_line(state: &GameState, action: usize, player: Player, bonus: f64) -> f64 {
    let game = state.game();
    let win_length = game.win_length(player).max(1);
    let directions = game.valid_directions(player);
    let board = state.board();

    let placed = board.with_cell(action, player.to_cell());
    let chain = LineAnalyzer::longest_chain(&placed, player, directions) as f64;
    let mut utility = chain / win_length as f64;
    if LineAnalyzer::has_line(&placed, player, win_length, directions) {
        utility += bonus;
    }

    if game.is_misere() { -utility } else { utility }
}

fn u_aux(board: &Board, action: usize) -> f64 {
    let (row, col) = board.position(action);
    let centre_r = (board.rows() as f64 - 1.0) / 2.0;
    let centre_c = (board.cols() as f64 - 1.0) / 2.0;
    let max_dist = centre_r.hypot(centre_c);
    if max_dist == 0.0 {
        return 1.0;
    }
    1.0 - (row as f64 - centre_r).hypot(col as f64 - centre_c) / max_dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnk::{BoardRules, MnkGame};

    fn play(game: &MnkGame, actions: &[usize]) -> GameState {
        let mut state = game.new_initial_state();
        for &action in actions {
            state.apply_action(action).unwrap();
        }
        state
    }

    #[test]
    fn test_prefers_immediate_win() {
        // X: 0 1, O: 3 4, X to move; 2 wins, 5 only blocks
        let state = play(&MnkGame::tic_tac_toe(), &[0, 3, 1, 4]);
        let policy = IntuitiveGamerPolicy::default();
        assert_eq!(policy.best_actions(&state), vec![2]);
    }

    #[test]
    fn test_blocks_opponent_win() {
        // X: 0 1, O: 4, O to move
        let state = play(&MnkGame::tic_tac_toe(), &[0, 4, 1]);
        let policy = IntuitiveGamerPolicy::default();
        assert_eq!(policy.best_actions(&state), vec![2]);
    }

    #[test]
    fn test_opens_in_centre() {
        let state = MnkGame::tic_tac_toe().new_initial_state();
        assert_eq!(IntuitiveGamerPolicy::default().best_actions(&state), vec![4]);
    }

    #[test]
    fn test_likelihoods_are_normalised() {
        let state = play(&MnkGame::tic_tac_toe(), &[4]);
        let likelihoods = IntuitiveGamerPolicy::default().action_likelihoods(&state);
        assert_eq!(likelihoods.len(), 8);
        let total: f64 = likelihoods.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(likelihoods.values().all(|&p| p > 0.0));
    }

    #[test]
    fn test_zero_beta_is_uniform() {
        let state = play(&MnkGame::tic_tac_toe(), &[0, 3, 1, 4]);
        let policy = IntuitiveGamerPolicy::new(IntuitiveGamerParams {
            beta: 0.0,
            ..IntuitiveGamerParams::default()
        });
        assert_eq!(policy.best_actions(&state).len(), 5);
    }

    #[test]
    fn test_misere_avoids_completing_line() {
        let game = MnkGame::new(3, 3, BoardRules::new(3).with_misere(true)).unwrap();
        let state = play(&game, &[0, 3, 1, 4]);
        let likelihoods = IntuitiveGamerPolicy::default().action_likelihoods(&state);
        let best = IntuitiveGamerPolicy::default().best_actions(&state);
        assert!(!best.contains(&2));
        assert!(likelihoods[&2] < likelihoods[&8]);
    }

    #[test]
    fn test_terminal_state_is_empty() {
        let state = play(&MnkGame::tic_tac_toe(), &[0, 3, 1, 4, 2]);
        assert!(IntuitiveGamerPolicy::default().action_likelihoods(&state).is_empty());
    }
}
