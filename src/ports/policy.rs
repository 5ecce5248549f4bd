//! Policy port - abstraction over game-playing policies
//!
//! Policies consume game states and return action likelihoods. They are used
//! by the comparison and opponent-inference layers; the enumeration core
//! never calls them.

use std::collections::BTreeMap;

use crate::mnk::GameState;

/// Relative tolerance used when collecting maximal likelihoods
const ARGMAX_EPSILON: f64 = 1e-9;

/// Unified interface for random, heuristic and search-based policies
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use mnk_lab::{mnk::{GameState, MnkGame}, ports::Policy};
///
/// struct FirstCell;
///
/// impl Policy for FirstCell {
///     fn name(&self) -> &str {
///         "first_cell"
///     }
///
///     fn action_likelihoods(&self, state: &GameState) -> BTreeMap<usize, f64> {
///         state
///             .legal_actions()
///             .into_iter()
///             .enumerate()
///             .map(|(i, action)| (action, if i == 0 { 1.0 } else { 0.0 }))
///             .collect()
///     }
/// }
///
/// let state = MnkGame::tic_tac_toe().new_initial_state();
/// assert_eq!(FirstCell.best_actions(&state), vec![0]);
/// ```
pub trait Policy: Send + Sync {
    /// Get the policy's name.
    fn name(&self) -> &str;

    /// Non-negative likelihood for every legal action of `state`.
    ///
    /// Values need not sum to one. Terminal states yield an empty map.
    fn action_likelihoods(&self, state: &GameState) -> BTreeMap<usize, f64>;

    /// Whether an opponent model may be attached to this policy.
    fn accepts_opponent_inference(&self) -> bool {
        false
    }

    /// Actions sharing the maximal likelihood, in ascending order.
    fn best_actions(&self, state: &GameState) -> Vec<usize> {
        argmax_actions(&self.action_likelihoods(state))
    }
}

/// Actions whose likelihood is within tolerance of the maximum
pub fn argmax_actions(likelihoods: &BTreeMap<usize, f64>) -> Vec<usize> {
    let Some(best) = likelihoods
        .values()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max)
    else {
        return Vec::new();
    };
    let tolerance = ARGMAX_EPSILON * best.abs().max(1.0);
    likelihoods
        .iter()
        .filter(|&(_, &v)| (best - v).abs() <= tolerance)
        .map(|(&action, _)| action)
        .collect()
}
