use std::collections::BTreeMap;

use crate::{mnk::GameState, ports::Policy};

/// Uniform policy: every legal action gets the same likelihood
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    name: String,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            name: "random".to_string(),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn action_likelihoods(&self, state: &GameState) -> BTreeMap<usize, f64> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return BTreeMap::new();
        }
        let p = 1.0 / actions.len() as f64;
        actions.into_iter().map(|action| (action, p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnk::MnkGame;

    #[test]
    fn test_uniform_over_legal_actions() {
        let state = MnkGame::tic_tac_toe().new_initial_state().child(4).unwrap();
        let likelihoods = RandomPolicy::new().action_likelihoods(&state);
        assert_eq!(likelihoods.len(), 8);
        assert!(!likelihoods.contains_key(&4));
        let total: f64 = likelihoods.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(RandomPolicy::new().best_actions(&state).len(), 8);
    }

    #[test]
    fn test_terminal_state_is_empty() {
        let mut state = MnkGame::tic_tac_toe().new_initial_state();
        for action in [0, 3, 1, 4, 2] {
            state.apply_action(action).unwrap();
        }
        assert!(state.is_terminal());
        assert!(RandomPolicy::new().action_likelihoods(&state).is_empty());
    }
}
