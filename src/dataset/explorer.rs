//! Exhaustive enumeration of reachable states

use tracing::{debug, info};

use super::{StateDataset, StateRecord};
use crate::{
    Result,
    mnk::GameState,
    ports::{ExplorationObserver, NoopObserver},
};

/// Depth-first walker over the legal-action graph.
///
/// Every distinct state (by [`GameState::encode`]) reachable from the root is
/// recorded exactly once, terminal states included; terminal states are not
/// expanded. The walk keeps an explicit stack of owned states, so the host
/// call stack does not grow with board size. Children are pushed in reverse
/// so records come out in the pre-order a recursive walk over ascending
/// actions would produce.
///
/// # Examples
///
/// ```
/// use mnk_lab::{dataset::{StateDataset, StateExplorer}, mnk::MnkGame};
///
/// let game = MnkGame::tic_tac_toe();
/// let mut dataset = StateDataset::new();
/// StateExplorer::new()
///     .with_max_depth(Some(1))
///     .explore(&game.new_initial_state(), &mut dataset)
///     .unwrap();
///
/// // The empty board plus the nine single-stone positions
/// assert_eq!(dataset.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StateExplorer {
    max_depth: Option<usize>,
}

impl StateExplorer {
    /// Explorer without a depth limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop expanding past `max_depth` plies from the root (root = 0).
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Enumerate from `root` into `dataset`, returning the number of new records.
    ///
    /// # Errors
    ///
    /// Returns error if a generated action is rejected by the rule engine.
    pub fn explore(&self, root: &GameState, dataset: &mut StateDataset) -> Result<usize> {
        self.explore_observed(root, dataset, &mut NoopObserver)
    }

    /// Like [`explore`](Self::explore), reporting each record to `observer`.
    ///
    /// # Errors
    ///
    /// Returns error if a generated action is rejected by the rule engine or
    /// the observer fails.
    pub fn explore_observed(
        &self,
        root: &GameState,
        dataset: &mut StateDataset,
        observer: &mut dyn ExplorationObserver,
    ) -> Result<usize> {
        info!(
            rows = root.game().rows(),
            cols = root.game().cols(),
            max_depth = ?self.max_depth,
            "enumerating reachable states"
        );
        observer.on_exploration_start()?;

        let before = dataset.len();
        let mut stack: Vec<(GameState, usize)> = vec![(root.clone(), 0)];

        while let Some((state, ply)) = stack.pop() {
            let key = state.encode();
            if dataset.is_visited(&key) {
                continue;
            }
            if self.max_depth.is_some_and(|limit| ply > limit) {
                continue;
            }
            dataset.mark_visited(key);

            dataset.append(StateRecord::annotate(&state, ply));
            if let Some(record) = dataset.records().last() {
                observer.on_state_recorded(record)?;
            }

            if state.is_terminal() || self.max_depth.is_some_and(|limit| ply >= limit) {
                continue;
            }

            for action in state.legal_actions().into_iter().rev() {
                let child = state.child(action)?;
                stack.push((child, ply + 1));
            }
        }

        let added = dataset.len() - before;
        debug!(added, visited = dataset.visited_count(), "enumeration pass complete");
        info!(states = dataset.len(), "enumeration finished");
        observer.on_exploration_end(added)?;
        Ok(added)
    }
}
