//! Enumerated state datasets and the query layer over them
//!
//! - [`StateExplorer`] walks every reachable position of a game
//! - [`StateDataset`] accumulates one [`StateRecord`] per distinct position
//! - [`StateView`] narrows and samples records without copying them
//! - [`Predicate`] is the closed expression language used by configured samplers

pub mod explorer;
pub mod observers;
pub mod predicate;
pub mod record;
pub mod sampler;
pub mod view;

use std::collections::HashSet;

pub use explorer::StateExplorer;
pub use observers::ProgressObserver;
pub use predicate::{CompareOp, Operand, Predicate};
pub use record::{FIELD_NAMES, FieldValue, OutcomeLabel, StateRecord, longest_chain};
pub use sampler::{ConfiguredSampler, build_sampler};
pub use view::StateView;

use crate::{Result, mnk::MnkGame, ports::ExplorationObserver};

/// Append-only collection of annotated states.
///
/// The dataset also owns the set of canonical keys already visited, so a
/// second enumeration into the same dataset never records a position twice.
#[derive(Debug, Clone, Default)]
pub struct StateDataset {
    items: Vec<StateRecord>,
    visited: HashSet<String>,
}

impl StateDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerate every state of `game` reachable within `max_depth` plies.
    ///
    /// # Errors
    ///
    /// Returns error if the rule engine rejects a generated action.
    pub fn generate(game: &MnkGame, max_depth: Option<usize>) -> Result<Self> {
        let mut dataset = Self::new();
        StateExplorer::new()
            .with_max_depth(max_depth)
            .explore(&game.new_initial_state(), &mut dataset)?;
        Ok(dataset)
    }

    /// Like [`generate`](Self::generate), reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Returns error if the rule engine rejects a generated action or the
    /// observer fails.
    pub fn generate_observed(
        game: &MnkGame,
        max_depth: Option<usize>,
        observer: &mut dyn ExplorationObserver,
    ) -> Result<Self> {
        let mut dataset = Self::new();
        StateExplorer::new()
            .with_max_depth(max_depth)
            .explore_observed(&game.new_initial_state(), &mut dataset, observer)?;
        Ok(dataset)
    }

    /// Append a record. Existing records are never touched.
    pub fn append(&mut self, record: StateRecord) {
        self.items.push(record);
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Mark a canonical key as visited; returns `false` if it already was.
    pub fn mark_visited(&mut self, key: String) -> bool {
        self.visited.insert(key)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StateRecord> {
        self.items.iter()
    }

    /// View over every record
    pub fn view(&self) -> StateView<'_> {
        StateView::new(&self.items)
    }

    /// Shorthand for `self.view().filter(criteria)`
    pub fn filter(&self, criteria: &[(&str, FieldValue)]) -> StateView<'_> {
        self.view().filter(criteria)
    }

    /// Shorthand for `self.view().where_by(predicate)`
    pub fn where_by<F>(&self, predicate: F) -> StateView<'_>
    where
        F: Fn(&StateRecord) -> Result<bool>,
    {
        self.view().where_by(predicate)
    }
}

impl<'a> IntoIterator for &'a StateDataset {
    type Item = &'a StateRecord;
    type IntoIter = std::slice::Iter<'a, StateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
