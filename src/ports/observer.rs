//! Observer port - abstraction for watching a state enumeration
//!
//! Enumeration of a large board can run for a long time. Observers receive
//! the records as they are appended, so progress reporting or ad-hoc
//! statistics can be attached without touching the explorer.

use crate::{Result, dataset::StateRecord};

/// Observer trait for monitoring exhaustive state enumeration
///
/// # Event Sequence
///
/// 1. `on_exploration_start()` - once, before the root is visited
/// 2. `on_state_recorded(record)` - once per newly recorded state, in
///    insertion order
/// 3. `on_exploration_end(total)` - once, with the number of records added
///
/// # Examples
///
/// ```no_run
/// use mnk_lab::{dataset::StateRecord, ports::ExplorationObserver};
///
/// struct TerminalCounter {
///     terminals: usize,
/// }
///
/// impl ExplorationObserver for TerminalCounter {
///     fn on_state_recorded(&mut self, record: &StateRecord) -> mnk_lab::Result<()> {
///         if record.state.is_terminal() {
///             self.terminals += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait ExplorationObserver {
    /// Called before the first state is visited.
    fn on_exploration_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after a state has been appended to the dataset.
    fn on_state_recorded(&mut self, _record: &StateRecord) -> Result<()> {
        Ok(())
    }

    /// Called once the traversal has finished.
    fn on_exploration_end(&mut self, _total: usize) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExplorationObserver for NoopObserver {}
