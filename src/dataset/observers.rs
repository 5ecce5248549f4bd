//! Exploration observers

use indicatif::{ProgressBar, ProgressStyle};

use super::{OutcomeLabel, StateRecord};
use crate::{Result, ports::ExplorationObserver};

/// Spinner showing how many states have been recorded so far
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    recorded: u64,
    terminals: u64,
    winning: u64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            recorded: 0,
            terminals: 0,
            winning: 0,
        }
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn terminals(&self) -> u64 {
        self.terminals
    }

    fn message(&self) -> String {
        format!("terminal:{} winning:{}", self.terminals, self.winning)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorationObserver for ProgressObserver {
    fn on_exploration_start(&mut self) -> Result<()> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} states ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?,
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_state_recorded(&mut self, record: &StateRecord) -> Result<()> {
        self.recorded += 1;
        if record.state.is_terminal() {
            self.terminals += 1;
        }
        if record.outcome == OutcomeLabel::Winning {
            self.winning += 1;
        }

        // Redrawing on every state would dominate small enumerations
        if self.recorded.is_multiple_of(1024) {
            if let Some(pb) = &self.progress_bar {
                pb.set_position(self.recorded);
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_exploration_end(&mut self, _total: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.recorded);
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::StateDataset, mnk::MnkGame};

    #[test]
    fn test_progress_observer_counts_records() {
        let mut observer = ProgressObserver::new();
        let dataset =
            StateDataset::generate_observed(&MnkGame::tic_tac_toe(), Some(4), &mut observer)
                .unwrap();
        assert_eq!(observer.recorded(), dataset.len() as u64);
        assert_eq!(observer.terminals(), 0);
    }
}
