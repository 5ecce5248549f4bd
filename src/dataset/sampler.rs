//! Samplers assembled from configuration

use rand::Rng;
use tracing::{info, warn};

use super::{Predicate, StateDataset, StateRecord, StateView};
use crate::{Result, config::SamplerConfig, mnk::MnkGame};

/// Enumerated dataset plus the predicates and sample size that select
/// evaluation states from it.
#[derive(Debug, Clone)]
pub struct ConfiguredSampler {
    dataset: StateDataset,
    predicates: Vec<Predicate>,
    /// Dataset positions passing every applied predicate
    selected: Vec<usize>,
    k: usize,
    replace: bool,
}

impl ConfiguredSampler {
    pub fn dataset(&self) -> &StateDataset {
        &self.dataset
    }

    /// Predicates that were applied; rejected ones are not listed
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn replace(&self) -> bool {
        self.replace
    }

    /// Records passing every applied predicate
    pub fn view(&self) -> StateView<'_> {
        let records = self.dataset.records();
        StateView::new(self.selected.iter().filter_map(|&i| records.get(i)))
    }

    /// Number of records the sampler draws from
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Draw `k` records with the configured replacement mode
    pub fn samples<R>(&self, rng: &mut R) -> Vec<&StateRecord>
    where
        R: Rng + ?Sized,
    {
        self.view().sample(self.k, self.replace, rng)
    }
}

/// Enumerate `game` and narrow the result with the configured predicates.
///
/// Predicates that fail to parse or fault during evaluation are skipped with
/// a warning. When sampling without replacement asks for more records than
/// remain, the sampler switches to sampling with replacement.
///
/// # Errors
///
/// Returns error if enumeration fails.
pub fn build_sampler(config: &SamplerConfig, game: &MnkGame) -> Result<ConfiguredSampler> {
    let dataset = StateDataset::generate(game, config.max_depth)?;

    let mut predicates = Vec::with_capacity(config.predicates.len());
    let mut view = dataset.view();
    for expr in &config.predicates {
        let predicate = match Predicate::parse(expr) {
            Ok(p) => p,
            Err(e) => {
                warn!(predicate = %expr, error = %e, "skipping predicate that does not parse");
                continue;
            }
        };

        let narrowed = view.try_where(|record| predicate.evaluate(record));
        match narrowed {
            Ok(narrowed) => {
                info!(predicate = %predicate, before = view.len(), after = narrowed.len(), "applied predicate");
                view = narrowed;
                predicates.push(predicate);
            }
            Err(e) => {
                warn!(predicate = %expr, error = %e, "skipping predicate that failed to evaluate");
            }
        }
    }
    let selected = positions(&dataset, &view);

    let mut sampler = ConfiguredSampler {
        dataset,
        predicates,
        selected,
        k: config.sample.k,
        replace: config.sample.replace,
    };

    let available = sampler.len();
    if !sampler.replace && sampler.k > available {
        warn!(
            requested = sampler.k,
            available, "not enough states to sample without replacement; sampling with replacement"
        );
        sampler.replace = true;
    }

    info!(
        states = sampler.dataset.len(),
        candidates = available,
        k = sampler.k,
        replace = sampler.replace,
        "sampler ready"
    );
    Ok(sampler)
}

/// Dataset positions of the records in `view`, which keeps dataset order.
fn positions(dataset: &StateDataset, view: &StateView<'_>) -> Vec<usize> {
    let mut kept = view.iter().peekable();
    dataset
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            kept.next_if(|k| std::ptr::eq(*k, record)).map(|_| i)
        })
        .collect()
}
