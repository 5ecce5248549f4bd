//! Policy comparison over sampled states
//!
//! Two agreement measures are computed from each policy's argmax set:
//!
//! - pairwise: for each ordered pair, the share of states where the two
//!   argmax sets intersect
//! - max-action: for each policy, the share of states where its argmax set
//!   contains the plurality action of all policies
//!
//! Terminal states have no actions and are left out of both denominators.

use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    config::ExperimentConfig,
    dataset::{ConfiguredSampler, build_sampler},
    mnk::GameState,
    policies::{LoadedPolicy, load_policies},
};

/// Square agreement matrix indexed like `policies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementMatrix {
    pub policies: Vec<String>,
    pub values: Vec<Vec<f64>>,
    /// States that contributed (non-terminal)
    pub states: usize,
}

impl AgreementMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.policies.iter().position(|p| p == a)?;
        let j = self.policies.iter().position(|p| p == b)?;
        Some(self.values[i][j])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAgreement {
    pub policy: String,
    pub agreement: f64,
}

/// Per-policy agreement with the plurality action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxActionAgreement {
    pub agreements: Vec<PolicyAgreement>,
    pub states: usize,
}

impl MaxActionAgreement {
    pub fn get(&self, policy: &str) -> Option<f64> {
        self.agreements
            .iter()
            .find(|a| a.policy == policy)
            .map(|a| a.agreement)
    }
}

/// Argmax sets of every policy on every non-terminal state
fn argmax_table(policies: &[LoadedPolicy], states: &[&GameState]) -> Vec<Vec<BTreeSet<usize>>> {
    states
        .iter()
        .filter(|state| !state.is_terminal())
        .map(|state| {
            policies
                .iter()
                .map(|p| p.policy.best_actions(state).into_iter().collect())
                .collect()
        })
        .collect()
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { count as f64 / total as f64 }
}

/// Share of states on which each pair of policies shares a best action
pub fn pairwise_agreement(policies: &[LoadedPolicy], states: &[&GameState]) -> AgreementMatrix {
    let table = argmax_table(policies, states);
    let n = policies.len();
    let mut values = vec![vec![0.0; n]; n];

    for (i, row) in values.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            let agreed = table
                .iter()
                .filter(|sets| !sets[i].is_disjoint(&sets[j]))
                .count();
            *value = share(agreed, table.len());
        }
    }

    AgreementMatrix {
        policies: policies.iter().map(|p| p.id.clone()).collect(),
        values,
        states: table.len(),
    }
}

/// Most-voted action; ties go to the lowest action index
fn plurality_action(sets: &[BTreeSet<usize>]) -> Option<usize> {
    let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
    for &action in sets.iter().flatten() {
        *votes.entry(action).or_default() += 1;
    }
    let best = votes.values().copied().max()?;
    votes
        .into_iter()
        .find(|&(_, count)| count == best)
        .map(|(action, _)| action)
}

/// Share of states on which each policy backs the plurality action
pub fn max_action_agreement(policies: &[LoadedPolicy], states: &[&GameState]) -> MaxActionAgreement {
    let table = argmax_table(policies, states);
    let plurality: Vec<Option<usize>> = table.iter().map(|sets| plurality_action(sets)).collect();

    let agreements = policies
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let agreed = table
                .iter()
                .zip(&plurality)
                .filter(|(sets, top)| top.is_some_and(|a| sets[i].contains(&a)))
                .count();
            PolicyAgreement {
                policy: p.id.clone(),
                agreement: share(agreed, table.len()),
            }
        })
        .collect();

    MaxActionAgreement {
        agreements,
        states: table.len(),
    }
}

/// Everything `compare` prints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub experiment_name: String,
    pub description: String,
    /// Records left after predicates
    pub candidates: usize,
    pub sampled: usize,
    pub max_action: MaxActionAgreement,
    pub pairwise: AgreementMatrix,
    /// Candidate ids of each policy's attached opponent model
    #[serde(default)]
    pub opponent_models: BTreeMap<String, Vec<String>>,
}

/// Policies plus the sampler that feeds them states
pub struct Experiment {
    name: String,
    description: String,
    policies: Vec<LoadedPolicy>,
    sampler: ConfiguredSampler,
}

impl Experiment {
    pub fn new(
        name: impl Into<String>,
        policies: Vec<LoadedPolicy>,
        sampler: ConfiguredSampler,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            policies,
            sampler,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build game, policies and sampler from an experiment config.
    ///
    /// # Errors
    ///
    /// Returns error if the game is invalid, no policy loads or
    /// enumeration fails.
    pub fn from_config(config: &ExperimentConfig) -> Result<Self> {
        let game = config.game.build()?;
        let policies = load_policies(&config.policies)?;
        let sampler = build_sampler(&config.sampler, &game)?;
        Ok(Self::new(config.experiment_name.clone(), policies, sampler)
            .with_description(config.description.clone()))
    }

    pub fn policies(&self) -> &[LoadedPolicy] {
        &self.policies
    }

    pub fn sampler(&self) -> &ConfiguredSampler {
        &self.sampler
    }

    /// Draw states and compute both agreement measures
    pub fn run<R>(&self, rng: &mut R) -> ExperimentReport
    where
        R: Rng + ?Sized,
    {
        let samples = self.sampler.samples(rng);
        let states: Vec<&GameState> = samples.iter().map(|r| &r.state).collect();
        info!(experiment = %self.name, states = states.len(), policies = self.policies.len(), "running comparison");

        ExperimentReport {
            experiment_name: self.name.clone(),
            description: self.description.clone(),
            candidates: self.sampler.len(),
            sampled: states.len(),
            max_action: max_action_agreement(&self.policies, &states),
            pairwise: pairwise_agreement(&self.policies, &states),
            opponent_models: self
                .policies
                .iter()
                .filter_map(|p| {
                    let model = p.inference.as_ref()?;
                    Some((p.id.clone(), model.candidates().iter().map(|c| c.id.clone()).collect()))
                })
                .collect(),
        }
    }

    /// [`run`](Self::run) with a seeded generator, or OS entropy without a seed
    pub fn run_seeded(&self, seed: Option<u64>) -> ExperimentReport {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run(&mut rng)
    }
}
