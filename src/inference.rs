//! Opponent inference: which candidate policy best explains observed play?

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::InferenceConfig,
    mnk::GameState,
    policies::{LoadedPolicy, load_policies},
};

/// Floor applied to the likelihood of unobserved or zero-probability actions
pub const LIKELIHOOD_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMethod {
    /// Softmax over summed log-likelihoods
    #[default]
    LogLikelihood,
    /// Share of steps where the action was among the candidate's best actions
    AgreementCounting,
}

impl fmt::Display for InferenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InferenceMethod::LogLikelihood => "log_likelihood",
            InferenceMethod::AgreementCounting => "agreement_counting",
        })
    }
}

impl FromStr for InferenceMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log_likelihood" => Ok(InferenceMethod::LogLikelihood),
            "agreement_counting" => Ok(InferenceMethod::AgreementCounting),
            other => Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "unknown inference method '{other}' (expected log_likelihood or agreement_counting)"
                ),
            }),
        }
    }
}

/// Posterior over candidate policies given a state/action history
#[derive(Debug)]
pub struct OpponentInference {
    candidates: Vec<LoadedPolicy>,
    method: InferenceMethod,
}

impl OpponentInference {
    pub fn new(candidates: Vec<LoadedPolicy>, method: InferenceMethod) -> Self {
        Self { candidates, method }
    }

    pub fn method(&self) -> InferenceMethod {
        self.method
    }

    pub fn candidates(&self) -> &[LoadedPolicy] {
        &self.candidates
    }

    /// Probability of each candidate id; sums to 1 when there are candidates.
    pub fn calculate_likelihoods(&self, history: &[(GameState, usize)]) -> BTreeMap<String, f64> {
        match self.method {
            InferenceMethod::LogLikelihood => self.log_likelihoods(history),
            InferenceMethod::AgreementCounting => self.agreement_counting(history),
        }
    }

    fn log_likelihoods(&self, history: &[(GameState, usize)]) -> BTreeMap<String, f64> {
        let scores: Vec<(String, f64)> = self
            .candidates
            .iter()
            .map(|candidate| {
                let total: f64 = history
                    .iter()
                    .map(|(state, action)| {
                        let p = candidate
                            .policy
                            .action_likelihoods(state)
                            .get(action)
                            .copied()
                            .unwrap_or(0.0);
                        p.max(LIKELIHOOD_FLOOR).ln()
                    })
                    .sum();
                debug!(candidate = %candidate.id, log_likelihood = total, "scored candidate");
                (candidate.id.clone(), total)
            })
            .collect();
        softmax(scores)
    }

    fn agreement_counting(&self, history: &[(GameState, usize)]) -> BTreeMap<String, f64> {
        let counts: Vec<(String, f64)> = self
            .candidates
            .iter()
            .map(|candidate| {
                let agreed = history
                    .iter()
                    .filter(|(state, action)| candidate.policy.best_actions(state).contains(action))
                    .count();
                (candidate.id.clone(), agreed as f64)
            })
            .collect();

        let total: f64 = counts.iter().map(|(_, c)| c).sum();
        if total == 0.0 {
            let uniform = 1.0 / counts.len().max(1) as f64;
            return counts.into_iter().map(|(id, _)| (id, uniform)).collect();
        }
        counts.into_iter().map(|(id, c)| (id, c / total)).collect()
    }
}

/// Build an inference module from its configuration block.
///
/// # Errors
///
/// Returns error if none of the candidate policies can be loaded.
pub fn load_inference(config: &InferenceConfig) -> crate::Result<OpponentInference> {
    let candidates = load_policies(&config.candidate_policies)?;
    Ok(OpponentInference::new(candidates, config.method))
}

fn softmax(scores: Vec<(String, f64)>) -> BTreeMap<String, f64> {
    let Some(max) = scores.iter().map(|&(_, s)| s).reduce(f64::max) else {
        return BTreeMap::new();
    };
    let exps: Vec<(String, f64)> = scores
        .into_iter()
        .map(|(id, s)| (id, (s - max).exp()))
        .collect();
    let total: f64 = exps.iter().map(|(_, e)| e).sum();
    exps.into_iter().map(|(id, e)| (id, e / total)).collect()
}
