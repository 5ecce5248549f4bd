//! Name-based policy construction

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{IntuitiveGamerPolicy, MinimaxPolicy, RandomPolicy};
use crate::{
    Result,
    config::{InferenceConfig, PolicyConfig},
    inference::{OpponentInference, load_inference},
    mnk::GameState,
    ports::Policy,
};

type PolicyConstructor = fn(&serde_json::Value) -> Result<Box<dyn Policy>>;

/// Registered policies by configuration name
pub const POLICY_REGISTRY: &[(&str, PolicyConstructor)] = &[
    ("random", random),
    ("intuitive_gamer", intuitive_gamer),
    ("minimax", minimax),
];

fn random(_params: &serde_json::Value) -> Result<Box<dyn Policy>> {
    Ok(Box::new(RandomPolicy::new()))
}

fn intuitive_gamer(params: &serde_json::Value) -> Result<Box<dyn Policy>> {
    Ok(Box::new(IntuitiveGamerPolicy::new(parse_params(params)?)))
}

fn minimax(params: &serde_json::Value) -> Result<Box<dyn Policy>> {
    Ok(Box::new(MinimaxPolicy::new(parse_params(params)?)))
}

/// Names accepted by [`instantiate_policy`]
pub fn policy_names() -> Vec<&'static str> {
    POLICY_REGISTRY.iter().map(|&(name, _)| name).collect()
}

/// A constructed policy together with its unique id and source config
pub struct LoadedPolicy {
    pub id: String,
    pub config: PolicyConfig,
    pub policy: Box<dyn Policy>,
    /// Opponent model from the policy's `opponent_inference` block
    pub inference: Option<OpponentInference>,
}

impl LoadedPolicy {
    /// Posterior over the attached opponent model's candidates, if any
    pub fn infer_opponent(&self, history: &[(GameState, usize)]) -> Option<BTreeMap<String, f64>> {
        self.inference
            .as_ref()
            .map(|inference| inference.calculate_likelihoods(history))
    }
}

impl std::fmt::Debug for LoadedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPolicy")
            .field("id", &self.id)
            .field("policy", &self.policy.name())
            .field("inference", &self.inference.as_ref().map(|i| i.method()))
            .finish()
    }
}

/// Construct a single policy.
///
/// # Errors
///
/// Returns [`crate::Error::UnknownPolicy`] for unregistered names and a
/// serialization error if the parameters do not fit the policy.
pub fn instantiate_policy(config: &PolicyConfig) -> Result<Box<dyn Policy>> {
    let (parameters, _) = config.split_inference()?;
    construct(&config.name, &parameters)
}

fn construct(name: &str, parameters: &serde_json::Value) -> Result<Box<dyn Policy>> {
    let constructor = POLICY_REGISTRY
        .iter()
        .find(|&&(registered, _)| registered == name)
        .map(|&(_, constructor)| constructor)
        .ok_or_else(|| crate::Error::UnknownPolicy {
            name: name.to_string(),
            expected: policy_names().join(", "),
        })?;
    constructor(parameters)
}

/// Construct every configured policy, skipping the ones that fail.
///
/// Ids are the policy names; a repeated name at position `i` becomes
/// `"{name}_{i}"`. Once every policy exists, enabled `opponent_inference`
/// blocks are loaded and attached to policies that accept them.
///
/// # Errors
///
/// Returns error if no policy could be constructed.
pub fn load_policies(configs: &[PolicyConfig]) -> Result<Vec<LoadedPolicy>> {
    let mut loaded: Vec<LoadedPolicy> = Vec::with_capacity(configs.len());
    let mut pending: Vec<(usize, InferenceConfig)> = Vec::new();

    for (i, config) in configs.iter().enumerate() {
        let built = config
            .split_inference()
            .and_then(|(parameters, inference)| Ok((construct(&config.name, &parameters)?, inference)));
        let (policy, inference) = match built {
            Ok(built) => built,
            Err(e) => {
                warn!(policy = %config.name, error = %e, "failed to load policy");
                continue;
            }
        };
        let id = if loaded.iter().any(|p| p.id == config.name) {
            format!("{}_{i}", config.name)
        } else {
            config.name.clone()
        };
        info!(id = %id, policy = policy.name(), "loaded policy");
        if let Some(inference) = inference {
            pending.push((loaded.len(), inference));
        }
        loaded.push(LoadedPolicy {
            id,
            config: config.clone(),
            policy,
            inference: None,
        });
    }

    if loaded.is_empty() {
        return Err(crate::Error::InvalidConfiguration {
            message: "no policies were successfully loaded".to_string(),
        });
    }

    for (index, inference) in pending {
        let Some(target) = loaded.get_mut(index) else {
            continue;
        };
        if !inference.enabled {
            debug!(id = %target.id, "opponent inference disabled");
            continue;
        }
        if !target.policy.accepts_opponent_inference() {
            warn!(id = %target.id, "policy does not support opponent inference");
            continue;
        }
        match load_inference(&inference) {
            Ok(model) => {
                info!(id = %target.id, method = %model.method(), candidates = model.candidates().len(), "opponent inference enabled");
                target.inference = Some(model);
            }
            Err(e) => {
                warn!(id = %target.id, error = %e, "failed to set up opponent inference");
            }
        }
    }

    Ok(loaded)
}

/// Deserialize policy parameters; a missing block means defaults
fn parse_params<T: DeserializeOwned + Default>(value: &serde_json::Value) -> Result<T> {
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value.clone())?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_instantiate_known_policies() {
        for name in policy_names() {
            let policy = instantiate_policy(&PolicyConfig::new(name)).unwrap();
            assert_eq!(policy.name(), name);
        }
    }

    #[test]
    fn test_unknown_policy() {
        let err = instantiate_policy(&PolicyConfig::new("mcts")).err().expect("expected an error");
        match err {
            crate::Error::UnknownPolicy { name, expected } => {
                assert_eq!(name, "mcts");
                assert!(expected.contains("minimax"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parameters_are_passed_through() {
        let config =
            PolicyConfig::new("intuitive_gamer").with_parameters(json!({"beta": 0.5, "w_aux": 0.0}));
        assert!(instantiate_policy(&config).is_ok());

        let bad = PolicyConfig::new("minimax").with_parameters(json!({"max_depth": "deep"}));
        assert!(matches!(
            instantiate_policy(&bad).err().expect("expected an error"),
            crate::Error::Serialization(_)
        ));
    }

    #[test]
    fn test_duplicate_names_get_suffix_and_failures_are_skipped() {
        let configs = vec![
            PolicyConfig::new("random"),
            PolicyConfig::new("nope"),
            PolicyConfig::new("random"),
            PolicyConfig::new("minimax"),
        ];
        let loaded = load_policies(&configs).unwrap();
        let ids: Vec<&str> = loaded.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["random", "random_2", "minimax"]);
    }

    #[test]
    fn test_opponent_inference_is_attached_in_second_stage() {
        let block = json!({
            "enabled": true,
            "method": "agreement_counting",
            "candidate_policies": [{"name": "random"}, {"name": "minimax"}]
        });
        let configs = vec![
            PolicyConfig::new("intuitive_gamer")
                .with_parameters(json!({"beta": 2.0, "opponent_inference": block})),
            PolicyConfig::new("random").with_parameters(json!({"opponent_inference": block})),
            PolicyConfig::new("minimax").with_parameters(json!({
                "opponent_inference": {"enabled": false, "candidate_policies": [{"name": "random"}]}
            })),
        ];
        let loaded = load_policies(&configs).unwrap();
        assert_eq!(loaded.len(), 3);

        let model = loaded[0].inference.as_ref().unwrap();
        assert_eq!(model.method(), crate::inference::InferenceMethod::AgreementCounting);
        assert_eq!(model.candidates().len(), 2);
        // Random does not reason about its opponent; disabled blocks are ignored
        assert!(loaded[1].inference.is_none());
        assert!(loaded[2].inference.is_none());

        let posterior = loaded[0].infer_opponent(&[]).unwrap();
        assert_eq!(posterior.len(), 2);
        assert!(loaded[1].infer_opponent(&[]).is_none());
    }

    #[test]
    fn test_failed_inference_setup_keeps_policy() {
        let config = PolicyConfig::new("minimax").with_parameters(json!({
            "opponent_inference": {"enabled": true, "candidate_policies": [{"name": "nope"}]}
        }));
        let loaded = load_policies(&[config]).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].inference.is_none());
    }

    #[test]
    fn test_all_failing_is_an_error() {
        let err = load_policies(&[PolicyConfig::new("nope")]).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfiguration { .. }));
    }
}
