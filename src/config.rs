//! Serde-backed configuration descriptors.
//!
//! Descriptors mirror the experiment files consumed by the CLI:
//!
//! ```json
//! {
//!   "name": "mnk_game",
//!   "parameters": {
//!     "m": 3, "n": 3, "k": 3,
//!     "rules": {
//!       "opening_moves": { "1": 2 },
//!       "misere": false,
//!       "allowed_directions": { "0": ["h", "v"] },
//!       "p1_extra_k": 0
//!     }
//!   }
//! }
//! ```
//!
//! Every field except `name` is optional.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{
    inference::InferenceMethod,
    mnk::{BoardRules, Direction, MnkGame, Player},
};

/// Name under which the M,N,K engine is registered
pub const MNK_GAME_NAME: &str = "mnk_game";

/// Game descriptor: `{ name, parameters }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameters: GameParameters,
}

/// Board size and rules of an M,N,K game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParameters {
    /// Rows
    pub m: usize,
    /// Columns
    pub n: usize,
    /// Base win length
    pub k: usize,
    pub rules: RulesDescriptor,
}

impl Default for GameParameters {
    fn default() -> Self {
        Self {
            m: 3,
            n: 3,
            k: 3,
            rules: RulesDescriptor::default(),
        }
    }
}

/// Optional rule overrides; player-keyed maps use `"0"` and `"1"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesDescriptor {
    pub opening_moves: BTreeMap<usize, usize>,
    pub misere: bool,
    pub allowed_directions: BTreeMap<usize, Vec<String>>,
    pub p0_extra_k: i64,
    pub p1_extra_k: i64,
}

impl RulesDescriptor {
    /// Convert to typed rules with base win length `k`.
    ///
    /// Unknown direction keys are dropped with a warning; entries for player
    /// ids other than 0 and 1 are ignored the same way.
    pub fn to_rules(&self, k: usize) -> BoardRules {
        let mut rules = BoardRules::new(k)
            .with_misere(self.misere)
            .with_extra_win_length(Player::X, self.p0_extra_k)
            .with_extra_win_length(Player::O, self.p1_extra_k);

        for (&id, &moves) in &self.opening_moves {
            match Player::from_index(id) {
                Some(player) => rules = rules.with_opening_moves(player, moves),
                None => warn!(player = id, "ignoring opening moves for unknown player"),
            }
        }

        for (&id, keys) in &self.allowed_directions {
            let Some(player) = Player::from_index(id) else {
                warn!(player = id, "ignoring directions for unknown player");
                continue;
            };
            let directions: Vec<Direction> = keys
                .iter()
                .filter_map(|key| match key.parse::<Direction>() {
                    Ok(direction) => Some(direction),
                    Err(e) => {
                        warn!(player = id, error = %e, "dropping unknown direction");
                        None
                    }
                })
                .collect();
            rules = rules.with_directions(player, directions);
        }

        rules
    }
}

impl GameDescriptor {
    /// Descriptor for an M,N,K game with default rules
    pub fn mnk(m: usize, n: usize, k: usize) -> Self {
        GameDescriptor {
            name: MNK_GAME_NAME.to_string(),
            parameters: GameParameters {
                m,
                n,
                k,
                rules: RulesDescriptor::default(),
            },
        }
    }

    /// Build the described game.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown game name or invalid rule parameters.
    pub fn build(&self) -> crate::Result<MnkGame> {
        if self.name != MNK_GAME_NAME {
            return Err(crate::Error::UnknownGame {
                name: self.name.clone(),
            });
        }
        let params = &self.parameters;
        MnkGame::new(params.m, params.n, params.rules.to_rules(params.k))
    }
}

/// Sample size and replacement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub k: usize,
    pub replace: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { k: 1, replace: true }
    }
}

/// How evaluation states are drawn from the enumerated dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Depth cutoff for enumeration, in plies
    pub max_depth: Option<usize>,
    /// Predicate expressions applied in order
    pub predicates: Vec<String>,
    pub sample: SampleConfig,
}

impl SamplerConfig {
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_sample(mut self, k: usize, replace: bool) -> Self {
        self.sample = SampleConfig { k, replace };
        self
    }
}

/// Policy name plus free-form parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub name: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl PolicyConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: serde_json::Value::Null,
        }
    }

    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Split off the `opponent_inference` block from the parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the block is present but malformed.
    pub fn split_inference(&self) -> crate::Result<(serde_json::Value, Option<InferenceConfig>)> {
        let mut parameters = self.parameters.clone();
        let block = parameters
            .as_object_mut()
            .and_then(|map| map.remove(OPPONENT_INFERENCE_KEY));
        let inference = block.map(serde_json::from_value).transpose()?;
        Ok((parameters, inference))
    }
}

/// Parameter key holding a policy's [`InferenceConfig`]
pub const OPPONENT_INFERENCE_KEY: &str = "opponent_inference";

/// Opponent model attached to a policy, e.g.
/// `{"enabled": true, "method": "agreement_counting", "candidate_policies": [{"name": "random"}]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub enabled: bool,
    pub method: InferenceMethod,
    pub candidate_policies: Vec<PolicyConfig>,
}

/// Complete policy-comparison experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub experiment_name: String,
    #[serde(default)]
    pub description: String,
    pub game: GameDescriptor,
    pub policies: Vec<PolicyConfig>,
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Seed for sampling; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Read and deserialize a JSON file.
///
/// # Errors
///
/// Returns error if the file cannot be read or does not match `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> crate::Result<T> {
    let text = fs::read_to_string(path).map_err(|source| crate::Error::Io {
        operation: format!("read config '{}'", path.display()),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
