//! Concrete policies and the name-based registry used by experiment configs
//!
//! - [`RandomPolicy`]: uniform over legal actions
//! - [`IntuitiveGamerPolicy`]: softmax-style heuristic over line utilities
//! - [`MinimaxPolicy`]: exhaustive game-theoretic search with memoisation

pub mod intuitive;
pub mod minimax;
pub mod random;
pub mod registry;

pub use intuitive::{IntuitiveGamerParams, IntuitiveGamerPolicy};
pub use minimax::{MinimaxParams, MinimaxPolicy};
pub use random::RandomPolicy;
pub use registry::{LoadedPolicy, POLICY_REGISTRY, instantiate_policy, load_policies, policy_names};
