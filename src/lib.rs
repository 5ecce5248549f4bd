//! Generalized M,N,K games: rule engine, exhaustive state enumeration and
//! policy comparison
//!
//! This crate provides:
//! - An M,N,K rule engine with per-player win lengths, line directions,
//!   misère scoring and multi-stone opening turns
//! - Exhaustive, deduplicated enumeration of reachable states into an
//!   annotated dataset
//! - Views, predicates and samplers for drawing evaluation states
//! - Heuristic and search policies, opponent inference and agreement metrics
//!
//! # Example
//!
//! ```
//! use mnk_lab::{dataset::StateDataset, mnk::MnkGame};
//!
//! let dataset = StateDataset::generate(&MnkGame::tic_tac_toe(), None)?;
//! assert_eq!(dataset.len(), 5478);
//! # Ok::<(), mnk_lab::Error>(())
//! ```

pub mod cli;
pub mod comparison;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod mnk;
pub mod policies;
pub mod ports;

pub use dataset::{StateDataset, StateRecord, StateView};
pub use error::{Error, Result};
pub use mnk::{GameState, MnkGame, Player};
