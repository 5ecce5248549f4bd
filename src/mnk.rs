//! Generalised M,N,K board game rule engine
//!
//! An `rows x cols` board, two players, per-player win lengths and line
//! directions, optional misère scoring and multi-placement opening turns.

pub mod board;
pub mod game;
pub mod lines;
pub mod rules;
pub mod state;

pub use board::{Board, Cell, Player};
pub use game::MnkGame;
pub use lines::LineAnalyzer;
pub use rules::{BoardRules, Direction};
pub use state::{GameOutcome, GameState};
