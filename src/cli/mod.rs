//! CLI infrastructure for the mnk-lab toolkit
//!
//! This module provides the command-line interface for enumerating game
//! states, sampling them through predicates and comparing policies.

pub mod commands;
pub mod output;
