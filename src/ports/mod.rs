//! Ports (trait boundaries) for collaborators of the core.
//!
//! The enumeration core only knows these traits; progress reporting and the
//! concrete policies are adapters implementing them.

pub mod observer;
pub mod policy;

pub use observer::{ExplorationObserver, NoopObserver};
pub use policy::Policy;
