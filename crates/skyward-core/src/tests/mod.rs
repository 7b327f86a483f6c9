//! Crate-level tests that drive a full [`Game`](crate::game::Game).
//!
//! - `integration.rs`: end-to-end gameplay scenarios
//! - `determinism.rs`: identical inputs give identical runs
//! - `helpers.rs`: game construction and body lookup utilities

mod helpers;

pub use helpers::*;
