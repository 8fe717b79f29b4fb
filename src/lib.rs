//! Regime-scoped genetic optimization of trading-strategy parameters.
//!
//! [`engines::generation::PopulationManager`] keeps one population of
//! 40-gene parameter vectors per market regime and evolves them one
//! generation at a time, scoring each vector on its own simulated trades.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use error::{EvobiasError, Result};
