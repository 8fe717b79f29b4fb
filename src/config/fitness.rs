use super::traits::{invalid, ConfigSection};
use crate::error::EvobiasError;
use serde::{Deserialize, Serialize};

/// Fitness policy weights.
///
/// The penalty weight is an observed constant, not a derived one; retune it
/// when moving to another instrument or timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub sharpe_weight: f64,
    pub win_rate_weight: f64,
    pub complexity_penalty: f64,
    /// Fewer simulated trades than this gives a neutral individual
    pub min_trades: usize,
    pub neutral_win_rate: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            sharpe_weight: 0.6,
            win_rate_weight: 0.4,
            complexity_penalty: 0.05,
            min_trades: 2,
            neutral_win_rate: 0.5,
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), EvobiasError> {
        if self.min_trades < 2 {
            return Err(invalid::<Self>("At least 2 trades are needed for a Sharpe ratio"));
        }
        if self.complexity_penalty < 0.0 {
            return Err(invalid::<Self>("Complexity penalty must not be negative"));
        }
        if !self.sharpe_weight.is_finite() || !self.win_rate_weight.is_finite() {
            return Err(invalid::<Self>("Fitness weights must be finite"));
        }
        Ok(())
    }
}
