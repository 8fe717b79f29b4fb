use super::traits::{check_unit_interval, invalid, ConfigSection};
use crate::error::EvobiasError;
use serde::{Deserialize, Serialize};

/// Consumer-side policy for when to evolve and how to apply champions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub min_regime_returns: usize,
    pub cooldown_bars: usize,
    pub returns_log_capacity: usize,
    /// Bars to wait before the first evolution attempt
    pub warmup_bars: usize,
    /// Floor applied to champion component weights
    pub min_component_weight: f64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            min_regime_returns: 5,
            cooldown_bars: 100,
            returns_log_capacity: 100,
            warmup_bars: 200,
            min_component_weight: 0.30,
        }
    }
}

impl ConfigSection for SchedulingConfig {
    fn section_name() -> &'static str {
        "scheduling"
    }

    fn validate(&self) -> Result<(), EvobiasError> {
        if self.cooldown_bars == 0 {
            return Err(invalid::<Self>("Cooldown must be at least 1 bar"));
        }
        if self.returns_log_capacity < self.min_regime_returns {
            return Err(invalid::<Self>(
                "Returns log capacity must hold at least the minimum regime returns",
            ));
        }
        check_unit_interval::<Self>("Minimum component weight", self.min_component_weight)?;
        Ok(())
    }
}
