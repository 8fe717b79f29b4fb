use super::traits::{check_unit_interval, invalid, ConfigSection};
use crate::error::EvobiasError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_rate: f64,
    pub tournament_size: usize,
    pub diversity_target: f64,
    pub diversity_injection_rate: f64,
    pub horizon_bars: usize,
    pub seed: u64,
    /// Skip a generation when evaluation runs longer than this
    pub time_budget_ms: Option<u64>,
    pub evaluation_mode: EvaluationMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    Sequential,
    Parallel,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            mutation_rate: 0.15,
            crossover_rate: 0.40,
            elitism_rate: 0.20,
            tournament_size: 3,
            diversity_target: 0.50,
            diversity_injection_rate: 0.10,
            horizon_bars: 100,
            seed: 42,
            time_budget_ms: None,
            evaluation_mode: EvaluationMode::Sequential,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvobiasError> {
        if self.population_size < 4 {
            return Err(invalid::<Self>("Population size must be at least 4"));
        }
        check_unit_interval::<Self>("Mutation rate", self.mutation_rate)?;
        check_unit_interval::<Self>("Crossover rate", self.crossover_rate)?;
        check_unit_interval::<Self>("Elitism rate", self.elitism_rate)?;
        check_unit_interval::<Self>("Diversity injection rate", self.diversity_injection_rate)?;
        if self.tournament_size == 0 {
            return Err(invalid::<Self>("Tournament size must be at least 1"));
        }
        if !self.diversity_target.is_finite() || self.diversity_target < 0.0 {
            return Err(invalid::<Self>("Diversity target must be a finite, non-negative number"));
        }
        if self.time_budget_ms == Some(0) {
            return Err(invalid::<Self>("Time budget must be at least 1ms when set"));
        }
        if self.horizon_bars < 2 {
            return Err(invalid::<Self>("Simulation horizon must be at least 2 bars"));
        }
        Ok(())
    }
}
