use crate::config::FitnessConfig;
use crate::engines::evaluation::simulator::DecisionSimulator;
use crate::engines::generation::vector::{ParameterVector, VectorMetrics};
use crate::engines::metrics::ReturnMetrics;
use crate::error::Result;
use log::debug;

/// Scores parameter vectors from their own simulated trades.
///
/// `fitness = w_sharpe * sharpe + w_win * win_rate - penalty * complexity`
pub struct FitnessEvaluator {
    config: FitnessConfig,
    horizon_bars: usize,
}

impl FitnessEvaluator {
    pub fn new(config: FitnessConfig, horizon_bars: usize) -> Self {
        Self {
            config,
            horizon_bars,
        }
    }

    /// Metrics for a sequence of returns produced by `vector`.
    ///
    /// Fewer than `min_trades` returns yields a neutral individual instead of
    /// an error.
    pub fn score(&self, vector: &ParameterVector, returns: &[f64]) -> VectorMetrics {
        let complexity = vector.complexity();

        if returns.len() < self.config.min_trades {
            return VectorMetrics {
                fitness: 0.0,
                win_rate: self.config.neutral_win_rate,
                sharpe_ratio: 0.0,
                trade_count: 0,
                complexity,
            };
        }

        let sharpe_ratio = ReturnMetrics::sharpe_ratio(returns);
        let win_rate = ReturnMetrics::win_rate(returns);
        let fitness = self.config.sharpe_weight * sharpe_ratio
            + self.config.win_rate_weight * win_rate
            - self.config.complexity_penalty * complexity as f64;

        VectorMetrics {
            fitness,
            win_rate,
            sharpe_ratio,
            trade_count: returns.len(),
            complexity,
        }
    }

    /// Run the simulator for `vector` and score the result
    pub fn evaluate<S: DecisionSimulator + ?Sized>(
        &self,
        vector: &ParameterVector,
        simulator: &S,
    ) -> Result<VectorMetrics> {
        let returns = simulator.simulate(vector, self.horizon_bars)?;
        let metrics = self.score(vector, &returns);

        debug!(
            "Evaluated vector: trades={}, win_rate={:.2}, sharpe={:.3}, complexity={}, fitness={:.4}",
            metrics.trade_count,
            metrics.win_rate,
            metrics.sharpe_ratio,
            metrics.complexity,
            metrics.fitness
        );

        Ok(metrics)
    }
}
