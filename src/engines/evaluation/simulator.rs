use crate::engines::generation::vector::ParameterVector;
use crate::error::Result;

/// Replays a bounded historical window for one parameter vector.
///
/// Implementations must be pure: the same vector over the same data slice
/// always yields the same returns, oldest first. Fitness values of different
/// individuals are only comparable under that guarantee. The `Sync` bound lets
/// the population manager evaluate individuals in parallel.
pub trait DecisionSimulator: Sync {
    /// One realized percentage return per closed synthetic position
    fn simulate(&self, vector: &ParameterVector, horizon_bars: usize) -> Result<Vec<f64>>;
}

impl<F> DecisionSimulator for F
where
    F: Fn(&ParameterVector, usize) -> Result<Vec<f64>> + Sync,
{
    fn simulate(&self, vector: &ParameterVector, horizon_bars: usize) -> Result<Vec<f64>> {
        self(vector, horizon_bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genes::Gene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_closure_simulator() {
        let simulator = |vector: &ParameterVector, horizon: usize| -> Result<Vec<f64>> {
            Ok(vec![vector.gene(Gene::RiskTpAtr); horizon.min(3)])
        };

        let mut rng = StdRng::seed_from_u64(9);
        let vector = ParameterVector::random(&mut rng);
        let returns = simulator.simulate(&vector, 100).unwrap();

        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0], vector.gene(Gene::RiskTpAtr));
    }
}
