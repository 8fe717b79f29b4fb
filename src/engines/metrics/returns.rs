// src/engines/metrics/returns.rs

/// Summary statistics over a sequence of realized trade returns
pub struct ReturnMetrics;

impl ReturnMetrics {
    pub fn mean(returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        returns.iter().sum::<f64>() / returns.len() as f64
    }

    /// Population standard deviation (divides by N)
    pub fn std_dev(returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }

        let mean = Self::mean(returns);
        let variance = returns
            .iter()
            .map(|&r| (r - mean).powi(2))
            .sum::<f64>()
            / returns.len() as f64;

        variance.sqrt()
    }

    /// Fraction of strictly positive returns, 0.0 to 1.0
    pub fn win_rate(returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        returns.iter().filter(|&&r| r > 0.0).count() as f64 / returns.len() as f64
    }

    /// Mean over population standard deviation; 0 when the deviation is 0
    pub fn sharpe_ratio(returns: &[f64]) -> f64 {
        let std_dev = Self::std_dev(returns);
        if std_dev == 0.0 {
            return 0.0;
        }
        Self::mean(returns) / std_dev
    }
}
