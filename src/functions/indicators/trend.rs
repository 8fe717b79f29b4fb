use anyhow::Result;
use crate::data::Bar;
use crate::functions::traits::{ensure_period, Indicator};

// --- EMA (Exponential Moving Average) of close ---
pub struct EMA {
    pub period: usize,
}

impl EMA {
    /// EMA over an arbitrary series, seeded with the first value
    pub fn over(&self, values: &[f64]) -> Result<Vec<f64>> {
        ensure_period(self.alias(), self.period)?;

        let alpha = 2.0 / (self.period as f64 + 1.0);
        let mut out = Vec::with_capacity(values.len());
        let mut prev: Option<f64> = None;

        for &value in values {
            let ema = match prev {
                Some(p) => alpha * value + (1.0 - alpha) * p,
                None => value,
            };
            out.push(ema);
            prev = Some(ema);
        }

        Ok(out)
    }
}

impl Indicator for EMA {
    fn alias(&self) -> &'static str { "EMA" }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.over(&closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_constant_series() {
        let ema = EMA { period: 5 }.over(&[10.0; 8]).unwrap();
        assert!(ema.iter().all(|&v| (v - 10.0).abs() < 1e-12));
    }

    #[test]
    fn test_ema_step() {
        let ema = EMA { period: 3 }.over(&[0.0, 4.0]).unwrap();
        // alpha = 0.5
        assert_eq!(ema, vec![0.0, 2.0]);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(EMA { period: 0 }.over(&[1.0]).is_err());
    }
}
