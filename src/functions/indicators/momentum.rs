use anyhow::Result;
use crate::data::Bar;
use crate::functions::traits::{ensure_period, Indicator};

// --- RSI (Relative Strength Index), Wilder smoothing ---
pub struct RSI {
    pub period: usize,
}

impl Indicator for RSI {
    fn alias(&self) -> &'static str { "RSI" }

    /// 50 until `period` price changes are available
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>> {
        ensure_period(self.alias(), self.period)?;

        let period = self.period as f64;
        let mut out = vec![50.0; bars.len()];
        let mut sum_gain = 0.0;
        let mut sum_loss = 0.0;
        let mut avg: Option<(f64, f64)> = None;

        for i in 1..bars.len() {
            let change = bars[i].close - bars[i - 1].close;
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);

            let (avg_gain, avg_loss) = match avg {
                Some((g, l)) => ((g * (period - 1.0) + gain) / period, (l * (period - 1.0) + loss) / period),
                None => {
                    sum_gain += gain;
                    sum_loss += loss;
                    if i < self.period {
                        continue;
                    }
                    (sum_gain / period, sum_loss / period)
                }
            };
            avg = Some((avg_gain, avg_loss));

            out[i] = if avg_loss == 0.0 {
                if avg_gain == 0.0 { 50.0 } else { 100.0 }
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - (100.0 / (1.0 + rs))
            };
        }

        Ok(out)
    }
}
