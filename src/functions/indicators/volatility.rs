use anyhow::Result;
use crate::data::Bar;
use crate::functions::traits::{ensure_period, true_range, Indicator};

// --- ATR (Average True Range), Wilder smoothing ---
pub struct ATR {
    pub period: usize,
}

impl Indicator for ATR {
    fn alias(&self) -> &'static str { "ATR" }

    /// 0 until `period` true ranges are available
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>> {
        ensure_period(self.alias(), self.period)?;

        let period = self.period as f64;
        let mut out = vec![0.0; bars.len()];
        let mut seed = 0.0;
        let mut atr: Option<f64> = None;

        for i in 1..bars.len() {
            let tr = true_range(&bars[i], bars[i - 1].close);
            let value = match atr {
                Some(prev) => (prev * (period - 1.0) + tr) / period,
                None => {
                    seed += tr;
                    if i < self.period {
                        continue;
                    }
                    seed / period
                }
            };
            atr = Some(value);
            out[i] = value;
        }

        Ok(out)
    }
}

// --- ADX (Average Directional Index) ---
pub struct ADX {
    pub period: usize,
}

impl Indicator for ADX {
    fn alias(&self) -> &'static str { "ADX" }

    /// 0 until `period` directional readings have been averaged
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>> {
        ensure_period(self.alias(), self.period)?;

        let period = self.period as f64;
        let mut out = vec![0.0; bars.len()];
        let (mut p_dm_smooth, mut m_dm_smooth, mut tr_smooth) = (0.0, 0.0, 0.0);
        let mut dx_seed = 0.0;
        let mut dx_count = 0usize;
        let mut adx: Option<f64> = None;

        for i in 1..bars.len() {
            let (bar, prev) = (&bars[i], &bars[i - 1]);
            let up_move = bar.high - prev.high;
            let down_move = prev.low - bar.low;

            let p_dm = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
            let m_dm = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
            let tr = true_range(bar, prev.close);

            if i <= self.period {
                p_dm_smooth += p_dm;
                m_dm_smooth += m_dm;
                tr_smooth += tr;
                if i < self.period {
                    continue;
                }
            } else {
                p_dm_smooth = p_dm_smooth - p_dm_smooth / period + p_dm;
                m_dm_smooth = m_dm_smooth - m_dm_smooth / period + m_dm;
                tr_smooth = tr_smooth - tr_smooth / period + tr;
            }

            let (p_di, m_di) = if tr_smooth > 0.0 {
                (100.0 * p_dm_smooth / tr_smooth, 100.0 * m_dm_smooth / tr_smooth)
            } else {
                (0.0, 0.0)
            };
            let dx = if p_di + m_di > 0.0 {
                100.0 * (p_di - m_di).abs() / (p_di + m_di)
            } else {
                0.0
            };

            let value = match adx {
                Some(prev_adx) => (prev_adx * (period - 1.0) + dx) / period,
                None => {
                    dx_seed += dx;
                    dx_count += 1;
                    if dx_count < self.period {
                        continue;
                    }
                    dx_seed / period
                }
            };
            adx = Some(value);
            out[i] = value;
        }

        Ok(out)
    }
}
