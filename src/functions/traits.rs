use crate::data::Bar;
use anyhow::Result;

/// Base trait for the bar indicators used by the reference simulator
pub trait Indicator: Send + Sync {
    /// Alias used in logs
    fn alias(&self) -> &'static str;

    /// One output per input bar, oldest first.
    ///
    /// Values before the warm-up are neutral (see each indicator).
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>>;
}

/// Reject periods the smoothing formulas cannot handle
pub(crate) fn ensure_period(alias: &str, period: usize) -> Result<()> {
    if period == 0 {
        anyhow::bail!("{}: period must be at least 1", alias);
    }
    Ok(())
}

pub(crate) fn true_range(bar: &Bar, prev_close: f64) -> f64 {
    let tr1 = bar.high - bar.low;
    let tr2 = (bar.high - prev_close).abs();
    let tr3 = (bar.low - prev_close).abs();
    tr1.max(tr2).max(tr3)
}
