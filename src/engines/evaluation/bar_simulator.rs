use crate::data::Bar;
use crate::engines::evaluation::simulator::DecisionSimulator;
use crate::engines::generation::genes::Gene;
use crate::engines::generation::vector::ParameterVector;
use crate::error::{EvobiasError, Result};
use crate::functions::indicators::{ADX, ATR, EMA, RSI};
use crate::functions::Indicator;
use crate::types::{Direction, ExitReason, Regime};
use serde::{Deserialize, Serialize};

/// Bars required beyond the simulated horizon
pub const MIN_EXTRA_BARS: usize = 50;
/// Bars of indicator history computed ahead of the horizon
const CONTEXT_BARS: usize = 150;

const ATR_PERIOD: usize = 14;
const ADX_PERIOD: usize = 14;
const REGIME_EMA_PERIOD: usize = 50;
const TREND_ADX: f64 = 25.0;
const RANGE_ADX: f64 = 20.0;
const MIN_CONVICTION: f64 = 0.05;
const MIN_EDGE: f64 = 0.10;

/// TREND above ADX 25, RANGE below 20, CHOPPY in between
pub fn classify_regime(adx: f64) -> Regime {
    if adx > TREND_ADX {
        Regime::Trend
    } else if adx < RANGE_ADX {
        Regime::Range
    } else {
        Regime::Choppy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedTrade {
    pub direction: Direction,
    /// Index into the simulator's bar slice
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    /// Percent return, positive when the trade made money
    pub return_pct: f64,
}

struct OpenPosition {
    direction: Direction,
    entry_index: usize,
    entry_price: f64,
    take_profit: f64,
    stop_loss: f64,
}

impl OpenPosition {
    fn close(self, exit_index: usize, exit_price: f64, exit_reason: ExitReason) -> SimulatedTrade {
        let move_pct = (exit_price - self.entry_price) / self.entry_price * 100.0;
        let return_pct = match self.direction {
            Direction::Long => move_pct,
            Direction::Short => -move_pct,
        };

        SimulatedTrade {
            direction: self.direction,
            entry_index: self.entry_index,
            exit_index,
            entry_price: self.entry_price,
            exit_price,
            exit_reason,
            return_pct,
        }
    }

    /// Take profit is checked before the stop
    fn exit_on(&self, bar: &Bar) -> Option<(f64, ExitReason)> {
        match self.direction {
            Direction::Long if bar.high >= self.take_profit => {
                Some((self.take_profit, ExitReason::TakeProfit))
            }
            Direction::Long if bar.low <= self.stop_loss => Some((self.stop_loss, ExitReason::StopLoss)),
            Direction::Short if bar.low <= self.take_profit => {
                Some((self.take_profit, ExitReason::TakeProfit))
            }
            Direction::Short if bar.high >= self.stop_loss => Some((self.stop_loss, ExitReason::StopLoss)),
            _ => None,
        }
    }
}

/// Entry-relevant genes, read once per simulation
struct EntryParams {
    st_factor: f64,
    st_period: usize,
    rsi_period: usize,
    macd_fast: usize,
    macd_slow: usize,
    tp_atr: f64,
    sl_atr: f64,
    brain_threshold: f64,
    gates: [(bool, Regime); 3],
    w_lead: f64,
    w_stack: f64,
    w_regime: f64,
    w_volume: f64,
    w_hybrid: f64,
}

impl EntryParams {
    fn from_vector(vector: &ParameterVector) -> Self {
        let period = |gene: Gene| vector.gene(gene) as usize;
        Self {
            st_factor: vector.gene(Gene::StFactor),
            st_period: period(Gene::StPeriod),
            rsi_period: period(Gene::RsiPeriod),
            macd_fast: period(Gene::MacdFast),
            macd_slow: period(Gene::MacdSlow),
            tp_atr: vector.gene(Gene::RiskTpAtr),
            sl_atr: vector.gene(Gene::RiskSlAtr),
            brain_threshold: vector.gene(Gene::BrainThreshold),
            gates: [
                (vector.gene(Gene::RegimeGateTrendOnly) > 0.5, Regime::Trend),
                (vector.gene(Gene::RegimeGateRangeOnly) > 0.5, Regime::Range),
                (vector.gene(Gene::RegimeGateChoppyOnly) > 0.5, Regime::Choppy),
            ],
            w_lead: vector.gene(Gene::WeightLead),
            w_stack: vector.gene(Gene::WeightStack),
            w_regime: vector.gene(Gene::WeightRegime),
            w_volume: vector.gene(Gene::WeightVolume),
            w_hybrid: vector.gene(Gene::WeightHybrid),
        }
    }

    fn lookback(&self) -> usize {
        self.st_period.max(self.rsi_period).max(self.macd_slow + 10)
    }

    fn max_score(&self) -> f64 {
        self.w_lead + self.w_regime + self.w_stack + self.w_volume + self.w_hybrid
    }

    /// Every enabled gate blocks the regimes other than its own
    fn blocks(&self, regime: Regime) -> bool {
        self.gates
            .iter()
            .any(|(enabled, gated)| *enabled && *gated != regime)
    }
}

/// Indicator series over the simulated window, aligned with its bars
struct IndicatorFrame {
    atr: Vec<f64>,
    atr_st: Vec<f64>,
    rsi: Vec<f64>,
    ema_fast: Vec<f64>,
    ema_slow: Vec<f64>,
    ema_regime: Vec<f64>,
    adx: Vec<f64>,
}

impl IndicatorFrame {
    fn compute(bars: &[Bar], params: &EntryParams) -> anyhow::Result<Self> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Ok(Self {
            atr: ATR { period: ATR_PERIOD }.calculate(bars)?,
            atr_st: ATR { period: params.st_period }.calculate(bars)?,
            rsi: RSI { period: params.rsi_period }.calculate(bars)?,
            ema_fast: EMA { period: params.macd_fast }.over(&closes)?,
            ema_slow: EMA { period: params.macd_slow }.over(&closes)?,
            ema_regime: EMA { period: REGIME_EMA_PERIOD }.over(&closes)?,
            adx: ADX { period: ADX_PERIOD }.calculate(bars)?,
        })
    }
}

/// Mini-backtest of a parameter vector over the most recent bars.
///
/// Signals are a reduced version of the live decision logic: a lead signal
/// from RSI and MACD, a four-vote confirmation stack, a regime vote and a
/// half-credit volume vote, weighted by the vector's component weights.
#[derive(Debug, Clone, Copy)]
pub struct BarSimulator<'a> {
    bars: &'a [Bar],
}

impl<'a> BarSimulator<'a> {
    pub fn new(bars: &'a [Bar]) -> Self {
        Self { bars }
    }

    /// Trades of `vector` over the last `horizon_bars` bars (the newest bar
    /// is excluded). Positions still open at the end close at the last
    /// simulated bar's close.
    pub fn simulate_trades(&self, vector: &ParameterVector, horizon_bars: usize) -> Result<Vec<SimulatedTrade>> {
        let n = self.bars.len();
        if horizon_bars < 2 || n < horizon_bars + MIN_EXTRA_BARS {
            return Ok(Vec::new());
        }

        let params = EntryParams::from_vector(vector);
        let offset = n.saturating_sub(horizon_bars + CONTEXT_BARS);
        let window = &self.bars[offset..];
        let frame = IndicatorFrame::compute(window, &params)
            .map_err(|e| EvobiasError::Simulation(e.to_string()))?;

        let max_score = params.max_score();
        let lookback = params.lookback();
        let first = n - horizon_bars;
        let last = n - 2;

        let mut trades = Vec::new();
        let mut position: Option<OpenPosition> = None;

        for index in first..=last {
            if index < lookback {
                continue;
            }
            let i = index - offset;
            let bar = &window[i];

            if let Some(open) = position.take() {
                match open.exit_on(bar) {
                    Some((price, reason)) => trades.push(open.close(index, price, reason)),
                    None => position = Some(open),
                }
                // no re-entry on the exit bar
                continue;
            }

            let adx = frame.adx[i];
            if params.blocks(classify_regime(adx)) || max_score <= 0.0 {
                continue;
            }

            let hl2 = (bar.high + bar.low) / 2.0;
            let st_bullish = bar.close > hl2 - params.st_factor * frame.atr_st[i];
            let rsi_bullish = frame.rsi[i] > 50.0;
            let rsi_bearish = frame.rsi[i] < 50.0;
            let macd_bullish = frame.ema_fast[i] - frame.ema_slow[i] > 0.0;
            let regime_long = bar.close > frame.ema_regime[i];
            let regime_strong = adx > TREND_ADX;

            let stack_long = [regime_long, st_bullish, rsi_bullish, macd_bullish]
                .iter()
                .filter(|&&vote| vote)
                .count();
            let stack_short = 4 - stack_long;

            let score = |lead: bool, regime: bool, stack: usize| {
                (if lead { params.w_lead } else { 0.0 })
                    + (if regime && regime_strong { params.w_regime } else { 0.0 })
                    + (if stack >= 2 { params.w_stack } else { 0.0 })
                    + params.w_volume * 0.5
            };
            let long = score(rsi_bullish && macd_bullish, regime_long, stack_long);
            let short = score(rsi_bearish && !macd_bullish, !regime_long, stack_short);

            let conviction = (long - short).abs() / max_score;
            let min_edge = max_score * MIN_EDGE;
            let direction = if long / max_score >= params.brain_threshold
                && conviction > MIN_CONVICTION
                && long - short >= min_edge
            {
                Direction::Long
            } else if short / max_score >= params.brain_threshold
                && conviction > MIN_CONVICTION
                && short - long >= min_edge
            {
                Direction::Short
            } else {
                continue;
            };

            let atr = frame.atr[i];
            let (take_profit, stop_loss) = match direction {
                Direction::Long => (bar.close + params.tp_atr * atr, bar.close - params.sl_atr * atr),
                Direction::Short => (bar.close - params.tp_atr * atr, bar.close + params.sl_atr * atr),
            };
            position = Some(OpenPosition {
                direction,
                entry_index: index,
                entry_price: bar.close,
                take_profit,
                stop_loss,
            });
        }

        if let Some(open) = position {
            trades.push(open.close(last, self.bars[last].close, ExitReason::EndOfWindow));
        }

        Ok(trades)
    }
}

impl DecisionSimulator for BarSimulator<'_> {
    fn simulate(&self, vector: &ParameterVector, horizon_bars: usize) -> Result<Vec<f64>> {
        Ok(self
            .simulate_trades(vector, horizon_bars)?
            .into_iter()
            .map(|trade| trade.return_pct)
            .collect())
    }
}
