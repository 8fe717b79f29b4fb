use crate::engines::generation::ChampionSnapshot;
use crate::error::Result;
use crate::types::Regime;
use serde::{Deserialize, Serialize};

/// Optional exit tactics; `None` when the toggle gene is off
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExitTactics {
    pub rsi_level: Option<f64>,
    pub momentum_bars: Option<usize>,
    pub stall_bars: Option<usize>,
    pub ma_period: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegimeGates {
    pub trend_only: bool,
    pub range_only: bool,
    pub choppy_only: bool,
}

impl RegimeGates {
    /// False when any enabled gate names a different regime
    pub fn allows(&self, regime: Regime) -> bool {
        let gated = [
            (self.trend_only, Regime::Trend),
            (self.range_only, Regime::Range),
            (self.choppy_only, Regime::Choppy),
        ];
        !gated.iter().any(|(enabled, r)| *enabled && *r != regime)
    }
}

/// Scoring component weights after the minimum-weight floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub lead: f64,
    pub stack: f64,
    pub regime: f64,
    pub volume: f64,
    pub hybrid: f64,
}

/// Typed view of a champion for the live decision logic.
///
/// Periods are truncated to whole bars. Component weights are raised to
/// `min_weight` so a champion can never switch a scoring component off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionParameters {
    pub regime: Regime,
    pub generation: u64,

    pub st_factor: f64,
    pub st_period: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    pub tp_atr: f64,
    pub sl_atr: f64,
    pub stack_threshold: f64,
    pub brain_threshold: f64,
    pub logic_mode: usize,
    pub volume_weight: f64,

    pub exits: ExitTactics,
    pub gates: RegimeGates,
    pub weights: ComponentWeights,
}

impl ChampionParameters {
    pub fn from_champion(champion: &ChampionSnapshot, min_weight: f64) -> Result<Self> {
        let value = |name: &str| champion.extract_named(name);
        let period = |name: &str| value(name).map(|v| v as usize);
        let enabled = |name: &str| value(name).map(|v| v > 0.5);
        let weight = |name: &str| value(name).map(|v| v.max(min_weight));

        let exits = ExitTactics {
            rsi_level: if enabled("EXIT_RSI_ENABLE")? { Some(value("EXIT_RSI_LEVEL")?) } else { None },
            momentum_bars: if enabled("EXIT_MOMO_ENABLE")? { Some(period("EXIT_MOMO_BARS")?) } else { None },
            stall_bars: if enabled("EXIT_STALL_ENABLE")? { Some(period("EXIT_STALL_BARS")?) } else { None },
            ma_period: if enabled("EXIT_MA_ENABLE")? { Some(period("EXIT_MA_PERIOD")?) } else { None },
        };

        Ok(Self {
            regime: champion.regime,
            generation: champion.generation,
            st_factor: value("ST_FACTOR")?,
            st_period: period("ST_PERIOD")?,
            rsi_period: period("RSI_PERIOD")?,
            rsi_overbought: value("RSI_OVERBOUGHT")?,
            rsi_oversold: value("RSI_OVERSOLD")?,
            macd_fast: period("MACD_FAST")?,
            macd_slow: period("MACD_SLOW")?,
            macd_signal: period("MACD_SIGNAL")?,
            tp_atr: value("RISK_TP_ATR")?,
            sl_atr: value("RISK_SL_ATR")?,
            stack_threshold: value("STACK_THRESHOLD")?,
            brain_threshold: value("BRAIN_THRESHOLD")?,
            logic_mode: period("LOGIC_MODE")?,
            volume_weight: value("VOLUME_WEIGHT")?,
            exits,
            gates: RegimeGates {
                trend_only: enabled("REGIME_GATE_TREND_ONLY")?,
                range_only: enabled("REGIME_GATE_RANGE_ONLY")?,
                choppy_only: enabled("REGIME_GATE_CHOPPY_ONLY")?,
            },
            weights: ComponentWeights {
                lead: weight("WEIGHT_LEAD")?,
                stack: weight("WEIGHT_STACK")?,
                regime: weight("WEIGHT_REGIME")?,
                volume: weight("WEIGHT_VOLUME")?,
                hybrid: weight("WEIGHT_HYBRID")?,
            },
        })
    }
}
