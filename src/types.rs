use crate::error::EvobiasError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market regime label assigned by an external classifier.
///
/// The engine only uses it as a selector key for one of three populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    Trend,
    Range,
    Choppy,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Trend, Regime::Range, Regime::Choppy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Trend => "TREND",
            Regime::Range => "RANGE",
            Regime::Choppy => "CHOPPY",
        }
    }

    /// Slot used by fixed-size per-regime storage.
    pub fn index(&self) -> usize {
        match self {
            Regime::Trend => 0,
            Regime::Range => 1,
            Regime::Choppy => 2,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = EvobiasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TREND" => Ok(Regime::Trend),
            "RANGE" => Ok(Regime::Range),
            "CHOPPY" => Ok(Regime::Choppy),
            _ => Err(EvobiasError::InvalidRegime(s.to_string())),
        }
    }
}

/// Trade direction of a synthetic position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

/// Why a synthetic position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    EndOfWindow,
}
