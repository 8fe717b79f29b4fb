use crate::data::connectors::{DataValidator, OhlcColumn};
use crate::error::{EvobiasError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Bar with all prices equal to `price` and no volume
    pub fn flat(price: f64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0.0,
        }
    }
}

/// Ordered bar history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// Extract bars from a DataFrame with OHLC(V) columns.
    ///
    /// Column names are matched through [`OhlcColumn::aliases`]; a missing
    /// volume column yields zero volume. Rows with a null price are rejected.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = DataValidator::validate_ohlc(df)?;

        let open = float_column(df, &columns.open)?;
        let high = float_column(df, &columns.high)?;
        let low = float_column(df, &columns.low)?;
        let close = float_column(df, &columns.close)?;
        let volume = match &columns.volume {
            Some(name) => Some(float_column(df, name)?),
            None => None,
        };

        let mut bars = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let price = |values: &[Option<f64>], column: OhlcColumn| {
                values[i].ok_or_else(|| {
                    EvobiasError::DataLoading(format!("Null {} at row {}", column.as_str(), i))
                })
            };

            bars.push(Bar {
                open: price(&open, OhlcColumn::Open)?,
                high: price(&high, OhlcColumn::High)?,
                low: price(&low, OhlcColumn::Low)?,
                close: price(&close, OhlcColumn::Close)?,
                volume: volume.as_ref().and_then(|v| v[i]).unwrap_or(0.0),
            });
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Bars up to and including `index`, the view a live consumer has at that bar
    pub fn up_to(&self, index: usize) -> &[Bar] {
        &self.bars[..(index + 1).min(self.bars.len())]
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}
