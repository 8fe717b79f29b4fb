use crate::error::{EvobiasError, Result};
use polars::prelude::*;
use super::types::{ColumnMap, OhlcColumn};

pub struct DataValidator;

impl DataValidator {
    /// Resolve OHLC(V) columns, check they are numeric and that every row is
    /// a coherent bar (low <= open, close <= high).
    pub fn validate_ohlc(df: &DataFrame) -> Result<ColumnMap> {
        let columns = ColumnMap {
            open: Self::require_column(df, OhlcColumn::Open)?,
            high: Self::require_column(df, OhlcColumn::High)?,
            low: Self::require_column(df, OhlcColumn::Low)?,
            close: Self::require_column(df, OhlcColumn::Close)?,
            volume: Self::find_column(df, OhlcColumn::Volume),
        };

        let names = [&columns.open, &columns.high, &columns.low, &columns.close]
            .into_iter()
            .chain(columns.volume.as_ref());
        for name in names {
            let dtype = df.column(name)?.dtype().clone();
            if !is_numeric(&dtype) {
                return Err(EvobiasError::DataLoading(format!(
                    "Column '{}' must be numeric, found {:?}",
                    name, dtype
                )));
            }
        }

        Self::validate_ohlc_relationships(df, &columns)?;

        Ok(columns)
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(EvobiasError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    fn require_column(df: &DataFrame, column: OhlcColumn) -> Result<String> {
        Self::find_column(df, column).ok_or_else(|| {
            EvobiasError::DataLoading(format!(
                "Missing required column: {} (tried aliases: {:?})",
                column.as_str(),
                column.aliases()
            ))
        })
    }

    fn find_column(df: &DataFrame, column: OhlcColumn) -> Option<String> {
        let names = df.get_column_names();
        column
            .aliases()
            .iter()
            .find(|alias| names.iter().any(|name| name.as_str() == **alias))
            .map(|alias| alias.to_string())
    }

    fn validate_ohlc_relationships(df: &DataFrame, columns: &ColumnMap) -> Result<()> {
        let open = df.column(&columns.open)?.cast(&DataType::Float64)?;
        let high = df.column(&columns.high)?.cast(&DataType::Float64)?;
        let low = df.column(&columns.low)?.cast(&DataType::Float64)?;
        let close = df.column(&columns.close)?.cast(&DataType::Float64)?;

        let rows = open
            .f64()?
            .into_iter()
            .zip(high.f64()?.into_iter())
            .zip(low.f64()?.into_iter())
            .zip(close.f64()?.into_iter());

        for (i, (((o, h), l), c)) in rows.enumerate() {
            if let (Some(o), Some(h), Some(l), Some(c)) = (o, h, l, c) {
                if h < l || h < o || h < c || l > o || l > c {
                    return Err(EvobiasError::DataLoading(format!(
                        "Invalid bar at row {}: open {} high {} low {} close {}",
                        i, o, h, l, c
                    )));
                }
            }
        }

        Ok(())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}
