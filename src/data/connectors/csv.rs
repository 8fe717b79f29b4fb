use crate::data::bars::BarSeries;
use crate::error::{EvobiasError, Result};
use polars::prelude::*;
use std::path::Path;
use super::validator::DataValidator;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| EvobiasError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV of bars, validating columns and row count
    pub fn load_bars<P: AsRef<Path>>(path: P, min_rows: usize) -> Result<BarSeries> {
        let df = Self::load(&path)?;
        DataValidator::validate_minimum_rows(&df, min_rows)?;

        let series = BarSeries::from_dataframe(&df)?;
        log::info!(
            "Loaded {} bars from {}",
            series.len(),
            path.as_ref().display()
        );

        Ok(series)
    }
}
