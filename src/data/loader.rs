//! CSV Data Loader Module
//! Handles CSV file loading and cleaning using Polars.

use crate::data::DataProcessor;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV (check that the file exists and is UTF-8 encoded): {0}")]
    Read(#[source] PolarsError),
    #[error("Failed to clean data: {0}")]
    Clean(#[source] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Row accounting for one load, before and after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanSummary {
    pub raw_rows: usize,
    pub filled_cells: usize,
    pub clean_rows: usize,
}

impl CleanSummary {
    /// Rows removed as exact duplicates.
    pub fn duplicates_removed(&self) -> usize {
        self.raw_rows - self.clean_rows
    }
}

/// Loads the enrollment CSV with Polars and keeps the cleaned table.
pub struct DataLoader {
    df: Option<DataFrame>,
    summary: Option<CleanSummary>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            summary: None,
        }
    }

    /// Load a CSV file, fill nulls with zero and drop duplicate rows.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let file_path = file_path.as_ref();
        self.df = None;
        self.summary = None;

        info!(path = %file_path.display(), "Reading data file");

        let raw = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_encoding(CsvEncoding::Utf8)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(LoaderError::Read)?;

        let raw_rows = raw.height();
        let filled_cells = DataProcessor::count_missing(&raw);
        debug!(raw_rows, filled_cells, columns = raw.width(), "Parsed CSV");

        let cleaned = DataProcessor::clean(raw).map_err(LoaderError::Clean)?;

        let summary = CleanSummary {
            raw_rows,
            filled_cells,
            clean_rows: cleaned.height(),
        };
        info!(
            raw_rows = summary.raw_rows,
            clean_rows = summary.clean_rows,
            filled_cells = summary.filled_cells,
            duplicates = summary.duplicates_removed(),
            "Cleaned data"
        );

        self.summary = Some(summary);
        let df: &DataFrame = self.df.insert(cleaned);
        Ok(df)
    }

    /// Get list of column names from the loaded DataFrame.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the cleaned DataFrame.
    pub fn row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the cleaned DataFrame.
    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Hand the cleaned DataFrame over to the caller.
    pub fn into_dataframe(self) -> Option<DataFrame> {
        self.df
    }

    pub fn summary(&self) -> Option<CleanSummary> {
        self.summary
    }
}
