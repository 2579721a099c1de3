//! Data Processor Module
//! Handles data cleaning: null filling and duplicate removal.

use polars::prelude::*;

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Count null cells across every column.
    pub fn count_missing(df: &DataFrame) -> usize {
        df.get_columns().iter().map(|col| col.null_count()).sum()
    }

    /// Replace every null with the zero value of its column type.
    ///
    /// Numeric columns get `0`, text columns `"0"`, boolean columns `false`.
    /// Columns of any other type are left as they are.
    pub fn fill_missing(df: DataFrame) -> PolarsResult<DataFrame> {
        let fills: Vec<Expr> = df
            .get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .filter_map(|column| {
                let name = column.name().as_str();
                match column.dtype() {
                    DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64 => Some(col(name).fill_null(lit(0))),
                    DataType::String => Some(col(name).fill_null(lit("0"))),
                    DataType::Boolean => Some(col(name).fill_null(lit(false))),
                    _ => None,
                }
            })
            .collect();

        if fills.is_empty() {
            return Ok(df);
        }

        df.lazy().with_columns(fills).collect()
    }

    /// Remove rows that exactly repeat an earlier row, keeping first occurrences in order.
    pub fn drop_duplicates(df: DataFrame) -> PolarsResult<DataFrame> {
        df.lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()
    }

    /// Fill missing values, then drop exact duplicates.
    ///
    /// Filling runs first so rows that differ only by a null and a zero collapse together.
    pub fn clean(df: DataFrame) -> PolarsResult<DataFrame> {
        let filled = Self::fill_missing(df)?;
        Self::drop_duplicates(filled)
    }
}
