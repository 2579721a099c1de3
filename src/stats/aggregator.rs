//! Enrollment Aggregator Module
//! Computes the category breakdown, the yearly trend and the regional ranking.

use crate::data::schema::{CATEGORY, REGION, REQUIRED, TOTAL, YEAR};
use crate::report::ConsoleReporter;
use crate::stats::CountSource;
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Input is missing required column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' holds a non-integral count: {value}")]
    NonIntegralTotal { column: String, value: f64 },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Summed total for one degree level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
}

/// Summed total for one academic year, with the change from the year before.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTrend {
    pub year: i64,
    pub total: i64,
    pub delta: i64,
    pub pct_change: f64,
}

/// Summed total for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTotal {
    pub region: String,
    pub total: i64,
}

/// The three derived tables handed to the reporters.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub categories: Vec<CategoryTotal>,
    pub trend: Vec<YearTrend>,
    pub ranking: Vec<RegionTotal>,
    pub top_n: usize,
}

/// Handles the grouping and summing over the cleaned record table.
pub struct Aggregator;

impl Aggregator {
    /// Fail if any schema column is absent.
    pub fn require_columns(df: &DataFrame) -> Result<(), AnalysisError> {
        let names = df.get_column_names();
        for required in REQUIRED {
            if !names.iter().any(|name| name.as_str() == required) {
                return Err(AnalysisError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }

    /// Counts must be whole numbers; a fractional total would be truncated by the integer cast.
    pub fn check_integral_totals(df: &DataFrame) -> Result<(), AnalysisError> {
        let totals = df
            .column(TOTAL)
            .map_err(|_| AnalysisError::MissingColumn(TOTAL.to_string()))?;
        if !matches!(totals.dtype(), DataType::Float32 | DataType::Float64) {
            return Ok(());
        }

        let values = totals.cast(&DataType::Float64)?;
        if let Some(value) = values.f64()?.into_iter().flatten().find(|v| v.fract() != 0.0) {
            return Err(AnalysisError::NonIntegralTotal {
                column: TOTAL.to_string(),
                value,
            });
        }
        Ok(())
    }

    /// Sum totals per distinct key of `key_col`, in order of first appearance.
    fn sum_by_key(df: &DataFrame, key_col: &str) -> Result<Vec<(String, i64)>, AnalysisError> {
        if df.column(key_col).is_err() {
            return Err(AnalysisError::MissingColumn(key_col.to_string()));
        }
        Self::check_integral_totals(df)?;

        let grouped = df
            .clone()
            .lazy()
            .group_by_stable([col(key_col)])
            .agg([col(TOTAL).strict_cast(DataType::Int64).sum()])
            .collect()?;

        let keys = grouped.column(key_col)?;
        let sums = grouped.column(TOTAL)?.i64()?;

        let rows = (0..grouped.height())
            .map(|i| {
                let key = keys.get(i).map(|v| any_value_label(&v)).unwrap_or_default();
                (key, sums.get(i).unwrap_or(0))
            })
            .collect();

        Ok(rows)
    }

    /// Total per degree level.
    pub fn category_totals(df: &DataFrame) -> Result<Vec<CategoryTotal>, AnalysisError> {
        let rows = Self::sum_by_key(df, CATEGORY)?
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect::<Vec<_>>();
        debug!(categories = rows.len(), "Computed category totals");
        Ok(rows)
    }

    /// Total per year, ascending, with year-over-year delta and percent change.
    pub fn yearly_trend(df: &DataFrame) -> Result<Vec<YearTrend>, AnalysisError> {
        for required in [YEAR, TOTAL] {
            if df.column(required).is_err() {
                return Err(AnalysisError::MissingColumn(required.to_string()));
            }
        }
        Self::check_integral_totals(df)?;

        let grouped = df
            .clone()
            .lazy()
            .group_by([col(YEAR).strict_cast(DataType::Int64)])
            .agg([col(TOTAL).strict_cast(DataType::Int64).sum()])
            .collect()?;

        let years = grouped.column(YEAR)?.i64()?;
        let sums = grouped.column(TOTAL)?.i64()?;

        let mut totals: Vec<(i64, i64)> = years
            .into_iter()
            .zip(sums.into_iter())
            .map(|(year, total)| (year.unwrap_or(0), total.unwrap_or(0)))
            .collect();
        totals.sort_by_key(|&(year, _)| year);

        let trend = Self::trend_from_totals(&totals);
        debug!(years = trend.len(), "Computed yearly trend");
        Ok(trend)
    }

    /// Derive delta and percent change from year totals already sorted ascending.
    pub fn trend_from_totals(totals: &[(i64, i64)]) -> Vec<YearTrend> {
        let mut trend = Vec::with_capacity(totals.len());
        let mut previous: Option<i64> = None;

        for &(year, total) in totals {
            let (delta, pct_change) = match previous {
                Some(prev) => (total - prev, Self::pct_change(prev, total)),
                None => (0, 0.0),
            };
            trend.push(YearTrend {
                year,
                total,
                delta,
                pct_change,
            });
            previous = Some(total);
        }

        trend
    }

    /// Percent change from `previous` to `current`, rounded to two decimals.
    ///
    /// A zero previous total yields 0.0.
    pub fn pct_change(previous: i64, current: i64) -> f64 {
        if previous == 0 {
            return 0.0;
        }
        let pct = (current - previous) as f64 / previous as f64 * 100.0;
        round2(pct)
    }

    /// The `n` regions with the highest totals, descending.
    pub fn top_regions(df: &DataFrame, n: usize) -> Result<Vec<RegionTotal>, AnalysisError> {
        let mut rows: Vec<RegionTotal> = Self::sum_by_key(df, REGION)?
            .into_iter()
            .map(|(region, total)| RegionTotal { region, total })
            .collect();

        // Stable sort: ties keep first-appearance order.
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows.truncate(n);

        debug!(regions = rows.len(), n, "Computed regional ranking");
        Ok(rows)
    }

    /// Run every aggregation in order, printing each table as it completes.
    pub fn analyze(
        df: &DataFrame,
        counts: &mut dyn CountSource,
        default_n: usize,
        console: &ConsoleReporter,
    ) -> Result<AnalysisReport, AnalysisError> {
        Self::require_columns(df)?;
        console.print_banner("Student Enrollment Analysis Report");

        let categories = Self::category_totals(df)?;
        console.print_table(&crate::report::category_table(&categories));

        let trend = Self::yearly_trend(df)?;
        console.print_table(&crate::report::trend_table(&trend));

        let top_n = counts.request_count(default_n);
        let ranking = Self::top_regions(df, top_n)?;
        console.print_table(&crate::report::ranking_table(&ranking, top_n));

        console.print_footer("Analysis complete.");
        info!(
            categories = categories.len(),
            years = trend.len(),
            regions = ranking.len(),
            top_n,
            "Aggregation finished"
        );

        Ok(AnalysisReport {
            categories,
            trend,
            ranking,
            top_n,
        })
    }
}

/// Render a key cell without the quoting `AnyValue`'s Display adds to strings.
fn any_value_label(value: &AnyValue) -> String {
    match value {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Null => String::new(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
