//! Statistics module - enrollment aggregations

mod aggregator;
mod prompt;

pub use aggregator::{
    AnalysisError, AnalysisReport, Aggregator, CategoryTotal, RegionTotal, YearTrend,
};
pub use prompt::{parse_count, CountSource, FixedCount, PromptCount, DEFAULT_TOP_N};
