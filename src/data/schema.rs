//! Input schema contract.
//!
//! Column names are fixed by the enrollment dataset and are not configurable.

/// Degree level (category) column.
pub const CATEGORY: &str = "等級別";
/// Academic year column.
pub const YEAR: &str = "學年度";
/// County / city (region) column.
pub const REGION: &str = "縣市名稱";
/// Total student count column.
pub const TOTAL: &str = "總計";

/// Every column the aggregations group or sum on.
pub const REQUIRED: [&str; 4] = [CATEGORY, YEAR, REGION, TOTAL];
