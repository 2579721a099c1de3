//! Enrollment Report - student enrollment CSV cleaning, aggregation & reporting
//!
//! Loads the enrollment CSV, fills missing values and drops duplicate rows,
//! then produces a degree level breakdown, a yearly trend and a regional
//! ranking, printed to the console, drawn as one PNG and saved as an `.xlsx`.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;
pub mod report;
pub mod stats;
