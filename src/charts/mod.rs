//! Charts module - Chart rendering

pub mod display;
mod renderer;

pub use renderer::{trend_title, ChartError, ChartOptions, ReportChartRenderer, BAR_TITLE, PIE_TITLE};
