//! Report configuration: built-in defaults, optionally overlaid by a JSON file.

use crate::charts::ChartOptions;
use crate::report::DisplayOptions;
use crate::stats::DEFAULT_TOP_N;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "103-105_students.csv";
pub const DEFAULT_CHART_PATH: &str = "project_final_report.png";
pub const DEFAULT_WORKBOOK_PATH: &str = "student_analysis_results.xlsx";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub chart_path: PathBuf,
    pub workbook_path: PathBuf,
    /// Ranking size used when the operator gives no usable answer.
    pub default_top_n: usize,
    /// Fixed ranking size; skips the prompt when set.
    pub top_n: Option<usize>,
    /// Open the chart in the system viewer once saved.
    pub show_chart: bool,
    pub display: DisplayOptions,
    pub chart: ChartOptions,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK_PATH),
            default_top_n: DEFAULT_TOP_N,
            top_n: None,
            show_chart: true,
            display: DisplayOptions::default(),
            chart: ChartOptions::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a JSON config; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.input, PathBuf::from("103-105_students.csv"));
        assert_eq!(config.chart_path, PathBuf::from("project_final_report.png"));
        assert_eq!(config.workbook_path, PathBuf::from("student_analysis_results.xlsx"));
        assert_eq!(config.default_top_n, 10);
        assert!(config.top_n.is_none());
        assert!(config.show_chart);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "top_n": 5, "chart": { "font_family": "Noto Sans CJK TC" } }"#;
        let config = ReportConfig::from_json_str(Path::new("report.json"), json).unwrap();
        assert_eq!(config.top_n, Some(5));
        assert_eq!(config.chart.font_family, "Noto Sans CJK TC");
        assert_eq!(config.chart.width, 2000);
        assert_eq!(config.display, DisplayOptions::default());
        assert_eq!(config.workbook_path, PathBuf::from(DEFAULT_WORKBOOK_PATH));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let err = ReportConfig::from_json_str(Path::new("bad.json"), "{ nope").unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = ReportConfig::from_json_file(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
