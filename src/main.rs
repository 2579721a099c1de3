//! Enrollment Report - CLI entry point.

use anyhow::Result;
use clap::Parser;
use enrollment_report::config::ReportConfig;
use enrollment_report::pipeline;
use enrollment_report::stats::{FixedCount, PromptCount};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "enrollment_report")]
#[command(about = "Clean a student enrollment CSV and produce a chart and workbook report", long_about = None)]
struct Cli {
    /// Enrollment CSV (UTF-8, with header row)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output chart image
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Output spreadsheet
    #[arg(long)]
    workbook: Option<PathBuf>,

    /// Number of top regions to rank; skips the interactive prompt
    #[arg(short, long)]
    top: Option<usize>,

    /// Do not open the chart after saving it
    #[arg(long)]
    no_show: bool,

    /// Font family for chart text
    #[arg(long)]
    font: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_json_file(path)?,
            None => ReportConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(chart) = self.chart {
            config.chart_path = chart;
        }
        if let Some(workbook) = self.workbook {
            config.workbook_path = workbook;
        }
        if self.top.is_some() {
            config.top_n = self.top;
        }
        if self.no_show {
            config.show_chart = false;
        }
        if let Some(font) = self.font {
            config.chart.font_family = font;
        }

        Ok(config)
    }
}

fn init_tracing() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry().with(stderr_layer).init();
}

fn main() -> Result<()> {
    init_tracing();

    let config = Cli::parse().into_config()?;

    let outcome = match config.top_n {
        Some(n) => pipeline::run(&config, &mut FixedCount(n))?,
        None => pipeline::run(&config, &mut PromptCount::stdin())?,
    };

    tracing::debug!(summary = ?outcome.summary, "Exiting");
    Ok(())
}
