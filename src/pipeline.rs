//! Report pipeline: load → clean → aggregate → render.
//!
//! Only load and aggregation failures abort the run. The chart and the
//! workbook are written independently and a failure in either is reported
//! without stopping the other.

use crate::charts::{display, ReportChartRenderer};
use crate::config::ReportConfig;
use crate::data::{CleanSummary, DataLoader, LoaderError};
use crate::export::WorkbookExporter;
use crate::report::ConsoleReporter;
use crate::stats::{Aggregator, AnalysisError, AnalysisReport, CountSource};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: CleanSummary,
    pub report: AnalysisReport,
    pub chart_saved: bool,
    pub workbook_saved: bool,
    pub chart_shown: bool,
}

/// Run against stdout.
pub fn run(config: &ReportConfig, counts: &mut dyn CountSource) -> Result<RunOutcome, PipelineError> {
    let console = ConsoleReporter::new(config.display.clone());
    run_with_console(config, counts, &console)
}

pub fn run_with_console(
    config: &ReportConfig,
    counts: &mut dyn CountSource,
    console: &ConsoleReporter,
) -> Result<RunOutcome, PipelineError> {
    console.print_status("Reading data file...");
    let mut loader = DataLoader::new();
    // A load failure is reported once, by the caller.
    loader.load_csv(&config.input)?;
    let summary = loader.summary().ok_or(LoaderError::NoData)?;
    console.print_status(&format!(
        "Done: {} raw rows, {} rows after cleaning.",
        summary.raw_rows, summary.clean_rows
    ));

    let df = loader.into_dataframe().ok_or(LoaderError::NoData)?;
    let report = Aggregator::analyze(&df, counts, config.default_top_n, console)?;
    drop(df);

    console.print_status("Generating chart and workbook...");

    let chart_saved = match ReportChartRenderer::render(&report, &config.chart, &config.chart_path) {
        Ok(()) => {
            console.print_status(&format!("Saved: {}", config.chart_path.display()));
            true
        }
        Err(e) => {
            error!(error = %e, path = %config.chart_path.display(), "Chart rendering failed");
            console.print_status(&format!("Chart could not be saved: {e}"));
            false
        }
    };

    let workbook_saved = match WorkbookExporter::write(&report, &config.workbook_path) {
        Ok(()) => {
            console.print_status(&format!("Saved: {}", config.workbook_path.display()));
            true
        }
        Err(e) => {
            error!(error = %e, path = %config.workbook_path.display(), "Workbook export failed");
            console.print_status(&format!("Workbook could not be saved: {e}"));
            false
        }
    };

    let chart_shown = chart_saved && config.show_chart && display::show(&config.chart_path);

    info!(chart_saved, workbook_saved, chart_shown, "Run finished");
    console.print_status("All steps finished. Check the output files in the working directory.");

    Ok(RunOutcome {
        summary,
        report,
        chart_saved,
        workbook_saved,
        chart_shown,
    })
}
