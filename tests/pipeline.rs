use enrollment_report::config::ReportConfig;
use enrollment_report::pipeline::{self, PipelineError};
use enrollment_report::report::{ConsoleReporter, DisplayOptions};
use enrollment_report::stats::{AnalysisError, FixedCount, PromptCount, YearTrend};
use plotters::prelude::IntoFont;
use std::cell::RefCell;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::rc::Rc;

const SAMPLE: &str = "\
等級別,學年度,縣市名稱,總計
學士,2020,臺北市,10
碩士,2020,新北市,20
學士,2020,臺中市,30
學士,2020,臺中市,30
博士,2021,臺北市,5
學士,2021,高雄市,
學士,2021,高雄市,5
";

fn config_in(dir: &Path, input: &str) -> ReportConfig {
    let input_path = dir.join("students.csv");
    fs::write(&input_path, input).expect("write input");
    ReportConfig {
        input: input_path,
        chart_path: dir.join("report.png"),
        workbook_path: dir.join("report.xlsx"),
        show_chart: false,
        ..ReportConfig::default()
    }
}

/// Console output collected in memory.
#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn chart_font_available(config: &ReportConfig) -> bool {
    (config.chart.font_family.as_str(), 12)
        .into_font()
        .box_size("0")
        .is_ok()
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(dir.path(), SAMPLE);

    let outcome = pipeline::run(&config, &mut FixedCount(3)).expect("pipeline run");

    assert_eq!(outcome.summary.raw_rows, 7);
    assert_eq!(outcome.summary.clean_rows, 6);
    assert_eq!(outcome.summary.filled_cells, 1);

    assert_eq!(
        outcome.report.trend,
        vec![
            YearTrend { year: 2020, total: 60, delta: 0, pct_change: 0.0 },
            YearTrend { year: 2021, total: 10, delta: -50, pct_change: -83.33 },
        ]
    );
    let category_sum: i64 = outcome.report.categories.iter().map(|c| c.total).sum();
    assert_eq!(category_sum, 70);

    assert_eq!(outcome.report.ranking.len(), 3);
    assert_eq!(outcome.report.ranking[0].region, "臺中市");

    assert!(outcome.workbook_saved);
    assert!(config.workbook_path.exists());
    // Without a system font the chart is reported as unsaved and the run still completes.
    assert_eq!(outcome.chart_saved, chart_font_available(&config));
    assert_eq!(config.chart_path.exists(), outcome.chart_saved);
    assert!(!outcome.chart_shown);
}

#[test]
fn test_blank_prompt_uses_default_ranking_size() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut csv = String::from("等級別,學年度,縣市名稱,總計\n");
    for i in 0..12 {
        csv.push_str(&format!("學士,103,R{i:02},{}\n", 100 + i));
    }
    let config = config_in(dir.path(), &csv);

    let mut prompt = PromptCount::new(Cursor::new("\n"), Vec::new());
    let outcome = pipeline::run(&config, &mut prompt).expect("pipeline run");

    assert_eq!(outcome.report.top_n, 10);
    assert_eq!(outcome.report.ranking.len(), 10);
    assert_eq!(outcome.report.ranking[0].region, "R11");
}

#[test]
fn test_unreadable_input_produces_no_artifacts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ReportConfig {
        input: dir.path().join("missing.csv"),
        chart_path: dir.path().join("report.png"),
        workbook_path: dir.path().join("report.xlsx"),
        show_chart: false,
        ..ReportConfig::default()
    };

    let err = pipeline::run(&config, &mut FixedCount(5)).unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)));
    assert!(!config.chart_path.exists());
    assert!(!config.workbook_path.exists());
}

#[test]
fn test_load_failure_is_not_printed_by_pipeline() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ReportConfig {
        input: dir.path().join("missing.csv"),
        show_chart: false,
        ..ReportConfig::default()
    };
    let captured = Captured::default();
    let console = ConsoleReporter::with_writer(DisplayOptions::default(), Box::new(captured.clone()));

    let err = pipeline::run_with_console(&config, &mut FixedCount(5), &console).unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)));

    // The error surfaces once, through the returned value.
    let printed = captured.text();
    assert_eq!(printed.trim(), "Reading data file...");
    assert!(!printed.contains(&err.to_string()));
}

#[test]
fn test_fractional_totals_abort_before_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(
        dir.path(),
        "等級別,學年度,縣市名稱,總計\n學士,103,臺北市,10.5\n碩士,103,新北市,0.7\n",
    );

    let err = pipeline::run(&config, &mut FixedCount(5)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Analysis(AnalysisError::NonIntegralTotal { .. })
    ));
    assert!(!config.chart_path.exists());
    assert!(!config.workbook_path.exists());
}

#[test]
fn test_missing_schema_column_aborts_before_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(dir.path(), "等級別,學年度,總計\n學士,103,5\n");

    let err = pipeline::run(&config, &mut FixedCount(5)).unwrap_err();
    assert!(matches!(err, PipelineError::Analysis(_)));
    assert!(!config.workbook_path.exists());
}

#[test]
fn test_workbook_failure_does_not_abort_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = config_in(dir.path(), SAMPLE);
    config.workbook_path = dir.path().join("no_such_dir").join("report.xlsx");

    let outcome = pipeline::run(&config, &mut FixedCount(2)).expect("run continues");
    assert!(!outcome.workbook_saved);
    assert_eq!(outcome.report.ranking.len(), 2);
}
