//! Static Chart Renderer
//! Draws the composite report figure with plotters.
//!
//! Layout (one row, three panels):
//! 1. Degree level share (pie with percentage labels)
//! 2. Regional ranking (horizontal bars, highest on top)
//! 3. Yearly total trend (line with point markers)

use crate::stats::{AnalysisReport, CategoryTotal, RegionTotal, YearTrend};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

/// Figure size and font settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Font family used for titles and labels. Needs CJK glyphs for the default titles.
    pub font_family: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        // 20 x 6 inches at 100 DPI
        Self {
            width: 2000,
            height: 600,
            font_family: "sans-serif".to_string(),
        }
    }
}

pub const PIE_TITLE: &str = "學位分布比例";
pub const BAR_TITLE: &str = "縣市人數排名";
const TREND_TITLE_SUFFIX: &str = "學年度總人數趨勢";

const TREND_COLOR: RGBColor = RGBColor(0, 0, 255);

/// Slice and bar colors
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(255, 87, 34),   // Deep Orange
    RGBColor(96, 125, 139),  // Blue Grey
];

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Title of the trend panel, spanning the first and last year shown.
pub fn trend_title(trend: &[YearTrend]) -> String {
    match (trend.first(), trend.last()) {
        (Some(first), Some(last)) => {
            format!("{}-{} {}", first.year, last.year, TREND_TITLE_SUFFIX)
        }
        _ => TREND_TITLE_SUFFIX.to_string(),
    }
}

/// Axis bounds padded so a single point or a flat line still has a non-empty range.
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        let pad = (max.abs() * 0.1).max(1.0);
        return (min - pad, max + pad);
    }
    let pad = (max - min) * 0.1;
    (min - pad, max + pad)
}

pub struct ReportChartRenderer;

impl ReportChartRenderer {
    /// Render the three panels into one PNG at `path`.
    pub fn render(
        report: &AnalysisReport,
        options: &ChartOptions,
        path: &Path,
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
        Self::draw_report(&root, report, options).map_err(|e| ChartError::Drawing(e.to_string()))?;
        root.present()
            .map_err(|e| ChartError::Drawing(e.to_string()))?;

        info!(path = %path.display(), "Chart saved");
        Ok(())
    }

    /// Draw the full figure onto any backend.
    pub fn draw_report<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        report: &AnalysisReport,
        options: &ChartOptions,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let panels = root.split_evenly((1, 3));
        let font = options.font_family.as_str();

        Self::draw_category_pie(&panels[0], &report.categories, font)?;
        Self::draw_region_bars(&panels[1], &report.ranking, font)?;
        Self::draw_year_trend(&panels[2], &report.trend, font)?;
        Ok(())
    }

    fn draw_empty<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        title: &str,
        font: &str,
    ) -> DrawResult<DB> {
        let inner = area.titled(title, (font, 24))?;
        let (w, h) = inner.dim_in_pixel();
        inner.draw(&Text::new(
            "no data",
            ((w / 2) as i32 - 30, (h / 2) as i32),
            (font, 18).into_font().color(&BLACK),
        ))?;
        Ok(())
    }

    /// Pie of category totals, starting at 90 degrees.
    fn draw_category_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        categories: &[CategoryTotal],
        font: &str,
    ) -> DrawResult<DB> {
        let sum: i64 = categories.iter().map(|c| c.total).sum();
        if categories.is_empty() || sum <= 0 {
            debug!("Pie panel has no positive totals");
            return Self::draw_empty(area, PIE_TITLE, font);
        }

        let inner = area.titled(PIE_TITLE, (font, 24))?;
        let (w, h) = inner.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = w.min(h) as f64 * 0.35;

        // Negative totals cannot be drawn as slices.
        let sizes: Vec<f64> = categories.iter().map(|c| c.total.max(0) as f64).collect();
        let colors: Vec<RGBColor> = (0..categories.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();
        let labels: Vec<String> = categories.iter().map(|c| c.category.clone()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style((font, 16).into_font().color(&BLACK));
        pie.percentages((font, 14).into_font().color(&WHITE));
        inner.draw(&pie)?;
        Ok(())
    }

    /// Horizontal bars of the ranking, first rank drawn at the top.
    fn draw_region_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        ranking: &[RegionTotal],
        font: &str,
    ) -> DrawResult<DB> {
        if ranking.is_empty() {
            return Self::draw_empty(area, BAR_TITLE, font);
        }

        let n = ranking.len() as i32;
        let x_max = ranking.iter().map(|r| r.total).max().unwrap_or(0).max(1) as f64 * 1.1;
        let names: Vec<&str> = ranking.iter().map(|r| r.region.as_str()).collect();

        let mut chart = ChartBuilder::on(area)
            .caption(BAR_TITLE, (font, 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(110)
            .build_cartesian_2d(0f64..x_max, (0..n).into_segmented())?;

        let label_for = |v: &SegmentValue<i32>| -> String {
            match v {
                SegmentValue::CenterOf(slot) | SegmentValue::Exact(slot) => {
                    let rank = n - 1 - *slot;
                    usize::try_from(rank)
                        .ok()
                        .and_then(|r| names.get(r))
                        .map(|s| s.to_string())
                        .unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            }
        };

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(ranking.len())
            .y_label_formatter(&label_for)
            .x_desc(crate::data::schema::TOTAL)
            .label_style((font, 14))
            .axis_desc_style((font, 16))
            .draw()?;

        chart.draw_series(ranking.iter().enumerate().map(|(rank, r)| {
            let slot = n - 1 - rank as i32;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(slot)),
                    (r.total as f64, SegmentValue::Exact(slot + 1)),
                ],
                PALETTE[rank % PALETTE.len()].filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))?;

        Ok(())
    }

    /// Line of yearly totals with circle markers.
    fn draw_year_trend<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        trend: &[YearTrend],
        font: &str,
    ) -> DrawResult<DB> {
        let title = trend_title(trend);
        if trend.is_empty() {
            return Self::draw_empty(area, &title, font);
        }

        let points: Vec<(f64, f64)> = trend
            .iter()
            .map(|t| (t.year as f64, t.total as f64))
            .collect();

        let (x_lo, x_hi) = {
            let first = points[0].0;
            let last = points[points.len() - 1].0;
            if trend.len() == 1 {
                (first - 1.0, last + 1.0)
            } else {
                (first - 0.2, last + 0.2)
            }
        };
        let y_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let (y_lo, y_hi) = padded_range(y_min, y_max);

        let mut chart = ChartBuilder::on(area)
            .caption(&title, (font, 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        let years: Vec<f64> = points.iter().map(|p| p.0).collect();
        let year_label = |x: &f64| -> String {
            if years.iter().any(|y| (y - x).abs() < 1e-6) {
                format!("{x:.0}")
            } else {
                String::new()
            }
        };

        chart
            .configure_mesh()
            .x_labels(((x_hi - x_lo).ceil() as usize + 1).max(2))
            .x_label_formatter(&year_label)
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc(crate::data::schema::YEAR)
            .y_desc(crate::data::schema::TOTAL)
            .label_style((font, 14))
            .axis_desc_style((font, 16))
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.clone(),
            TREND_COLOR.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, 5, TREND_COLOR.filled())),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(year: i64, total: i64) -> YearTrend {
        YearTrend {
            year,
            total,
            delta: 0,
            pct_change: 0.0,
        }
    }

    #[test]
    fn test_trend_title_spans_years() {
        let trend = vec![year(103, 1), year(104, 2), year(105, 3)];
        assert_eq!(trend_title(&trend), "103-105 學年度總人數趨勢");
        assert_eq!(trend_title(&[]), "學年度總人數趨勢");
    }

    #[test]
    fn test_padded_range_never_empty() {
        let (lo, hi) = padded_range(50.0, 50.0);
        assert!(lo < 50.0 && hi > 50.0);

        let (lo, hi) = padded_range(0.0, 100.0);
        assert_eq!((lo, hi), (-10.0, 110.0));
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            categories: vec![
                CategoryTotal { category: "學士".into(), total: 70 },
                CategoryTotal { category: "碩士".into(), total: 20 },
            ],
            trend: vec![year(103, 40), year(104, 50)],
            ranking: vec![
                RegionTotal { region: "臺北市".into(), total: 60 },
                RegionTotal { region: "臺中市".into(), total: 30 },
            ],
            top_n: 2,
        }
    }

    /// Text needs a system font; without one every draw fails with a font error.
    fn font_available(options: &ChartOptions) -> bool {
        (options.font_family.as_str(), 12)
            .into_font()
            .box_size("0")
            .is_ok()
    }

    fn draw_to_buffer(report: &AnalysisReport, options: &ChartOptions) -> (bool, Vec<u8>) {
        let mut buf = vec![255u8; (options.width * options.height * 3) as usize];
        let ok = {
            let root = BitMapBackend::with_buffer(&mut buf, (options.width, options.height))
                .into_drawing_area();
            let drawn = ReportChartRenderer::draw_report(&root, report, options).is_ok();
            drawn && root.present().is_ok()
        };
        (ok, buf)
    }

    #[test]
    fn test_draw_report_paints_all_panels() {
        let options = ChartOptions {
            width: 900,
            height: 300,
            ..ChartOptions::default()
        };
        if !font_available(&options) {
            return;
        }

        let (ok, buf) = draw_to_buffer(&sample_report(), &options);
        assert!(ok);

        // Every panel gets something other than the white background.
        let panel_width = (options.width / 3) as usize;
        for panel in 0..3 {
            let painted = buf.chunks(3).enumerate().any(|(i, px)| {
                let x = i % options.width as usize;
                x / panel_width == panel && px != [255, 255, 255]
            });
            assert!(painted, "panel {panel} is blank");
        }
    }

    #[test]
    fn test_draw_report_handles_empty_report() {
        let options = ChartOptions {
            width: 600,
            height: 200,
            ..ChartOptions::default()
        };
        if !font_available(&options) {
            return;
        }

        let (ok, buf) = draw_to_buffer(&AnalysisReport::default(), &options);
        assert!(ok);
        assert!(buf.chunks(3).any(|px| px != [255, 255, 255]));
    }

    #[test]
    fn test_render_writes_png() {
        let options = ChartOptions {
            width: 600,
            height: 200,
            ..ChartOptions::default()
        };
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.png");

        let result = ReportChartRenderer::render(&sample_report(), &options, &path);
        if font_available(&options) {
            assert!(result.is_ok());
            let bytes = std::fs::read(&path).expect("png written");
            assert!(bytes.starts_with(b"\x89PNG"));
        } else {
            assert!(matches!(result, Err(ChartError::Drawing(_))));
        }
    }

    #[test]
    fn test_default_options_match_figure_size() {
        let options = ChartOptions::default();
        assert_eq!((options.width, options.height), (2000, 600));
    }
}
