//! Table views shared by the console printer and the workbook exporter.

use crate::data::schema::{CATEGORY, REGION, TOTAL, YEAR};
use crate::stats::{CategoryTotal, RegionTotal, YearTrend};
use std::fmt;

/// Header for the year-over-year absolute change.
pub const DELTA_HEADER: &str = "增加人數";
/// Header for the year-over-year percent change.
pub const PCT_HEADER: &str = "成長率(%)";

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v:.2}"),
        }
    }
}

/// Presentation-neutral table: a title, column headers and typed rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableView {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }
}

pub fn category_table(categories: &[CategoryTotal]) -> TableView {
    let mut table = TableView::new("[1] Degree Level Distribution", &[CATEGORY, TOTAL]);
    for c in categories {
        table.push_row(vec![Cell::Text(c.category.clone()), Cell::Int(c.total)]);
    }
    table
}

pub fn trend_table(trend: &[YearTrend]) -> TableView {
    let mut table = TableView::new(
        "[2] Yearly Enrollment Trend",
        &[YEAR, TOTAL, DELTA_HEADER, PCT_HEADER],
    );
    for t in trend {
        table.push_row(vec![
            Cell::Int(t.year),
            Cell::Int(t.total),
            Cell::Int(t.delta),
            Cell::Float(t.pct_change),
        ]);
    }
    table
}

pub fn ranking_table(ranking: &[RegionTotal], top_n: usize) -> TableView {
    let mut table = TableView::new(format!("[3] Top {top_n} Regions by Enrollment"), &[REGION, TOTAL]);
    for r in ranking {
        table.push_row(vec![Cell::Text(r.region.clone()), Cell::Int(r.total)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_table_columns() {
        let table = trend_table(&[YearTrend {
            year: 104,
            total: 10,
            delta: -50,
            pct_change: -83.33,
        }]);
        assert_eq!(table.headers, vec![YEAR, TOTAL, DELTA_HEADER, PCT_HEADER]);
        let rendered: Vec<String> = table.rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["104", "10", "-50", "-83.33"]);
    }

    #[test]
    fn test_ranking_title_carries_count() {
        let table = ranking_table(&[], 5);
        assert!(table.title.contains("Top 5"));
        assert!(table.rows.is_empty());
    }
}
