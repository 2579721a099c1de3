//! Workbook Export Module
//! Writes the three report tables to one `.xlsx` file, one sheet each.

use crate::report::{category_table, ranking_table, trend_table, Cell, TableView};
use crate::stats::AnalysisReport;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const CATEGORY_SHEET: &str = "學位統計";
pub const RANKING_SHEET: &str = "縣市排名";
pub const TREND_SHEET: &str = "年度趨勢";

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Spreadsheet writer for the analysis report.
pub struct WorkbookExporter;

impl WorkbookExporter {
    /// Build the workbook in memory: category, ranking and trend sheets in that order.
    pub fn build(report: &AnalysisReport) -> Result<Workbook, WorkbookError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        Self::write_sheet(&mut workbook, CATEGORY_SHEET, &category_table(&report.categories), &header)?;
        Self::write_sheet(
            &mut workbook,
            RANKING_SHEET,
            &ranking_table(&report.ranking, report.top_n),
            &header,
        )?;
        Self::write_sheet(&mut workbook, TREND_SHEET, &trend_table(&report.trend), &header)?;

        Ok(workbook)
    }

    /// Write the workbook to `path`.
    pub fn write(report: &AnalysisReport, path: &Path) -> Result<(), WorkbookError> {
        let mut workbook = Self::build(report)?;
        workbook.save(path)?;
        info!(path = %path.display(), "Workbook saved");
        Ok(())
    }

    /// Header row at row 0, data from row 1, starting at column A (no index column).
    fn write_sheet(
        workbook: &mut Workbook,
        name: &str,
        table: &TableView,
        header: &Format,
    ) -> Result<(), WorkbookError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;

        for (col, title) in table.headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, title, header)?;
        }

        for (r, row) in table.rows.iter().enumerate() {
            let row_num = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col_num = col as u16;
                match cell {
                    Cell::Text(s) => sheet.write_string(row_num, col_num, s)?,
                    Cell::Int(v) => sheet.write_number(row_num, col_num, *v as f64)?,
                    Cell::Float(v) => sheet.write_number(row_num, col_num, *v)?,
                };
            }
        }

        Ok(())
    }
}
