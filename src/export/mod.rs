//! Export module - spreadsheet output

mod workbook;

pub use workbook::{WorkbookError, WorkbookExporter, CATEGORY_SHEET, RANKING_SHEET, TREND_SHEET};
