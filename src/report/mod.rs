//! Report module - console output and shared table views

mod console;
mod table;

pub use console::{ConsoleReporter, DisplayOptions};
pub use table::{
    category_table, ranking_table, trend_table, Cell, TableView, DELTA_HEADER, PCT_HEADER,
};
