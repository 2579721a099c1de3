//! Console Report Module
//! Prints banners and centre-justified tables to stdout with `tabled`.

use crate::report::TableView;
use serde::Deserialize;
use std::cell::RefCell;
use std::io::{self, Write};
use tabled::builder::Builder;
use tabled::settings::{Alignment, Padding, Style, Width};
use tabled::Table;

/// Console layout settings, passed explicitly to the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Width of the `=` banner rules.
    pub banner_width: usize,
    /// Upper bound for any rule line.
    pub max_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            banner_width: 60,
            max_width: 180,
        }
    }
}

/// Writes report sections to the console.
pub struct ConsoleReporter {
    options: DisplayOptions,
    out: RefCell<Box<dyn Write>>,
}

impl ConsoleReporter {
    /// Report to stdout.
    pub fn new(options: DisplayOptions) -> Self {
        Self::with_writer(options, Box::new(io::stdout()))
    }

    pub fn with_writer(options: DisplayOptions, out: Box<dyn Write>) -> Self {
        Self {
            options,
            out: RefCell::new(out),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "Console write failed");
        }
    }

    fn rule(&self, ch: char, width: usize) -> String {
        ch.to_string().repeat(width.min(self.options.max_width))
    }

    /// Borderless, centre-aligned table; cell widths account for wide characters.
    pub fn build_table(table: &TableView) -> Table {
        let mut builder = Builder::default();
        builder.push_record(table.headers.iter().cloned());
        for row in &table.rows {
            builder.push_record(row.iter().map(|cell| cell.to_string()));
        }

        let mut built = builder.build();
        built.with(Style::empty()).with(Alignment::center());
        built
    }

    /// Format a titled table with a dashed rule above and below.
    pub fn render_table(&self, table: &TableView) -> String {
        let built = Self::build_table(table);
        let rule = self.rule('-', built.total_width());

        let mut out = String::new();
        out.push('\n');
        out.push_str(&table.title);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for line in built.to_string().lines() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push_str(&rule);
        out
    }

    pub fn print_table(&self, table: &TableView) {
        self.emit(&self.render_table(table));
    }

    pub fn render_banner(&self, title: &str) -> String {
        let width = self.options.banner_width.min(self.options.max_width);
        let mut heading = Builder::from(vec![vec![title.to_string()]]).build();
        heading
            .with(Style::empty())
            .with(Padding::zero())
            .with(Alignment::center())
            .with(Width::increase(width));

        let rule = self.rule('=', width);
        format!("\n{rule}\n{}\n{rule}", heading.to_string().trim_end())
    }

    pub fn print_banner(&self, title: &str) {
        self.emit(&self.render_banner(title));
    }

    pub fn print_footer(&self, message: &str) {
        self.emit(&format!("\n{message}"));
        self.emit(&self.rule('=', self.options.banner_width));
    }

    /// Plain status line for the operator.
    pub fn print_status(&self, message: &str) {
        self.emit(&format!("\n{message}"));
    }
}
