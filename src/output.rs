//! # Terminal Output
//!
//! Color handling and the column formatter behind `gcts repolist`.
//!
//! `--color always|never` wins over the environment. With `auto`, colors are
//! off when `NO_COLOR` is present, `CLICOLOR=0` or `TERM=dumb`, forced by a
//! non-zero `CLICOLOR_FORCE`, and otherwise follow what stderr supports.

use std::env;

/// Whether styled output may be written
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = if color_flag.eq_ignore_ascii_case("always") {
            true
        } else if color_flag.eq_ignore_ascii_case("never") {
            false
        } else {
            stderr_wants_color()
        };

        Self { use_color }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Renders a section heading such as `Error Log:`.
    pub fn heading(&self, text: &str) -> String {
        if !self.use_color {
            return text.to_string();
        }
        console::style(text)
            .force_styling(true)
            .bold()
            .red()
            .to_string()
    }
}

fn env_is(name: &str, value: &str) -> bool {
    env::var(name).is_ok_and(|v| v == value)
}

fn stderr_wants_color() -> bool {
    if env::var_os("NO_COLOR").is_some() || env_is("CLICOLOR", "0") || env_is("TERM", "dumb") {
        return false;
    }

    match env::var("CLICOLOR_FORCE") {
        Ok(force) if !force.is_empty() && force != "0" => true,
        _ => console::Term::stderr().features().colors_supported(),
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Formats rows of cells into left-aligned columns
#[derive(Debug, Clone)]
pub struct TableWriter {
    headers: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableWriter {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let widths = headers.iter().map(|h| h.chars().count()).collect();

        Self {
            headers,
            widths,
            rows: Vec::new(),
        }
    }

    /// Adds a row; missing cells are blank and surplus cells are dropped.
    pub fn add_row(&mut self, cells: Vec<String>) {
        let mut row = cells;
        row.resize(self.headers.len(), String::new());

        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(row);
    }

    fn format_line(&self, cells: &[String], separator: &str) -> String {
        cells
            .iter()
            .zip(&self.widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn lines(&self, separator: &str) -> Vec<String> {
        let total = self.widths.iter().sum::<usize>()
            + separator.len() * self.headers.len().saturating_sub(1);

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.format_line(&self.headers, separator));
        lines.push("-".repeat(total));
        for row in &self.rows {
            lines.push(self.format_line(row, separator));
        }
        lines
    }
}
