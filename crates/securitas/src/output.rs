//! Terminal output for command results.
//!
//! A [`Printer`] is built once from the global flags and carries the
//! `--output` format, `--quiet`, and `--color` decisions. Results go to
//! stdout; notices (login banners, cancellations) go to stderr.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

/// Format-aware writer for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Printer {
    format: OutputFormat,
    color: ColorMode,
    quiet: bool,
}

impl Printer {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            format: global.output.clone(),
            color: global.color.clone(),
            quiet: global.quiet,
        }
    }

    /// Print a collection: one table row per item, one key per line in
    /// plain mode, or the items themselves in a structured format.
    pub fn list<T, R>(&self, items: &[T], row: impl Fn(&T) -> R, key: impl Fn(&T) -> String)
    where
        T: Serialize,
        R: Tabled,
    {
        let text = match self.format {
            OutputFormat::Table => table(items.iter().map(row)),
            OutputFormat::Plain => items.iter().map(key).collect::<Vec<_>>().join("\n"),
            _ => self.encode(items),
        };
        self.emit(&text);
    }

    /// Print one result: `human` renders the table view, `key` the plain one.
    pub fn item<T: Serialize>(
        &self,
        item: &T,
        human: impl FnOnce(&T, bool) -> String,
        key: impl FnOnce(&T) -> String,
    ) {
        let text = match self.format {
            OutputFormat::Table => human(item, self.paints(&io::stdout())),
            OutputFormat::Plain => key(item),
            _ => self.encode(item),
        };
        self.emit(&text);
    }

    /// Print a bare value regardless of format (e.g. a path).
    pub fn value(&self, text: &str) {
        self.emit(text);
    }

    /// Status line on stderr; green when `success`, yellow otherwise.
    pub fn notice(&self, text: &str, success: bool) {
        if self.quiet {
            return;
        }
        let line = paint(text, success, self.paints(&io::stderr()));
        let _ = writeln!(io::stderr().lock(), "{line}");
    }

    fn paints(&self, stream: &impl IsTerminal) -> bool {
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stream.is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let encoded = match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
            OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
            _ => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        };
        encoded.unwrap_or_else(|e| format!("error: could not encode output: {e}"))
    }

    fn emit(&self, text: &str) {
        if self.quiet || text.is_empty() {
            return;
        }
        let _ = writeln!(io::stdout().lock(), "{}", text.trim_end_matches('\n'));
    }
}

/// Rounded table over `rows`.
pub fn table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Color `text` green or yellow when `color` is set.
pub fn paint(text: &str, success: bool, color: bool) -> String {
    match (color, success) {
        (false, _) => text.to_owned(),
        (true, true) => text.green().to_string(),
        (true, false) => text.yellow().to_string(),
    }
}
