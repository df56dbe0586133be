use std::io::Write;

use databrowse_core::table::MISSING_VALUE;
use databrowse_core::{CitationList, DataTable, OptionEntry, ResultsView};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print choices as `id  label`, ids right-aligned.
pub fn print_options(
    w: &mut dyn Write,
    entries: &[OptionEntry],
    color: ColorMode,
) -> std::io::Result<()> {
    if entries.is_empty() {
        writeln!(w, "(none)")?;
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.value.chars().count())
        .max()
        .unwrap_or(0);
    for entry in entries {
        let value = format!("{:>width$}", entry.value);
        if color.enabled() {
            writeln!(w, "{}  {}", value.cyan(), entry.label)?;
        } else {
            writeln!(w, "{}  {}", value, entry.label)?;
        }
    }
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Print the result table with aligned columns.
pub fn print_table(w: &mut dyn Write, table: &DataTable, color: ColorMode) -> std::io::Result<()> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, &width)| pad(h, width))
        .collect::<Vec<_>>()
        .join(" | ");
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }

    let rule = widths
        .iter()
        .map(|&width| "-".repeat(width))
        .collect::<Vec<_>>()
        .join("-+-");
    writeln!(w, "{}", rule)?;

    for row in &table.rows {
        let cells = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let padded = pad(cell, width);
                if color.enabled() && cell == MISSING_VALUE {
                    padded.dimmed().to_string()
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(w, "{}", cells)?;
    }
    Ok(())
}

/// Print the numbered reference list.
pub fn print_citations(
    w: &mut dyn Write,
    citations: &CitationList,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "References".bold())?;
    } else {
        writeln!(w, "References")?;
    }
    for item in &citations.items {
        writeln!(w, "  {}", item.text)?;
    }
    Ok(())
}

/// Draws submit results on stdout; alerts go to stderr.
pub struct TerminalView {
    color: ColorMode,
}

impl TerminalView {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }
}

impl ResultsView for TerminalView {
    fn alert(&self, message: &str) {
        if self.color.enabled() {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{}", message);
        }
    }

    fn show_table(&self, table: &DataTable) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = print_table(&mut out, table, self.color) {
            tracing::warn!(error = %e, "failed to write table");
        }
    }

    // Output is append-only.
    fn clear_citations(&self) {}

    fn show_citations(&self, citations: &CitationList) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = print_citations(&mut out, citations, self.color) {
            tracing::warn!(error = %e, "failed to write citations");
        }
    }
}
