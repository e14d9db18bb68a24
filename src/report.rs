// src/report.rs

//! Status reporting
//!
//! The reconciliation engine is presentation-agnostic: it emits status table
//! rows, download progress, and final counts through the [`Reporter`] trait.
//! [`ConsoleReporter`] renders those to stdout as fixed-width tables and a
//! carriage-return progress bar.

use crate::reconcile::{ReconcileRecord, Summary};
use std::io::{self, Write};

/// Minimum column width in rendered tables
const MIN_COLUMN_WIDTH: usize = 8;

/// Progress bar width in characters
const BAR_WIDTH: usize = 40;

/// Sink for the reconciliation engine's status output
pub trait Reporter {
    /// Render the per-mod status table
    fn table(&mut self, title: &str, records: &[ReconcileRecord]);

    /// Report download progress; `total` is 0 when the size is unknown
    fn progress(&mut self, label: &str, received: u64, total: u64);

    /// Emit a free-form status line
    fn note(&mut self, message: &str);

    /// Render the final counts
    fn summary(&mut self, summary: &Summary);
}

/// Renders status output to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

const HEADERS: [&str; 4] = ["Mod ID", "Version", "Name", "Status"];

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn table(&mut self, title: &str, records: &[ReconcileRecord]) {
        let rows: Vec<[String; 4]> = records
            .iter()
            .map(|record| {
                [
                    record.id.clone(),
                    record.version.clone(),
                    record.name.clone(),
                    record.status.to_string(),
                ]
            })
            .collect();

        let mut widths = [0usize; 4];
        for (i, header) in HEADERS.iter().enumerate() {
            let cell_max = rows.iter().map(|row| row[i].len()).max().unwrap_or(0);
            widths[i] = header.len().max(cell_max).max(MIN_COLUMN_WIDTH);
        }
        let total_width = widths.iter().sum::<usize>() + (HEADERS.len() - 1) * 3;

        println!("{title}");
        println!("{}", "-".repeat(total_width));
        println!("{}", format_row(&HEADERS.map(String::from), &widths));
        println!("{}", "-".repeat(total_width));
        for row in &rows {
            println!("{}", format_row(row, &widths));
        }
        println!("{}", "-".repeat(total_width));
    }

    fn progress(&mut self, label: &str, received: u64, total: u64) {
        if total == 0 {
            return;
        }
        let ratio = (received as f64 / total as f64).min(1.0);
        let filled = (ratio * BAR_WIDTH as f64).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
        let percent = (ratio * 100.0).round() as u64;
        print!("\r{label} [{bar}] {percent:>3}%");
        if received >= total {
            println!();
        }
        let _ = io::stdout().flush();
    }

    fn note(&mut self, message: &str) {
        println!("{message}");
    }

    fn summary(&mut self, summary: &Summary) {
        println!(
            "Updated: {}, Removed old: {}, Skipped: {}",
            summary.updated, summary.removed, summary.skipped
        );
    }
}

/// Discards all output; used by tests and quiet runs
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn table(&mut self, _title: &str, _records: &[ReconcileRecord]) {}
    fn progress(&mut self, _label: &str, _received: u64, _total: u64) {}
    fn note(&mut self, _message: &str) {}
    fn summary(&mut self, _summary: &Summary) {}
}

/// Pad or truncate cells to their column width
fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            if cell.len() > width {
                format!("{}...", &cell[..width.saturating_sub(3)])
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_pads_and_truncates() {
        let widths = [8, 8, 8, 8];
        let row = [
            "short".to_string(),
            "averylongcellvalue".to_string(),
            "exactly8".to_string(),
            "x".to_string(),
        ];

        let rendered = format_row(&row, &widths);
        assert_eq!(rendered, "short    | avery... | exactly8 | x       ");
    }
}
