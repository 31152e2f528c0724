//! Grid rendering for `sheet show`: column letters across the top, row
//! numbers down the side, widths measured in terminal cells.

use crate::models::column::column_letter;
use crate::utils::colors::{GREY, RESET, colorize_cell};
use unicode_width::UnicodeWidthStr;

/// Cells wider than this are cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 40;

pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Label printed in the gutter for each row (1-based sheet row numbers).
    pub row_labels: Vec<String>,
}

impl Table {
    /// Table for a sheet grid whose first row is `first_row` (zero-based).
    pub fn for_grid(grid: Vec<Vec<String>>, first_row: usize) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let headers = (0..width).map(column_letter).collect();
        let row_labels = (0..grid.len())
            .map(|i| (first_row + i + 1).to_string())
            .collect();
        Self {
            headers,
            rows: grid,
            row_labels,
        }
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.width().min(MAX_CELL_WIDTH));
                }
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let gutter = self.row_labels.iter().map(|l| l.width()).max().unwrap_or(1);
        let mut out = String::new();

        // Header
        out.push_str(&format!("{GREY}{}{RESET} ", " ".repeat(gutter)));
        for (h, w) in self.headers.iter().zip(&widths) {
            out.push_str(&format!("{GREY}{}{RESET} ", pad(h, *w)));
        }
        out.push('\n');

        // Rows
        for (label, row) in self.row_labels.iter().zip(&self.rows) {
            out.push_str(&format!("{GREY}{}{RESET} ", pad_left(label, gutter)));
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let shown = truncate(cell, *w);
                let padding = w.saturating_sub(shown.width());
                out.push_str(&colorize_cell(&shown));
                out.push_str(&" ".repeat(padding + 1));
            }
            out.push('\n');
        }

        out
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(s.width())))
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{s}", " ".repeat(width.saturating_sub(s.width())))
}

fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    for c in s.chars() {
        let next = format!("{out}{c}");
        if next.width() + 1 > width {
            break;
        }
        out = next;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_column_letters() {
        let t = Table::for_grid(vec![vec!["a".into(), "b".into(), "c".into()]], 0);
        assert_eq!(t.headers, vec!["A", "B", "C"]);
        assert_eq!(t.row_labels, vec!["1"]);
    }

    #[test]
    fn long_cells_are_cut() {
        let long = "x".repeat(80);
        let cut = truncate(&long, MAX_CELL_WIDTH);
        assert_eq!(cut.width(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
    }
}
