//! Tabular dataset: header row(s) followed by data rows.

use crate::models::cell::CellValue;

pub type Row = Vec<CellValue>;

static EMPTY: CellValue = CellValue::Empty;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

/// First row as headers, the rest as data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitDataset {
    pub headers: Row,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset and pad every row to the widest row, so missing
    /// trailing cells read back as empty.
    pub fn new(rows: Vec<Row>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, CellValue::Empty);
                r
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn headers(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows after the first `header_rows` rows.
    pub fn data_rows(&self, header_rows: usize) -> &[Row] {
        self.rows.get(header_rows..).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn split(self) -> SplitDataset {
        let mut rows = self.rows.into_iter();
        match rows.next() {
            Some(headers) => SplitDataset {
                headers,
                rows: rows.collect(),
            },
            None => SplitDataset::default(),
        }
    }

    /// Rows rendered as text, used by CSV export and previews.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(CellValue::as_text).collect())
            .collect()
    }
}

impl SplitDataset {
    pub fn join(self) -> Dataset {
        if self.headers.is_empty() && self.rows.is_empty() {
            return Dataset::default();
        }
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.headers);
        rows.extend(self.rows);
        Dataset::new(rows)
    }
}

/// Cell of a row by index, empty when the row is shorter.
pub fn cell_at(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY)
}
