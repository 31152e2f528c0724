//! ID-keyed lookups over a source sheet. Built per run, never stored.

use crate::models::dataset::cell_at;
use crate::models::{CellValue, Column, Dataset};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct StudentLookup {
    map: HashMap<String, Vec<CellValue>>,
}

impl StudentLookup {
    /// Map trimmed IDs in `id_column` to the values in `value_columns`.
    /// The first `header_rows` rows are skipped, empty IDs are ignored and a
    /// repeated ID keeps its last row.
    pub fn build(dataset: &Dataset, header_rows: usize, id_column: Column, value_columns: &[Column]) -> Self {
        Self::build_filtered(dataset, header_rows, id_column, value_columns, |_| true)
    }

    /// Like `build`, keeping only rows accepted by `keep`.
    pub fn build_filtered<F>(
        dataset: &Dataset,
        header_rows: usize,
        id_column: Column,
        value_columns: &[Column],
        keep: F,
    ) -> Self
    where
        F: Fn(&[CellValue]) -> bool,
    {
        let mut map = HashMap::new();
        if value_columns.is_empty() {
            return Self { map };
        }

        for row in dataset.data_rows(header_rows) {
            let id = cell_at(row, id_column.index()).trimmed_text();
            if id.is_empty() || !keep(row.as_slice()) {
                continue;
            }
            let values = value_columns
                .iter()
                .map(|c| cell_at(row, c.index()).clone())
                .collect();
            map.insert(id, values);
        }

        debug!(entries = map.len(), id_column = %id_column, "lookup built");
        Self { map }
    }

    pub fn get(&self, id: &str) -> Option<&[CellValue]> {
        self.map.get(id.trim()).map(Vec::as_slice)
    }

    /// First value for `id`, when the ID is known.
    pub fn first(&self, id: &str) -> Option<&CellValue> {
        self.get(id).and_then(|v| v.first())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id.trim())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
