// src/export/model.rs

use crate::models::column::column_letter;
use crate::models::{CellValue, Dataset, Row};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A sheet flattened for export: first row as headers, the rest as records.
#[derive(Clone, Debug, Default)]
pub struct SheetExport {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl SheetExport {
    /// Blank headers fall back to the column letter so every JSON key is set.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let split = dataset.split();
        let headers = split
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.trimmed_text();
                if h.is_empty() { column_letter(i) } else { h }
            })
            .collect();
        Self {
            headers,
            rows: split.rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Records serialized as objects keyed by header, in column order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|row| Record {
            headers: &self.headers,
            row,
        })
    }
}

pub struct Record<'a> {
    headers: &'a [String],
    row: &'a [CellValue],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (i, header) in self.headers.iter().enumerate() {
            let value = self.row.get(i).unwrap_or(&CellValue::Empty);
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}
