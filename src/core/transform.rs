//! Per-report reshaping between extraction and persistence.

use crate::errors::{AppError, AppResult};
use crate::models::dataset::cell_at;
use crate::models::{CellValue, Column, Dataset, Row};
use std::collections::HashSet;
use tracing::warn;

/// Keep the header row and the rows whose `column` reads exactly `value`
/// once trimmed. No numeric coercion: "2" does not match "02".
pub fn filter_by_period(dataset: Dataset, column: Column, value: &str) -> Dataset {
    let wanted = value.trim();
    let mut rows = dataset.rows.into_iter();
    let Some(header) = rows.next() else {
        return Dataset::default();
    };

    let mut out = vec![header];
    out.extend(rows.filter(|row| {
        let cell = cell_at(row, column.index());
        !cell.is_empty() && cell.trimmed_text() == wanted
    }));
    Dataset::new(out)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReorderOutcome {
    pub dataset: Dataset,
    /// Target names with no matching source header (emitted as empty columns).
    pub missing: Vec<String>,
}

/// Rebuild the dataset with exactly the `target` columns, in order.
/// Each target takes the last source column whose trimmed header equals it.
pub fn reorder_columns(dataset: Dataset, original: &[String], target: &[String]) -> AppResult<ReorderOutcome> {
    validate_mapping(original, target)?;

    if dataset.is_empty() {
        return Ok(ReorderOutcome {
            dataset,
            missing: Vec::new(),
        });
    }

    let split = dataset.split();
    let header_text: Vec<String> = split.headers.iter().map(CellValue::trimmed_text).collect();
    let position = |name: &str| header_text.iter().rposition(|h| h == name.trim());

    for name in original {
        if position(name).is_none() {
            warn!(column = %name, "expected source column not found in report");
        }
    }

    let mut missing = Vec::new();
    let indices: Vec<Option<usize>> = target
        .iter()
        .map(|name| {
            let idx = position(name);
            if idx.is_none() {
                warn!(column = %name, "target column not found in report, leaving it empty");
                missing.push(name.clone());
            }
            idx
        })
        .collect();

    let mut rows: Vec<Row> = Vec::with_capacity(split.rows.len() + 1);
    rows.push(target.iter().map(|t| CellValue::text(t.clone())).collect());
    for row in &split.rows {
        rows.push(
            indices
                .iter()
                .map(|idx| match idx {
                    Some(i) => cell_at(row, *i).clone(),
                    None => CellValue::Empty,
                })
                .collect(),
        );
    }

    Ok(ReorderOutcome {
        dataset: Dataset::new(rows),
        missing,
    })
}

fn validate_mapping(original: &[String], target: &[String]) -> AppResult<()> {
    if original.is_empty() || target.is_empty() {
        return Err(AppError::ColumnMapping(
            "original and target column lists must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for name in target {
        if !seen.insert(name.trim()) {
            return Err(AppError::ColumnMapping(format!(
                "target column '{name}' is listed twice"
            )));
        }
    }
    Ok(())
}
