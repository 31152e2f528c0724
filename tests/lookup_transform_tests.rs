mod common;

use common::{strings, to_rows};
use flextracker::core::lookup::StudentLookup;
use flextracker::core::transform::{filter_by_period, reorder_columns};
use flextracker::errors::AppError;
use flextracker::models::{CellValue, Column, Dataset};

fn col(letters: &str) -> Column {
    Column::parse(letters).unwrap()
}

fn dataset(rows: &[&[&str]]) -> Dataset {
    let rows: Vec<Vec<String>> = rows.iter().map(|r| strings(r)).collect();
    Dataset::new(to_rows(&rows))
}

#[test]
fn test_lookup_last_duplicate_wins() {
    let ds = dataset(&[
        &["Id", "Code"],
        &["123", "P"],
        &["456", "A"],
        &["123", "T"],
    ]);

    let lookup = StudentLookup::build(&ds, 1, col("A"), &[col("B")]);

    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.first("123"), Some(&CellValue::text("T")));
}

#[test]
fn test_lookup_trims_ids_and_skips_empty_ones() {
    let ds = dataset(&[&["Id", "Code"], &[" 77 ", "P"], &["   ", "X"], &["", "Y"]]);

    let lookup = StudentLookup::build(&ds, 1, col("A"), &[col("B")]);

    assert_eq!(lookup.len(), 1);
    assert!(lookup.contains("77"));
    assert!(!lookup.contains(""));
}

#[test]
fn test_lookup_numeric_ids_match_text() {
    let ds = Dataset::new(vec![
        vec![CellValue::text("Id"), CellValue::text("Code")],
        vec![CellValue::Number(1001.0), CellValue::text("P")],
    ]);

    let lookup = StudentLookup::build(&ds, 1, col("A"), &[col("B")]);

    assert_eq!(lookup.first("1001"), Some(&CellValue::text("P")));
}

#[test]
fn test_lookup_short_rows_give_empty_values() {
    let ds = Dataset::new(vec![
        vec![CellValue::text("Id")],
        vec![CellValue::text("9")],
    ]);

    let lookup = StudentLookup::build(&ds, 1, col("A"), &[col("N"), col("G"), col("K")]);

    assert_eq!(lookup.get("9").unwrap(), &[CellValue::Empty, CellValue::Empty, CellValue::Empty]);
}

#[test]
fn test_lookup_without_data_rows_or_columns_is_empty() {
    let header_only = dataset(&[&["Id", "Code"]]);
    assert!(StudentLookup::build(&header_only, 1, col("A"), &[col("B")]).is_empty());

    let ds = dataset(&[&["Id", "Code"], &["1", "P"]]);
    assert!(StudentLookup::build(&ds, 1, col("A"), &[]).is_empty());
}

#[test]
fn test_lookup_filtered_keeps_only_accepted_rows() {
    let ds = dataset(&[&["Id", "Comment"], &["A", "called home"], &["B", "  "]]);

    let lookup = StudentLookup::build_filtered(&ds, 1, col("A"), &[col("B")], |row| {
        !row.get(1).map(CellValue::is_blank).unwrap_or(true)
    });

    assert!(lookup.contains("A"));
    assert!(!lookup.contains("B"));
}

#[test]
fn test_period_filter_compares_trimmed_text() {
    let ds = dataset(&[
        &["Id", "Period"],
        &["1", "02"],
        &["2", "2"],
        &["3", "02 "],
        &["4", ""],
    ]);

    let out = filter_by_period(ds, col("B"), "02");

    let ids: Vec<String> = out.rows.iter().map(|r| r[0].as_text()).collect();
    assert_eq!(ids, vec!["Id", "1", "3"]);
}

#[test]
fn test_period_filter_does_not_coerce_numbers() {
    let ds = Dataset::new(vec![
        vec![CellValue::text("Id"), CellValue::text("Period")],
        vec![CellValue::text("1"), CellValue::Number(2.0)],
    ]);

    let out = filter_by_period(ds, col("B"), "02");

    assert_eq!(out.len(), 1);
}

#[test]
fn test_reorder_prunes_and_orders_columns() {
    let ds = dataset(&[
        &["Name", "Id", "Grade", "ExtraCol", "Period"],
        &["Ann", "1", "10", "x", "02"],
    ]);

    let out = reorder_columns(
        ds,
        &strings(&["Name", "Id", "Grade", "ExtraCol", "Period"]),
        &strings(&["Id", "Name", "Grade", "Period"]),
    )
    .unwrap();

    assert!(out.missing.is_empty());
    assert_eq!(out.dataset.width(), 4);
    assert_eq!(out.dataset.text_rows(), vec![
        strings(&["Id", "Name", "Grade", "Period"]),
        strings(&["1", "Ann", "10", "02"]),
    ]);
}

#[test]
fn test_reorder_repeated_source_header_takes_last_column() {
    let ds = dataset(&[&["Id", "Name", "Id"], &["first", "Ann", "last"]]);

    let out = reorder_columns(ds, &strings(&["Id", "Name"]), &strings(&["Id", "Name"])).unwrap();

    assert!(out.missing.is_empty());
    assert_eq!(out.dataset.cell(1, 0), &CellValue::text("last"));
    assert_eq!(out.dataset.cell(1, 1), &CellValue::text("Ann"));
}

#[test]
fn test_reorder_absent_target_becomes_empty_column() {
    let ds = dataset(&[&["Id", "Name"], &["1", "Ann"]]);

    let out = reorder_columns(ds, &strings(&["Id", "Name"]), &strings(&["Id", "Room", "Name"])).unwrap();

    assert_eq!(out.missing, strings(&["Room"]));
    assert_eq!(out.dataset.cell(0, 1), &CellValue::text("Room"));
    assert_eq!(out.dataset.cell(1, 1), &CellValue::Empty);
    assert_eq!(out.dataset.cell(1, 2), &CellValue::text("Ann"));
}

#[test]
fn test_reorder_header_match_is_case_sensitive() {
    let ds = dataset(&[&["student id"], &["1"]]);

    let out = reorder_columns(ds, &strings(&["Student Id"]), &strings(&["Student Id"])).unwrap();

    assert_eq!(out.missing, strings(&["Student Id"]));
}

#[test]
fn test_reorder_rejects_empty_mapping() {
    let ds = dataset(&[&["Id"], &["1"]]);
    let err = reorder_columns(ds, &[], &strings(&["Id"])).unwrap_err();
    assert!(matches!(err, AppError::ColumnMapping(_)));
}
