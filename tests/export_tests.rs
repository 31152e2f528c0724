mod common;

use calamine::{Data, Reader, open_workbook_auto};
use common::{put_sheet, strings, temp_out};
use flextracker::db::Workbook;
use flextracker::export::{ExportFormat, ExportLogic};
use flextracker::models::CellValue;
use std::fs;

fn staging_workbook() -> Workbook {
    let wb = Workbook::in_memory().unwrap();
    put_sheet(
        &wb,
        "Mail Out",
        &[
            strings(&["ID", "Name", "", "Attendance"]),
            strings(&["1002", "Chen, Li", "x", "#N/A"]),
            strings(&["1003", "Ortiz", "", "#N/A"]),
        ],
    );
    wb
}

#[test]
fn test_export_csv_keeps_column_order() {
    let wb = staging_workbook();
    let out = temp_out("export_csv_order", "csv");

    let rows = ExportLogic::export(&wb, "Mail Out", ExportFormat::Csv, &out, true).unwrap();

    assert_eq!(rows, 2);
    let content = fs::read_to_string(&out).expect("read exported csv");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "ID,Name,C,Attendance");
    assert_eq!(lines[1], "1002,\"Chen, Li\",x,#N/A");
    assert_eq!(lines[2], "1003,Ortiz,,#N/A");
}

#[test]
fn test_export_json_uses_headers_as_keys() {
    let wb = staging_workbook();
    let out = temp_out("export_json_keys", "json");

    ExportLogic::export(&wb, "Mail Out", ExportFormat::Json, &out, true).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let records = json.as_array().expect("array of records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["ID"], "1002");
    assert_eq!(records[1]["Attendance"], "#N/A");
    assert_eq!(records[1]["C"], "");
}

#[test]
fn test_export_xlsx_is_readable() {
    let wb = staging_workbook();
    let sheet = wb.require_sheet("Mail Out").unwrap();
    wb.set_value(&sheet, 2, 2, CellValue::Number(7.0)).unwrap();
    let out = temp_out("export_xlsx_readable", "xlsx");

    ExportLogic::export(&wb, "Mail Out", ExportFormat::Xlsx, &out, true).unwrap();

    let mut book = open_workbook_auto(&out).expect("open exported xlsx");
    let range = book.worksheet_range("Mail Out").expect("sheet present");
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("ID".to_string())));
    assert_eq!(range.get_value((2, 2)), Some(&Data::Float(7.0)));
}

#[test]
fn test_export_empty_sheet_writes_nothing() {
    let wb = Workbook::in_memory().unwrap();
    wb.get_or_create_sheet("Mail Out").unwrap();
    let out = temp_out("export_empty", "csv");

    let rows = ExportLogic::export(&wb, "Mail Out", ExportFormat::Csv, &out, true).unwrap();

    assert_eq!(rows, 0);
    assert!(fs::metadata(&out).is_err());
}

#[test]
fn test_export_records_log_entry() {
    let wb = staging_workbook();
    let out = temp_out("export_logged", "csv");

    ExportLogic::export(&wb, "Mail Out", ExportFormat::Csv, &out, true).unwrap();

    let entries = flextracker::db::log::load_entries(&wb.conn).unwrap();
    assert!(entries.iter().any(|e| e.operation == "export" && e.target == "Mail Out"));
}
