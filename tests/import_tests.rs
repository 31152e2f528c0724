mod common;

use common::{
    attendance_header, attendance_row, default_config, mailbox_with_reports, sheet_text, temp_dir, write_message,
    xlsx_bytes,
};
use flextracker::core::import::{ImportLogic, ImportOutcome, identify};
use flextracker::db::Workbook;
use flextracker::db::log::load_entries;
use flextracker::mail::DirectoryMailbox;
use flextracker::models::ReportKind;

fn note_a1(wb: &Workbook, sheet: &str) -> String {
    let sheet = wb.require_sheet(sheet).unwrap();
    wb.note(&sheet, 0, 0).unwrap().unwrap_or_default()
}

#[test]
fn test_import_all_three_reports() {
    let root = mailbox_with_reports("import_all");
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();
    let cfg = default_config();

    let summary = ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    assert_eq!(summary.success_count(), 3);
    assert!(summary.missing_subjects().is_empty());
    assert!(summary.failed_kinds().is_empty());

    // Attendance keeps only period "02" rows.
    let att = sheet_text(&wb, &cfg.reports.attendance.sheet);
    let ids: Vec<&str> = att.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["Student Id", "1001", "1004"]);

    // Courses are reordered to the target layout.
    let courses = sheet_text(&wb, &cfg.reports.courses.sheet);
    assert_eq!(courses[0], cfg.reports.courses.target_columns);
    assert_eq!(courses[1][0], "1001");
    assert_eq!(courses[1][6], "Ms. Rivera");

    let contacts = sheet_text(&wb, &cfg.reports.contacts.sheet);
    assert_eq!(contacts.len(), 3);

    assert!(note_a1(&wb, &cfg.reports.attendance.sheet).starts_with("Successfully imported on"));
    assert!(note_a1(&wb, &cfg.reports.attendance.sheet).contains("from email dated 2025-11-03 07:00"));
}

#[test]
fn test_unmatched_course_column_is_flagged() {
    // The report header says "Instructor ID"; the target list wants "Instructor Id".
    let root = mailbox_with_reports("import_flagged");
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();
    let cfg = default_config();

    let summary = ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    match summary.outcome(ReportKind::Courses) {
        Some(ImportOutcome::Imported { missing_columns, .. }) => {
            assert_eq!(missing_columns, &vec!["Instructor Id".to_string()]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(note_a1(&wb, &cfg.reports.courses.sheet).contains("Missing columns: Instructor Id"));
    let courses = sheet_text(&wb, &cfg.reports.courses.sheet);
    assert_eq!(courses[1][7], "");
}

#[test]
fn test_missing_reports_do_not_stop_the_others() {
    let cfg = default_config();
    let root = temp_dir("import_missing");
    let rows = vec![attendance_header(), attendance_row("1001", "02", "P")];
    write_message(
        &root,
        "att",
        &cfg.reports.attendance.subject,
        "2025-11-03T07:00:00-08:00",
        Some(("att.xlsx", &xlsx_bytes(&rows, &[]))),
    );
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();

    let summary = ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    assert_eq!(summary.success_count(), 1);
    assert_eq!(
        summary.missing_subjects(),
        vec![cfg.reports.courses.subject.as_str(), cfg.reports.contacts.subject.as_str()]
    );
    let note = note_a1(&wb, &cfg.reports.courses.sheet);
    assert!(note.contains(&format!("Report not found: {}", cfg.reports.courses.subject)));
}

#[test]
fn test_broken_attachment_fails_only_its_report() {
    let cfg = default_config();
    let root = mailbox_with_reports("import_broken");
    write_message(
        &root,
        "con-2",
        &cfg.reports.contacts.subject,
        "2025-11-04T07:10:00-08:00",
        Some(("contacts.xlsx", b"this is not a workbook")),
    );
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();

    let summary = ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    assert_eq!(summary.success_count(), 2);
    assert_eq!(summary.failed_kinds(), vec![ReportKind::Contacts]);
    assert!(note_a1(&wb, &cfg.reports.contacts.sheet).contains("Failed to convert attachment"));
}

#[test]
fn test_message_without_spreadsheet_fails() {
    let cfg = default_config();
    let root = temp_dir("import_no_attachment");
    write_message(&root, "att", &cfg.reports.attendance.subject, "2025-11-03T07:00:00-08:00", None);
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();

    let summary = ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    match summary.outcome(ReportKind::Attendance) {
        Some(ImportOutcome::Failed { error }) => assert!(error.contains("No spreadsheet attachments")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_reimport_replaces_previous_rows() {
    let cfg = default_config();
    let root = mailbox_with_reports("import_replace");
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();
    ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    let rows = vec![attendance_header(), attendance_row("2001", "02", "A")];
    write_message(
        &root,
        "att-2",
        &cfg.reports.attendance.subject,
        "2025-11-04T07:00:00-08:00",
        Some(("bulletin.xlsx", &xlsx_bytes(&rows, &[0]))),
    );
    ImportLogic::run(&wb, &cfg, &mailbox).unwrap();

    let att = sheet_text(&wb, &cfg.reports.attendance.sheet);
    assert_eq!(att.len(), 2);
    assert_eq!(att[1][0], "2001");
}

#[test]
fn test_every_outcome_is_audited() {
    let root = mailbox_with_reports("import_audit");
    let mailbox = DirectoryMailbox::open(&root).unwrap();
    let wb = Workbook::in_memory().unwrap();

    ImportLogic::run(&wb, &default_config(), &mailbox).unwrap();

    let imports: Vec<String> = load_entries(&wb.conn)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "import")
        .map(|e| e.target)
        .collect();
    assert_eq!(imports, vec!["attendance", "courses", "contacts"]);
}

#[test]
fn test_identify_maps_subjects_to_kinds() {
    let cfg = default_config();
    let forwarded = format!("Fwd: {}", cfg.reports.contacts.subject);

    assert_eq!(identify(&cfg, &cfg.reports.attendance.subject), Some(ReportKind::Attendance));
    assert_eq!(identify(&cfg, &forwarded), Some(ReportKind::Contacts));
    assert_eq!(identify(&cfg, "Lunch menu"), None);
}
