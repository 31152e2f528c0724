#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use flextracker::config::Config;
use flextracker::db::Workbook;
use flextracker::models::{CellValue, Row};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const SENDER: &str = "Counselor <counselor@school.org>";

/// Binary under test, with HOME pointed at a scratch folder so a real
/// ~/.flextracker never leaks into a test.
pub fn fxt() -> Command {
    let mut cmd = cargo_bin_cmd!("flextracker");
    let home = env::temp_dir().join("flextracker_test_home");
    fs::create_dir_all(&home).ok();
    cmd.env("HOME", &home).env_remove("RUST_LOG");
    cmd
}

/// Create a unique test workbook path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_flextracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh empty directory under the temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("{}_flextracker", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

pub fn default_config() -> Config {
    Config::default()
}

// ---------------------------
// Rows in the school's layouts
// ---------------------------

fn blank(width: usize) -> Vec<String> {
    vec![String::new(); width]
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Attendance bulletin: ID in A, period in J, code in K.
pub fn attendance_header() -> Vec<String> {
    strings(&[
        "Student Id", "Student Name", "Grade", "Date", "Day", "Teacher", "Room", "Course", "Section", "Period", "Code",
    ])
}

pub fn attendance_row(id: &str, period: &str, code: &str) -> Vec<String> {
    let mut r = blank(11);
    r[0] = id.to_string();
    r[1] = format!("Student {id}");
    r[9] = period.to_string();
    r[10] = code.to_string();
    r
}

/// Course list as COGNOS sends it (before reordering).
pub fn course_source_header() -> Vec<String> {
    strings(&[
        "Student Name", "Student Id", "Grade", "9th Grd Entry", "Period", "Description", "Room", "Instructor",
        "Instructor ID", "Instructor Email",
    ])
}

pub fn course_source_row(id: &str, teacher: &str) -> Vec<String> {
    strings(&[
        format!("Student {id}").as_str(), id, "11", "2022", "02", "English 11", "B204", teacher, "T-9", "t@school.org",
    ])
}

/// Course sheet after reordering: ID in A, instructor in G.
pub fn course_header() -> Vec<String> {
    Config::default().reports.courses.target_columns
}

pub fn course_row(id: &str, teacher: &str) -> Vec<String> {
    strings(&[
        id, format!("Student {id}").as_str(), "11", "02", "English 11", "B204", teacher, "T-9", "t@school.org",
    ])
}

/// Contact info: ID in B, guardian 1 in G, guardian 2 in K, student in N.
pub fn contact_header() -> Vec<String> {
    let mut r = blank(14);
    r[1] = "Student Id".into();
    r[6] = "Guardian 1 Email".into();
    r[10] = "Guardian 2 Email".into();
    r[13] = "Student Email".into();
    r
}

pub fn contact_row(id: &str, student: &str, g1: &str, g2: &str) -> Vec<String> {
    let mut r = blank(14);
    r[0] = format!("Student {id}");
    r[1] = id.to_string();
    r[6] = g1.to_string();
    r[10] = g2.to_string();
    r[13] = student.to_string();
    r
}

/// FlexiSched paste: two header rows, columns A..L with the comment in L.
pub fn roster_headers() -> Vec<Vec<String>> {
    let mut first = blank(12);
    first[0] = "Flex Absences Report".into();
    let second = strings(&[
        "ID", "First Name", "Last Name", "Grad Year", "Flex Name", "Type", "Request", "Day", "Period", "Date",
        "Flex Status", "Comment",
    ]);
    vec![first, second]
}

pub fn roster_row(id: &str, comment: &str) -> Vec<String> {
    strings(&[
        id, "First", format!("Last{id}").as_str(), "2026", "Study Hall", "Flex", "", "Mon", "Flex", "11/3/2025", "Absent",
        comment,
    ])
}

pub fn roster_sheet(ids: &[&str]) -> Vec<Vec<String>> {
    let mut rows = roster_headers();
    rows.extend(ids.iter().map(|id| roster_row(id, "")));
    rows
}

// ---------------------------
// Workbook helpers
// ---------------------------

pub fn to_rows(rows: &[Vec<String>]) -> Vec<Row> {
    rows.iter()
        .map(|r| r.iter().map(|s| CellValue::text(s.clone())).collect())
        .collect()
}

/// Write text rows into a (new or existing) sheet from A1.
pub fn put_sheet(wb: &Workbook, name: &str, rows: &[Vec<String>]) {
    let sheet = wb.get_or_create_sheet(name).expect("sheet");
    wb.set_range(&sheet, 0, 0, &to_rows(rows)).expect("write sheet");
}

pub fn sheet_text(wb: &Workbook, name: &str) -> Vec<Vec<String>> {
    let sheet = wb.require_sheet(name).expect("sheet exists");
    wb.values(&sheet).expect("values").text_rows()
}

/// In-memory workbook with the three source sheets already imported.
pub fn workbook_with_sources(
    attendance: &[Vec<String>],
    courses: &[Vec<String>],
    contacts: &[Vec<String>],
) -> Workbook {
    let cfg = default_config();
    let wb = Workbook::in_memory().expect("workbook");

    let mut rows = vec![attendance_header()];
    rows.extend_from_slice(attendance);
    put_sheet(&wb, &cfg.reports.attendance.sheet, &rows);

    let mut rows = vec![course_header()];
    rows.extend_from_slice(courses);
    put_sheet(&wb, &cfg.reports.courses.sheet, &rows);

    let mut rows = vec![contact_header()];
    rows.extend_from_slice(contacts);
    put_sheet(&wb, &cfg.reports.contacts.sheet, &rows);

    wb
}

// ---------------------------
// Attachments and mailbox fixtures
// ---------------------------

/// XLSX file bytes; columns listed in `numeric_cols` are written as numbers.
pub fn xlsx_bytes(rows: &[Vec<String>], numeric_cols: &[usize]) -> Vec<u8> {
    let mut book = rust_xlsxwriter::Workbook::new();
    let sheet = book.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let (r, c) = (r as u32, c as u16);
            match value.parse::<f64>() {
                Ok(n) if r > 0 && numeric_cols.contains(&(c as usize)) => {
                    sheet.write_number(r, c, n).expect("write number");
                }
                _ => {
                    sheet.write_string(r, c, value.as_str()).expect("write string");
                }
            }
        }
    }
    book.save_to_buffer().expect("xlsx buffer")
}

/// One message folder with an optional attachment.
pub fn write_message(root: &Path, id: &str, subject: &str, date: &str, attachment: Option<(&str, &[u8])>) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).expect("message dir");

    let mut yaml = format!("from: \"{SENDER}\"\nsubject: \"{subject}\"\ndate: {date}\n");
    if let Some((name, bytes)) = attachment {
        fs::write(dir.join(name), bytes).expect("attachment");
        yaml.push_str(&format!("attachments:\n  - file: {name}\n"));
    } else {
        yaml.push_str("attachments: []\n");
    }
    fs::write(dir.join("message.yaml"), yaml).expect("message.yaml");
}

/// Mailbox holding all three reports as XLSX attachments.
pub fn mailbox_with_reports(name: &str) -> PathBuf {
    let cfg = default_config();
    let root = temp_dir(name);

    let mut attendance = vec![attendance_header()];
    attendance.push(attendance_row("1001", "02", "P"));
    attendance.push(attendance_row("1002", "2", "A"));
    attendance.push(attendance_row("1003", "03", "P"));
    attendance.push(attendance_row("1004", "02", "T"));
    write_message(
        &root,
        "att-1",
        &cfg.reports.attendance.subject,
        "2025-11-03T07:00:00-08:00",
        Some(("bulletin.xlsx", &xlsx_bytes(&attendance, &[0]))),
    );

    let mut courses = vec![course_source_header()];
    courses.push(course_source_row("1001", "Ms. Rivera"));
    courses.push(course_source_row("1002", "Mr. Chen"));
    courses.push(course_source_row("1004", "Mr. Chen"));
    write_message(
        &root,
        "crs-1",
        &cfg.reports.courses.subject,
        "2025-11-03T07:05:00-08:00",
        Some(("courses.xlsx", &xlsx_bytes(&courses, &[1]))),
    );

    let mut contacts = vec![contact_header()];
    contacts.push(contact_row("1001", "s1001@school.org", "p1001@home.org", ""));
    contacts.push(contact_row("1002", "s1002@school.org", "p1002@home.org", "q1002@home.org"));
    write_message(
        &root,
        "con-1",
        &cfg.reports.contacts.subject,
        "2025-11-03T07:10:00-08:00",
        Some(("contacts.xlsx", &xlsx_bytes(&contacts, &[1]))),
    );

    root
}
