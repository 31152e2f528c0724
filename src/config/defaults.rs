//! Built-in configuration: the school's report subjects and sheet layout.

use super::{
    AttendanceReport, Config, ContactReport, CourseReport, MailboxSettings, RosterSettings,
    StagingSettings,
};
use crate::models::Column;

pub const ATTENDANCE_SUBJECT: &str =
    "A new version of My ATT - Attendance Bulletin is available";
pub const COURSES_SUBJECT: &str =
    "A new version of My Student CY List - Course, Teacher & Room is available";
pub const CONTACTS_SUBJECT: &str = "A new version of My Student CY List - Student Email/Contact Info - Next Year Option is available";

pub const ROSTER_NAME_PATTERN: &str = r"\d+\.\d+\s+flex absences";

const COURSE_ORIGINAL_COLUMNS: [&str; 10] = [
    "Student Name",
    "Student Id",
    "Grade",
    "9th Grd Entry",
    "Period",
    "Description",
    "Room",
    "Instructor",
    "Instructor ID",
    "Instructor Email",
];

const COURSE_TARGET_COLUMNS: [&str; 9] = [
    "Student Id",
    "Student Name",
    "Grade",
    "Period",
    "Description",
    "Room",
    "Instructor",
    "Instructor Id",
    "Instructor Email",
];

const ROSTER_HEADER_LABELS: [&str; 6] = [
    "Comment",
    "Attendance Code",
    "2nd Period Teacher",
    "Student Email",
    "Guardian 1 Email",
    "Guardian 2 Email",
];

const STAGING_HEADERS: [&str; 17] = [
    "ID",
    "First Name",
    "Last Name",
    "Grad Year",
    "Flex Name",
    "Type",
    "Request",
    "Day",
    "Period",
    "Date",
    "Flex Status",
    "Comment",
    "Brennan Attendance",
    "2nd Period Teacher",
    "Student Email",
    "Guardian 1 Email",
    "Guardian 2 Email",
];

const fn col(index: usize) -> Column {
    Column::at(index)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: Config::workbook_file().to_string_lossy().to_string(),
            mailbox: MailboxSettings::default(),
            reports: Default::default(),
            roster: RosterSettings::default(),
            staging: StagingSettings::default(),
        }
    }
}

impl Default for MailboxSettings {
    fn default() -> Self {
        Self {
            path: Config::mailbox_dir().to_string_lossy().to_string(),
            // Empty matches any sender.
            from: String::new(),
        }
    }
}

impl Default for AttendanceReport {
    fn default() -> Self {
        Self {
            subject: ATTENDANCE_SUBJECT.to_string(),
            sheet: "BHS attendance".to_string(),
            id_column: col(0),      // A
            code_column: col(10),   // K
            period_column: col(9),  // J
            period_value: "02".to_string(),
        }
    }
}

impl Default for CourseReport {
    fn default() -> Self {
        Self {
            subject: COURSES_SUBJECT.to_string(),
            sheet: "2nd period default".to_string(),
            id_column: col(0),      // A
            teacher_column: col(6), // G
            original_columns: strings(&COURSE_ORIGINAL_COLUMNS),
            target_columns: strings(&COURSE_TARGET_COLUMNS),
        }
    }
}

impl Default for ContactReport {
    fn default() -> Self {
        Self {
            subject: CONTACTS_SUBJECT.to_string(),
            sheet: "contact info".to_string(),
            id_column: col(1),               // B
            student_email_column: col(13),   // N
            guardian1_email_column: col(6),  // G
            guardian2_email_column: col(10), // K
        }
    }
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            name_pattern: ROSTER_NAME_PATTERN.to_string(),
            name_suffix: "flex absences".to_string(),
            header_rows: 2,
            id_column: col(0),               // A
            comment_column: col(11),         // L
            attendance_code_column: col(12), // M
            teacher_column: col(13),         // N
            contact_columns_start: col(14),  // O
            header_band_start: col(11),      // L
            header_labels: strings(&ROSTER_HEADER_LABELS),
        }
    }
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            sheet: "Mail Out".to_string(),
            headers: strings(&STAGING_HEADERS),
        }
    }
}
