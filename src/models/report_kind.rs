use serde::Serialize;
use std::fmt;

/// The three COGNOS reports the importer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportKind {
    Attendance,
    Courses,
    Contacts,
}

impl ReportKind {
    /// Processing order of the importer.
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Attendance,
        ReportKind::Courses,
        ReportKind::Contacts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "attendance",
            ReportKind::Courses => "courses",
            ReportKind::Contacts => "contacts",
        }
    }

    /// Convert CLI / log string → enum
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "attendance" => Some(ReportKind::Attendance),
            "courses" => Some(ReportKind::Courses),
            "contacts" => Some(ReportKind::Contacts),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
