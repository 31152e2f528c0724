use crate::errors::{AppError, AppResult};
use crate::models::{Column, ReportKind};
use crate::utils::path::expand_tilde;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod defaults;
pub mod layout;

pub use layout::{HeaderBand, RosterLayout};

/// Missing keys fall back to the built-in layout (see `defaults`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workbook: String,
    pub mailbox: MailboxSettings,
    pub reports: ReportsConfig,
    pub roster: RosterSettings,
    pub staging: StagingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxSettings {
    /// Folder holding one sub-folder per message.
    pub path: String,
    /// The user's own address: reports are mailed by COGNOS on their behalf.
    pub from: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub attendance: AttendanceReport,
    pub courses: CourseReport,
    pub contacts: ContactReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceReport {
    pub subject: String,
    pub sheet: String,
    pub id_column: Column,
    pub code_column: Column,
    pub period_column: Column,
    /// Compared as text: "02" does not match "2".
    pub period_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseReport {
    pub subject: String,
    pub sheet: String,
    /// Positions refer to the sheet after reordering.
    pub id_column: Column,
    pub teacher_column: Column,
    pub original_columns: Vec<String>,
    pub target_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactReport {
    pub subject: String,
    pub sheet: String,
    pub id_column: Column,
    pub student_email_column: Column,
    pub guardian1_email_column: Column,
    pub guardian2_email_column: Column,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// Matched case-insensitively against sheet names, e.g. "11.3 flex absences".
    pub name_pattern: String,
    /// Suffix used by `roster new` after the "M.D" date token.
    pub name_suffix: String,
    /// FlexiSched pastes come with two header rows.
    pub header_rows: usize,
    pub id_column: Column,
    pub comment_column: Column,
    pub attendance_code_column: Column,
    pub teacher_column: Column,
    /// First of three adjacent columns: student, guardian 1, guardian 2 email.
    pub contact_columns_start: Column,
    pub header_band_start: Column,
    pub header_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingSettings {
    pub sheet: String,
    pub headers: Vec<String>,
}

/// Subject and destination sheet of one report kind.
#[derive(Debug, Clone, Copy)]
pub struct ReportTarget<'a> {
    pub subject: &'a str,
    pub sheet: &'a str,
}

impl ReportsConfig {
    pub fn target(&self, kind: ReportKind) -> ReportTarget<'_> {
        match kind {
            ReportKind::Attendance => ReportTarget {
                subject: &self.attendance.subject,
                sheet: &self.attendance.sheet,
            },
            ReportKind::Courses => ReportTarget {
                subject: &self.courses.subject,
                sheet: &self.courses.sheet,
            },
            ReportKind::Contacts => ReportTarget {
                subject: &self.contacts.subject,
                sheet: &self.contacts.sheet,
            },
        }
    }

    /// Report kind whose configured subject appears in `subject`.
    pub fn identify(&self, subject: &str) -> Option<ReportKind> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| subject.contains(self.target(*kind).subject))
    }
}

impl RosterSettings {
    pub fn pattern(&self) -> AppResult<Regex> {
        RegexBuilder::new(&self.name_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Config(format!("invalid roster.name_pattern: {e}")))
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("flextracker")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".flextracker")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("flextracker.conf")
    }

    /// Return the full path of the SQLite workbook
    pub fn workbook_file() -> PathBuf {
        Self::config_dir().join("flextracker.sqlite")
    }

    pub fn mailbox_dir() -> PathBuf {
        Self::config_dir().join("mailbox")
    }

    /// Load the configuration from `path` (or the standard location),
    /// falling back to defaults when the standard file does not exist.
    /// An explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let cfg = match path {
            Some(p) => Self::read_file(p)?,
            None => {
                let p = Self::config_file();
                if p.exists() {
                    Self::read_file(&p)?
                } else {
                    Config::default()
                }
            }
        };

        cfg.validate()?;
        Ok(cfg)
    }

    fn read_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut cfg: Config = serde_yaml::from_str(&content)?;
        cfg.workbook = expand_tilde(&cfg.workbook).to_string_lossy().to_string();
        cfg.mailbox.path = expand_tilde(&cfg.mailbox.path).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Check every cross-field constraint once, at load time, so the engine
    /// can index rows without re-validating columns.
    pub fn validate(&self) -> AppResult<()> {
        let mut problems = Vec::new();

        // Roster layout (band, contact triple, pattern)
        if let Err(e) = self.roster.pattern() {
            problems.push(e.to_string());
        }
        if let Err(e) = RosterLayout::from_settings(&self.roster) {
            problems.push(e.to_string());
        }

        // Report column mappings
        let courses = &self.reports.courses;
        if courses.original_columns.is_empty() {
            problems.push("reports.courses.original_columns is empty".to_string());
        }
        if courses.target_columns.is_empty() {
            problems.push("reports.courses.target_columns is empty".to_string());
        }
        if courses.id_column.index() >= courses.target_columns.len()
            || courses.teacher_column.index() >= courses.target_columns.len()
        {
            problems.push(format!(
                "reports.courses id/teacher columns must fall inside the {} target columns",
                courses.target_columns.len()
            ));
        }
        if self.reports.attendance.period_value.trim().is_empty() {
            problems.push("reports.attendance.period_value is empty".to_string());
        }

        // Sheet names
        let mut names = HashSet::new();
        for kind in ReportKind::ALL {
            let target = self.reports.target(kind);
            if target.subject.trim().is_empty() {
                problems.push(format!("reports.{kind}.subject is empty"));
            }
            if !names.insert(target.sheet) {
                problems.push(format!("sheet '{}' is used twice", target.sheet));
            }
        }
        if !names.insert(self.staging.sheet.as_str()) {
            problems.push(format!("sheet '{}' is used twice", self.staging.sheet));
        }
        if self.staging.headers.is_empty() {
            problems.push("staging.headers is empty".to_string());
        }
        if let Ok(pattern) = self.roster.pattern() {
            for name in &names {
                if pattern.is_match(name) {
                    problems.push(format!("sheet '{name}' matches roster.name_pattern"));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Config(problems.join("; ")))
        }
    }

    /// Derived roster positions; only fails on a config that skipped `validate`.
    pub fn roster_layout(&self) -> AppResult<RosterLayout> {
        RosterLayout::from_settings(&self.roster)
    }

    /// Initialize configuration and workbook files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // Workbook name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::workbook_file()
        };

        let config = Config {
            workbook: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            fs::create_dir_all(&config.mailbox.path)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(config)
    }
}
