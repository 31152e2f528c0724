//! Roster positions derived from `RosterSettings`, checked once.

use super::RosterSettings;
use crate::errors::{AppError, AppResult};
use crate::models::Column;

/// Canonical derived-column labels anchored in one header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBand {
    pub row: usize,
    pub start: Column,
    pub labels: Vec<String>,
}

impl HeaderBand {
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Column one past the last label.
    pub fn end(&self) -> usize {
        self.start.index() + self.labels.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLayout {
    pub header_rows: usize,
    pub id: Column,
    pub comment: Column,
    pub attendance_code: Column,
    pub teacher: Column,
    /// Student, guardian 1 and guardian 2 email, adjacent.
    pub contacts: [Column; 3],
    pub band: HeaderBand,
}

impl RosterLayout {
    pub fn from_settings(s: &RosterSettings) -> AppResult<Self> {
        if s.header_rows == 0 {
            return Err(AppError::Config(
                "roster.header_rows must be at least 1".to_string(),
            ));
        }
        if s.header_labels.is_empty() {
            return Err(AppError::Config("roster.header_labels is empty".to_string()));
        }

        let start = s.contact_columns_start;
        let contacts = [start, start.offset(1)?, start.offset(2)?];

        let derived = [
            ("attendance_code_column", s.attendance_code_column),
            ("teacher_column", s.teacher_column),
            ("contact_columns_start", contacts[0]),
            ("contact_columns_start + 1", contacts[1]),
            ("contact_columns_start + 2", contacts[2]),
        ];

        // Derived columns are overwritten on every run: they must not land on
        // the ID, the comment, or each other.
        for (i, (name, column)) in derived.iter().enumerate() {
            if *column == s.id_column || *column == s.comment_column {
                return Err(AppError::Config(format!(
                    "roster.{name} ({column}) overlaps the ID or comment column"
                )));
            }
            if let Some((other, _)) = derived[..i].iter().find(|(_, c)| c == column) {
                return Err(AppError::Config(format!(
                    "roster.{name} ({column}) overlaps roster.{other}"
                )));
            }
        }
        if s.id_column == s.comment_column {
            return Err(AppError::Config(
                "roster.id_column and roster.comment_column are the same".to_string(),
            ));
        }

        let band = HeaderBand {
            row: s.header_rows - 1,
            start: s.header_band_start,
            labels: s.header_labels.clone(),
        };
        Column::new(band.end() - 1)?;

        Ok(Self {
            header_rows: s.header_rows,
            id: s.id_column,
            comment: s.comment_column,
            attendance_code: s.attendance_code_column,
            teacher: s.teacher_column,
            contacts,
            band,
        })
    }

    /// Number of columns the layout touches, counted from A.
    pub fn width(&self) -> usize {
        [
            self.id.index(),
            self.comment.index(),
            self.attendance_code.index(),
            self.teacher.index(),
            self.contacts[2].index(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
        .max(self.band.end() - 1)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_spans_a_to_q() {
        let layout = RosterLayout::from_settings(&RosterSettings::default()).unwrap();
        assert_eq!(layout.width(), 17);
        assert_eq!(layout.band.row, 1);
        assert_eq!(layout.band.start.letter(), "L");
        assert_eq!(layout.contacts[2].letter(), "Q");
    }

    #[test]
    fn rejects_contacts_overlapping_teacher() {
        let settings = RosterSettings {
            contact_columns_start: Column::parse("M").unwrap(),
            ..RosterSettings::default()
        };
        assert!(RosterLayout::from_settings(&settings).is_err());
    }

    #[test]
    fn rejects_zero_header_rows() {
        let settings = RosterSettings {
            header_rows: 0,
            ..RosterSettings::default()
        };
        assert!(RosterLayout::from_settings(&settings).is_err());
    }
}
