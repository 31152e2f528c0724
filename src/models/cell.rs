//! A single spreadsheet cell value.

use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, Value, ValueRef};
use serde::{Serialize, Serializer};
use std::fmt;

/// Literal marker written when a student has no attendance record.
/// Stored as plain text, never as a spreadsheet error value.
pub const SENTINEL: &str = "#N/A";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Text cell, or `Empty` for an empty string.
    pub fn text<S: Into<String>>(s: S) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn sentinel() -> Self {
        CellValue::Text(SENTINEL.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text rendering used for every comparison (IDs, codes, headers).
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
        }
    }

    pub fn trimmed_text(&self) -> String {
        self.as_text().trim().to_string()
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.trimmed_text().is_empty()
    }
}

/// Integral values print without a fractional part, so a numeric ID 7
/// compares equal to the text "7".
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Empty => ToSqlOutput::Owned(Value::Null),
            CellValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            CellValue::Number(n) => ToSqlOutput::Owned(Value::Real(*n)),
        })
    }
}

impl FromSql for CellValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => CellValue::Empty,
            ValueRef::Integer(i) => CellValue::Number(i as f64),
            ValueRef::Real(r) => CellValue::Number(r),
            ValueRef::Text(t) => CellValue::text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => CellValue::text(String::from_utf8_lossy(b).into_owned()),
        })
    }
}
