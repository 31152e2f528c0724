//! Spreadsheet column references ("A", "K", "AB") as zero-based indexes.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest column a spreadsheet can hold (XFD).
const MAX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(usize);

impl Column {
    pub fn new(index: usize) -> AppResult<Self> {
        if index >= MAX_COLUMNS {
            return Err(AppError::InvalidColumn(format!(
                "index {index} is beyond the last spreadsheet column"
            )));
        }
        Ok(Self(index))
    }

    /// Column for a known-good index, for built-in layouts.
    pub const fn at(index: usize) -> Self {
        assert!(index < MAX_COLUMNS);
        Self(index)
    }

    /// Parse a column letter, case-insensitive.
    pub fn parse(letters: &str) -> AppResult<Self> {
        let letters = letters.trim();
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::InvalidColumn(letters.to_string()));
        }

        let mut n: usize = 0;
        for c in letters.chars() {
            let v = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            n = n
                .checked_mul(26)
                .and_then(|n| n.checked_add(v))
                .ok_or_else(|| AppError::InvalidColumn(letters.to_string()))?;
        }

        Column::new(n - 1).map_err(|_| AppError::InvalidColumn(letters.to_string()))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn letter(&self) -> String {
        column_letter(self.0)
    }

    /// Column `n` places to the right.
    pub fn offset(&self, n: usize) -> AppResult<Self> {
        Column::new(self.0 + n)
    }
}

/// Zero-based index → spreadsheet letters (0 → A, 26 → AA).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

/// A1-style reference of a zero-based cell position.
pub fn a1(row: usize, col: usize) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

impl TryFrom<String> for Column {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Column::parse(&value)
    }
}

impl From<Column> for String {
    fn from(c: Column) -> Self {
        c.letter()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letter())
    }
}
