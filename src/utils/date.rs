use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Optional `YYYY-MM-DD` argument, today when absent.
pub fn date_or_today(input: Option<&str>) -> AppResult<NaiveDate> {
    match input {
        Some(s) => parse_date(s.trim()).ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(today()),
    }
}

/// Roster sheet date token: month and day without padding (Nov 3 → "11.3").
pub fn roster_token(date: NaiveDate) -> String {
    format!("{}.{}", date.month(), date.day())
}
