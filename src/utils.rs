use crate::error::{RollupError, Result};
use chrono::{Datelike, Days, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.checked_sub_days(Days::new(1))
}

/// Parses a period string in the format "YYYY-MM" or "YYYY-MM:YYYY-MM"
/// Returns (start_date, end_date), from the first to the last day of the range.
pub fn parse_period_string(period: &str) -> Result<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = period.split(':').collect();

    match parts.len() {
        1 => {
            let start = parse_month_start(parts[0])?;
            let end = month_end(start)?;
            Ok((start, end))
        }
        2 => {
            let start = parse_month_start(parts[0])?;
            let end = month_end(parse_month_start(parts[1])?)?;
            Ok((start, end))
        }
        _ => Err(RollupError::InvalidPeriodRange(format!(
            "Invalid period format: {}. Expected 'YYYY-MM' or 'YYYY-MM:YYYY-MM'",
            period
        ))),
    }
}

fn parse_month_start(raw: &str) -> Result<NaiveDate> {
    let start_str = format!("{}-01", raw.trim());
    NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        RollupError::InvalidPeriodRange(format!(
            "Invalid date format in period: {}. Expected YYYY-MM",
            raw
        ))
    })
}

fn month_end(date: NaiveDate) -> Result<NaiveDate> {
    last_day_of_month(date.year(), date.month())
        .ok_or_else(|| RollupError::InvalidPeriodRange(format!("Date out of range: {}", date)))
}
