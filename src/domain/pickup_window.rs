use chrono::{Duration, NaiveDate, NaiveTime};

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange{
    pub start: NaiveDate,
    pub end: NaiveDate
}

impl DateRange {
    // Missing bounds default to [today, today + 7 days]
    pub fn from_query(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self, String> {
        let start = match start {
            Some(s) => parse_date(s)?,
            None => today
        };
        let end = match end {
            Some(e) => parse_date(e)?,
            None => today + Duration::days(DEFAULT_WINDOW_DAYS)
        };

        if end < start {
            return Err("endDate must not be before startDate".to_string());
        }

        Ok(Self{ start, end })
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

// Accepts both HH:MM and HH:MM:SS
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", value))
}
