//! Calendar features derived from the sale date
//!
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use shelfcast::traits::Transformer;
use shelfcast_datasets::{Cell, Column, SalesFrame};
use tracing::debug;

use crate::error::{PreprocessingError, Result};

pub const MONTH: &str = "month";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const IS_WEEKEND: &str = "is_weekend";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date
///
/// Accepts plain dates, naive timestamps and RFC 3339 timestamps. Timestamps keep the date of
/// their local time, any offset is not applied.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }
    if let Some(time) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(time.date());
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|time| time.naive_local().date())
}

/// Calendar feature builder
///
/// Parses the date column of a sales table and appends three columns:
///
/// * `month`, the month number in `1..=12`
/// * `day_of_week`, the weekday counted from Monday as `0` to Sunday as `6`
/// * `is_weekend`, `true` for Saturday and Sunday
///
/// Existing columns with these names are replaced in place, so applying the builder twice
/// yields the same table. The date column itself is kept.
///
/// # Example
///
/// ```rust
/// use shelfcast::traits::Transformer;
/// use shelfcast_datasets::read_csv;
/// use shelfcast_preprocessing::CalendarFeatures;
///
/// let frame = read_csv("date,sales\n2024-01-06,10\n".as_bytes()).unwrap();
/// let frame = CalendarFeatures::new().transform(&frame).unwrap();
///
/// assert_eq!(frame.column_names(), &["date", "sales", "month", "day_of_week", "is_weekend"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarFeatures {
    date_column: String,
}

impl Default for CalendarFeatures {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
        }
    }
}

impl CalendarFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the column holding the sale date, defaults to `date`
    pub fn date_column<S: Into<String>>(mut self, name: S) -> Self {
        self.date_column = name.into();
        self
    }

    fn parse_column(&self, column: &Column) -> Result<Vec<NaiveDate>> {
        column
            .cells()
            .enumerate()
            .map(|(row, cell)| {
                let date = match cell {
                    Cell::Text(x) => parse_date(x),
                    _ => None,
                };
                date.ok_or_else(|| PreprocessingError::UnparseableDate {
                    column: self.date_column.clone(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

impl<'a> Transformer<&'a SalesFrame, Result<SalesFrame>> for CalendarFeatures {
    fn transform(&self, frame: &'a SalesFrame) -> Result<SalesFrame> {
        let column = frame
            .column(&self.date_column)
            .ok_or_else(|| PreprocessingError::MissingColumn(self.date_column.clone()))?;
        let dates = self.parse_column(column)?;

        let month = dates.iter().map(|d| d.month() as i64).collect();
        let day_of_week = dates
            .iter()
            .map(|d| d.weekday().num_days_from_monday() as i64)
            .collect();
        let is_weekend = dates
            .iter()
            .map(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect();

        debug!(rows = dates.len(), column = %self.date_column, "derived calendar features");

        Ok(frame
            .clone()
            .with_column(MONTH, Column::Integer(month))?
            .with_column(DAY_OF_WEEK, Column::Integer(day_of_week))?
            .with_column(IS_WEEKEND, Column::Boolean(is_weekend))?)
    }
}
