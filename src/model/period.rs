use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// A validated (month, year) payroll/scoring period.
///
/// Construction goes through [`Period::new`], so a `Period` value always
/// names a real calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    year: i32,
    month: u32,
}

/// Unchecked wire form; deserialization goes through [`Period::new`].
#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for Period {
    type Error = AppError;

    fn try_from(raw: RawPeriod) -> AppResult<Self> {
        Period::new(raw.month, raw.year)
    }
}

impl Period {
    pub fn new(month: u32, year: i32) -> AppResult<Self> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// Period containing `date`.
    pub fn containing(date: NaiveDate) -> AppResult<Self> {
        Self::new(date.month(), date.year())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// First day of the period (inclusive bound).
    pub fn start(&self) -> NaiveDate {
        // month/year were validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month (exclusive bound).
    pub fn end(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date < self.end()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_month_out_of_range() {
        for month in [0, 13, 99] {
            match Period::new(month, 2024) {
                Err(AppError::InvalidPeriod { month: m, year }) => {
                    assert_eq!(m, month);
                    assert_eq!(year, 2024);
                }
                other => panic!("expected InvalidPeriod, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_implausible_year() {
        assert!(Period::new(3, 0).is_err());
        assert!(Period::new(3, -2024).is_err());
        assert!(Period::new(3, 1899).is_err());
        assert!(Period::new(3, 2101).is_err());
        assert!(Period::new(3, 1900).is_ok());
        assert!(Period::new(3, 2100).is_ok());
    }

    #[test]
    fn bounds_cover_whole_month() {
        let march = Period::new(3, 2024).unwrap();
        assert_eq!(march.start(), date(2024, 3, 1));
        assert_eq!(march.end(), date(2024, 4, 1));
        assert!(march.contains(date(2024, 3, 31)));
        assert!(!march.contains(date(2024, 4, 1)));
        assert!(!march.contains(date(2024, 2, 29)));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let december = Period::new(12, 2023).unwrap();
        assert_eq!(december.end(), date(2024, 1, 1));
        assert!(december.contains(date(2023, 12, 31)));
    }

    #[test]
    fn displays_as_year_month() {
        assert_eq!(Period::new(3, 2024).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn deserializing_validates_the_period() {
        let march: Period = serde_json::from_str(r#"{"year":2024,"month":3}"#).unwrap();
        assert_eq!(march, Period::new(3, 2024).unwrap());

        let err = serde_json::from_str::<Period>(r#"{"year":2024,"month":13}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid period"));
        assert!(serde_json::from_str::<Period>(r#"{"year":-5,"month":0}"#).is_err());
        assert!(serde_json::from_str::<Period>(r#"{"month":13}"#).is_err());
    }

    #[test]
    fn serializes_as_year_and_month() {
        let json = serde_json::to_value(Period::new(3, 2024).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"year": 2024, "month": 3}));
    }

    #[test]
    fn containing_uses_date_month() {
        let period = Period::containing(date(2024, 7, 19)).unwrap();
        assert_eq!((period.month(), period.year()), (7, 2024));
    }
}
