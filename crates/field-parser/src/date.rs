//! Registration Date Parsing

use crate::FieldError;
use chrono::{Datelike, Local};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// "2018年04月", "2018年4月", also matched inside longer text
    static ref YEAR_MONTH: Regex = Regex::new(r"(\d{4})年(\d{1,2})月").unwrap();
}

/// Calendar month, used both for parsed registration dates and as the
/// reference "today" that ages are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthParts")]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl YearMonth {
    /// Create a year-month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Current month from the local clock.
    ///
    /// Only the outermost boundary should call this; everything below it
    /// takes the reference month as a parameter.
    pub fn now() -> Self {
        Self::from_date(&Local::now().date_naive())
    }

    /// Month containing the given date
    pub fn from_date(date: &impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whole months from `self` to `later` (negative if `later` is earlier)
    pub fn months_until(self, later: YearMonth) -> i32 {
        // month is always 1..=12, the cast cannot truncate
        (later.year - self.year) * 12 + (later.month as i32 - self.month as i32)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Deserialize)]
struct YearMonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<YearMonthParts> for YearMonth {
    type Error = FieldError;

    fn try_from(parts: YearMonthParts) -> Result<Self, Self::Error> {
        YearMonth::new(parts.year, parts.month)
            .ok_or_else(|| FieldError::invalid("month", parts.month))
    }
}

/// Parses the `YYYY-MM` form produced by `Display`
impl FromStr for YearMonth {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldError::invalid("year_month", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

/// Find a `YYYY年MM月` date anywhere in `text`
pub fn parse_year_month(text: &str) -> Option<YearMonth> {
    let caps = YEAR_MONTH.captures(text)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    YearMonth::new(year, month)
}

/// Months elapsed between a registration date text and `reference`.
///
/// Absent, empty or unrecognised text yields `None`. Dates after the
/// reference month produce negative ages.
pub fn parse_age_months(text: Option<&str>, reference: YearMonth) -> Option<i32> {
    let registered = parse_year_month(text?)?;
    Some(registered.months_until(reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("2018年04月"), Some(ym(2018, 4)));
        assert_eq!(parse_year_month("2018年4月"), Some(ym(2018, 4)));
        assert_eq!(parse_year_month("上牌 2021年12月 北京"), Some(ym(2021, 12)));
    }

    #[test]
    fn test_parse_year_month_rejects_other_formats() {
        assert_eq!(parse_year_month(""), None);
        assert_eq!(parse_year_month("2018-04"), None);
        assert_eq!(parse_year_month("18年4月"), None);
        assert_eq!(parse_year_month("2018年13月"), None);
        assert_eq!(parse_year_month("2018年00月"), None);
    }

    #[test]
    fn test_age_months() {
        let reference = ym(2024, 6);
        assert_eq!(parse_age_months(Some("2018年04月"), reference), Some(74));
        assert_eq!(parse_age_months(Some("2024年06月"), reference), Some(0));
        assert_eq!(parse_age_months(Some("2024年09月"), reference), Some(-3));
        assert_eq!(parse_age_months(Some("unknown"), reference), None);
        assert_eq!(parse_age_months(None, reference), None);
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 30).unwrap();
        assert_eq!(YearMonth::from_date(&date), ym(2023, 11));
    }

    #[test]
    fn test_display_and_from_str() {
        let value = ym(2024, 3);
        assert_eq!(value.to_string(), "2024-03");
        assert_eq!("2024-03".parse::<YearMonth>().unwrap(), value);
        assert_eq!("2024-3".parse::<YearMonth>().unwrap(), value);
        assert!("2024/03".parse::<YearMonth>().is_err());
        assert!("2024-13".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_deserialize_checks_month() {
        let parsed: YearMonth = serde_json::from_str(r#"{"year":2024,"month":4}"#).unwrap();
        assert_eq!(parsed, ym(2024, 4));
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2024,"month":13}"#).is_err());
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2024,"month":0}"#).is_err());
    }

    #[test]
    fn test_now_is_valid_month() {
        let now = YearMonth::now();
        assert!((1..=12).contains(&now.month));
    }

    proptest::proptest! {
        #[test]
        fn test_age_matches_month_arithmetic(
            year in 1990i32..2030,
            month in 1u32..=12,
            ref_year in 1990i32..2030,
            ref_month in 1u32..=12,
        ) {
            let text = format!("{}年{:02}月", year, month);
            let expected = (ref_year - year) * 12 + ref_month as i32 - month as i32;
            proptest::prop_assert_eq!(
                parse_age_months(Some(&text), ym(ref_year, ref_month)),
                Some(expected)
            );
        }
    }
}
