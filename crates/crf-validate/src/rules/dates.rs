//! Date rules and "ago" durations.
//!
//! An ago field holds free text like `5y3m` estimating how long before the
//! report date an event happened.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;
use thiserror::Error;

use super::Rules;
use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Field holding the report date and time of every CRF.
pub const REPORT_DATETIME: &str = "report_datetime";

/// `NNNyNNm`, either part optional, case-insensitive.
static AGO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(\d{1,3})\s*y)?\s*(?:(\d{1,2})\s*m)?\s*$").expect("Invalid ago regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("Expected format `NNyNNm`. e.g: 5y6m, 15y12m, 12m or 4y. Got `{value}`.")]
    InvalidFormat { value: String },
}

/// A parsed ago duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgoDuration {
    pub years: u32,
    pub months: u32,
}

impl AgoDuration {
    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

impl FromStr for AgoDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError::InvalidFormat {
            value: s.to_string(),
        };
        let captures = AGO_REGEX.captures(s).ok_or_else(invalid)?;
        let years = captures.get(1).map(|m| m.as_str());
        let months = captures.get(2).map(|m| m.as_str());
        if years.is_none() && months.is_none() {
            return Err(invalid());
        }
        let parse = |part: Option<&str>| -> Result<u32, DurationError> {
            part.map_or(Ok(0), |digits| digits.parse().map_err(|_| invalid()))
        };
        Ok(Self {
            years: parse(years)?,
            months: parse(months)?,
        })
    }
}

impl fmt::Display for AgoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.years, self.months) {
            (0, months) => write!(f, "{months}m"),
            (years, 0) => write!(f, "{years}y"),
            (years, months) => write!(f, "{years}y{months}m"),
        }
    }
}

/// The date `duration` before `reference`.
pub fn duration_to_date(duration: AgoDuration, reference: NaiveDate) -> Option<NaiveDate> {
    reference.checked_sub_months(Months::new(duration.total_months()))
}

/// Whole calendar months from `earlier` to `later`, negative when `later`
/// comes first. Partial months are truncated toward zero.
pub fn whole_months_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    if later < earlier {
        return -whole_months_between(later, earlier);
    }
    let mut months = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());
    if later.day() < earlier.day() {
        months -= 1;
    }
    months
}

impl Rules<'_> {
    /// Date part of `report_datetime`.
    pub fn report_date(&self) -> Option<NaiveDate> {
        self.data().date(REPORT_DATETIME)
    }

    /// Parse the ago field, reporting a bad format on that field.
    pub fn ago_duration(&self, ago_field: &str) -> Result<Option<AgoDuration>, ValidationError> {
        let Some(text) = self.data().text(ago_field) else {
            return Ok(None);
        };
        text.parse::<AgoDuration>().map(Some).map_err(|e| {
            ValidationError::field(ago_field, format!("Invalid format. {e}"), ErrorCode::Invalid)
        })
    }

    /// Date estimated from the ago field relative to the report date.
    pub fn estimated_date_from_ago(
        &self,
        ago_field: &str,
    ) -> Result<Option<NaiveDate>, ValidationError> {
        let Some(duration) = self.ago_duration(ago_field)? else {
            return Ok(None);
        };
        Ok(self
            .report_date()
            .and_then(|report_date| duration_to_date(duration, report_date)))
    }

    /// The actual date if given, else the date estimated from the ago field.
    pub fn date_or_estimate(
        &self,
        date_field: &str,
        ago_field: &str,
    ) -> Result<Option<NaiveDate>, ValidationError> {
        match self.data().date(date_field) {
            Some(date) => Ok(Some(date)),
            None => self.estimated_date_from_ago(ago_field),
        }
    }

    /// Only one of an actual date and its ago estimate may be given.
    pub fn date_and_ago_conflict(
        &self,
        date_field: &str,
        ago_field: &str,
        date_label: &str,
    ) -> ValidationResult {
        if self.data().is_present(date_field) && self.data().is_present(ago_field) {
            return Err(ValidationError::field(
                ago_field,
                format!("Date conflict. Do not provide a response here if {date_label} is available."),
                ErrorCode::DateConflict,
            ));
        }
        Ok(())
    }

    /// `field` may not fall before `reference`.
    pub fn date_not_before(
        &self,
        field: &str,
        reference: Option<NaiveDate>,
        msg: &str,
    ) -> ValidationResult {
        if let (Some(date), Some(reference)) = (self.data().date(field), reference)
            && date < reference
        {
            return Err(ValidationError::field(field, msg, ErrorCode::Invalid));
        }
        Ok(())
    }

    pub fn date_not_after_report(&self, field: &str) -> ValidationResult {
        if let (Some(date), Some(report_date)) = (self.data().date(field), self.report_date())
            && date > report_date
        {
            return Err(ValidationError::field(
                field,
                "Invalid. Cannot be after report date",
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    /// `field` may not be later than the report date.
    pub fn date_not_in_future(&self, field: &str, code: ErrorCode) -> ValidationResult {
        if let (Some(date), Some(report_date)) = (self.data().date(field), self.report_date())
            && date > report_date
        {
            return Err(ValidationError::field(
                field,
                "Invalid. Cannot be a future date.",
                code,
            ));
        }
        Ok(())
    }

    /// `field` may not be earlier than the report date.
    pub fn date_not_in_past(&self, field: &str, code: ErrorCode) -> ValidationResult {
        if let (Some(date), Some(report_date)) = (self.data().date(field), self.report_date())
            && date < report_date
        {
            return Err(ValidationError::field(
                field,
                "Invalid. Cannot be a past date.",
                code,
            ));
        }
        Ok(())
    }

    /// Numeric `field` may not exceed `reference_field`.
    pub fn number_not_greater(
        &self,
        field: &str,
        reference_field: &str,
        msg: &str,
    ) -> ValidationResult {
        if let (Some(value), Some(reference)) = (
            self.data().number(field),
            self.data().number(reference_field),
        ) && value > reference
        {
            return Err(ValidationError::field(field, msg, ErrorCode::Invalid));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crf_model::CleanedData;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_years_months_and_both() {
        assert_eq!("5y".parse(), Ok(AgoDuration { years: 5, months: 0 }));
        assert_eq!("11M".parse(), Ok(AgoDuration { years: 0, months: 11 }));
        assert_eq!("2y 3m".parse(), Ok(AgoDuration { years: 2, months: 3 }));
        assert_eq!("2y3m".parse::<AgoDuration>().unwrap().to_string(), "2y3m");
    }

    #[test]
    fn rejects_malformed_durations() {
        for text in ["", "5", "y", "3m2y", "1234y", "five years"] {
            assert!(text.parse::<AgoDuration>().is_err(), "{text:?}");
        }
    }

    #[test]
    fn duration_counts_back_from_reference() {
        let ago = AgoDuration { years: 1, months: 2 };
        assert_eq!(duration_to_date(ago, date(2024, 3, 31)), Some(date(2023, 1, 31)));
    }

    #[test]
    fn whole_months_truncate_partial_months() {
        assert_eq!(whole_months_between(date(2024, 1, 15), date(2024, 7, 14)), 5);
        assert_eq!(whole_months_between(date(2024, 1, 15), date(2024, 7, 15)), 6);
        assert_eq!(whole_months_between(date(2024, 7, 15), date(2024, 1, 15)), -6);
        assert_eq!(whole_months_between(date(2024, 3, 2), date(2024, 3, 1)), 0);
    }

    #[test]
    fn bad_ago_reports_on_its_field() {
        let data = CleanedData::new().with("dx_ago", "ages");
        let err = Rules::new(&data).ago_duration("dx_ago").unwrap_err();
        assert_eq!(err.field_name(), Some("dx_ago"));
        assert!(err.message.starts_with("Invalid format."));
    }

    #[test]
    fn future_dates_are_relative_to_report_date() {
        let data = CleanedData::new()
            .with(REPORT_DATETIME, date(2024, 1, 10))
            .with("last_appt_date", date(2024, 1, 11));
        assert!(
            Rules::new(&data)
                .date_not_in_future("last_appt_date", ErrorCode::InvalidAppointmentDate)
                .is_err()
        );
    }
}
