//! Submitted form values.
//!
//! A form submission is a flat map of field name to [`FieldValue`]. The
//! accessors on [`CleanedData`] never fail: a missing field, a null, an empty
//! string and an empty selection all read as *blank*.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single submitted value.
///
/// Deserialises untagged, so JSON `120` is an integer, `"2024-01-31"` a date,
/// `"2024-01-31T09:00:00Z"` a datetime and `["OTHER", "NONE"]` a multi-select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Text(String),
    Choices(Vec<String>),
}

impl FieldValue {
    /// Build a multi-select value.
    pub fn choices<S: AsRef<str>>(items: &[S]) -> Self {
        FieldValue::Choices(items.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Choices(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::DateTime(datetime) => Some(datetime.date_naive()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, ""),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::DateTime(value) => write!(f, "{}", value.to_rfc3339()),
            FieldValue::Date(value) => write!(f, "{value}"),
            FieldValue::Text(value) => write!(f, "{value}"),
            FieldValue::Choices(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Field values submitted with a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanedData(BTreeMap<String, FieldValue>);

impl CleanedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).is_none_or(FieldValue::is_blank)
    }

    pub fn is_present(&self, field: &str) -> bool {
        !self.is_blank(field)
    }

    /// Non-blank text value.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn equals(&self, field: &str, response: &str) -> bool {
        self.text(field) == Some(response)
    }

    pub fn is_one_of(&self, field: &str, responses: &[&str]) -> bool {
        self.text(field)
            .is_some_and(|value| responses.contains(&value))
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer or decimal value as `f64`.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    /// Date value; datetimes are truncated to their UTC date.
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        self.get(field).and_then(FieldValue::as_date)
    }

    pub fn datetime(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.get(field)? {
            FieldValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, field: &str) -> Option<bool> {
        match self.get(field)? {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Selected options of a multi-select field. A single text value is
    /// treated as a one-item selection.
    pub fn choices(&self, field: &str) -> Vec<&str> {
        match self.get(field) {
            Some(FieldValue::Choices(items)) => items.iter().map(String::as_str).collect(),
            Some(FieldValue::Text(text)) if !text.trim().is_empty() => vec![text.as_str()],
            _ => Vec::new(),
        }
    }
}

impl FromIterator<(String, FieldValue)> for CleanedData {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_covers_missing_null_empty_text_and_empty_selection() {
        let data = CleanedData::new()
            .with("null", FieldValue::Null)
            .with("empty", "  ")
            .with("none_selected", FieldValue::choices::<&str>(&[]))
            .with("filled", "Yes");
        assert!(data.is_blank("missing"));
        assert!(data.is_blank("null"));
        assert!(data.is_blank("empty"));
        assert!(data.is_blank("none_selected"));
        assert!(data.is_present("filled"));
    }

    #[test]
    fn datetime_reads_as_date() {
        let dt = DateTime::parse_from_rfc3339("2024-03-01T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let data = CleanedData::new().with("report_datetime", dt);
        assert_eq!(
            data.date("report_datetime"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(data.datetime("report_datetime"), Some(dt));
    }

    #[test]
    fn numbers_accept_ints_and_floats() {
        let data = CleanedData::new().with("sys", 120).with("weight", 60.5);
        assert_eq!(data.number("sys"), Some(120.0));
        assert_eq!(data.int("sys"), Some(120));
        assert_eq!(data.number("weight"), Some(60.5));
        assert_eq!(data.int("weight"), None);
    }

    #[test]
    fn single_text_is_a_one_item_selection() {
        let data = CleanedData::new().with("insurance", "NONE");
        assert_eq!(data.choices("insurance"), vec!["NONE"]);
    }
}
