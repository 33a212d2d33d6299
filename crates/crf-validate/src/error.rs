//! Validation error types.
//!
//! A rejected form produces exactly one [`ValidationError`]: the first rule
//! that failed, keyed by the offending field (or the catch-all key) and
//! tagged with a machine-readable [`ErrorCode`].

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crf_model::constants::ALL_FIELDS;

use crate::forms::FormKind;

/// Where a validation error is reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    /// Form-wide error (`__all__`).
    All,
    /// Error attached to a single field.
    Field(String),
}

impl ErrorKey {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKey::All => ALL_FIELDS,
            ErrorKey::Field(field) => field,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Patient group
    InvalidStatus,
    InvalidRandomize,
    InvalidRandomizeConfirmation,
    InvalidPatientCount,
    InvalidPatient,
    InvalidConditionRatio,
    InvalidCompleteGroupFirst,
    InvalidStatusNotComplete,

    // Field presence
    Required,
    NotRequired,
    Applicable,
    NotApplicable,

    // Dates and durations
    DateConflict,
    InvalidAppointmentDate,
    InvalidDurationInCare,

    // Related records
    InvalidAlreadyHasDx,
    ClinicalReviewMissing,
    CrfMissing,

    /// Any other rejected value.
    Invalid,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidStatus => "INVALID_STATUS",
            ErrorCode::InvalidRandomize => "INVALID_RANDOMIZE",
            ErrorCode::InvalidRandomizeConfirmation => "INVALID_RANDOMIZE_CONFIRMATION",
            ErrorCode::InvalidPatientCount => "INVALID_PATIENT_COUNT",
            ErrorCode::InvalidPatient => "INVALID_PATIENT",
            ErrorCode::InvalidConditionRatio => "INVALID_CONDITION_RATIO",
            ErrorCode::InvalidCompleteGroupFirst => "INVALID_COMPLETE_GROUP_FIRST",
            ErrorCode::InvalidStatusNotComplete => "INVALID_STATUS_NOT_COMPLETE",
            ErrorCode::Required => "REQUIRED",
            ErrorCode::NotRequired => "NOT_REQUIRED",
            ErrorCode::Applicable => "APPLICABLE",
            ErrorCode::NotApplicable => "NOT_APPLICABLE",
            ErrorCode::DateConflict => "DATE_CONFLICT",
            ErrorCode::InvalidAppointmentDate => "INVALID_APPOINTMENT_DATE",
            ErrorCode::InvalidDurationInCare => "INVALID_DURATION_IN_CARE",
            ErrorCode::InvalidAlreadyHasDx => "INVALID_ALREADY_HAS_DX",
            ErrorCode::ClinicalReviewMissing => "CLINICAL_REVIEW_MISSING",
            ErrorCode::CrfMissing => "CRF_MISSING",
            ErrorCode::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rejected form submission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{key}: {message}")]
pub struct ValidationError {
    pub key: ErrorKey,
    pub message: String,
    pub code: ErrorCode,
}

/// Outcome of validating a form: silent success or the first failed rule.
pub type ValidationResult = Result<(), ValidationError>;

impl ValidationError {
    pub fn field(field: &str, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            key: ErrorKey::Field(field.to_string()),
            message: message.into(),
            code,
        }
    }

    pub fn all(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            key: ErrorKey::All,
            message: message.into(),
            code,
        }
    }

    pub fn required(field: &str) -> Self {
        Self::field(field, "This field is required.", ErrorCode::Required)
    }

    pub fn not_required(field: &str) -> Self {
        Self::field(field, "This field is not required.", ErrorCode::NotRequired)
    }

    pub fn applicable(field: &str) -> Self {
        Self::field(field, "This field is applicable.", ErrorCode::Applicable)
    }

    pub fn not_applicable(field: &str) -> Self {
        Self::field(field, "This field is not applicable.", ErrorCode::NotApplicable)
    }

    /// Field name, or `None` for form-wide errors.
    pub fn field_name(&self) -> Option<&str> {
        match &self.key {
            ErrorKey::Field(field) => Some(field),
            ErrorKey::All => None,
        }
    }

    pub fn is_field_error(&self) -> bool {
        matches!(self.key, ErrorKey::Field(_))
    }
}

/// Failure to run a submission through its validator.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The form was validated and rejected.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// The submission lacks a related record the validator reads.
    #[error("{form} submission is missing required context: {context}")]
    MissingContext { form: FormKind, context: &'static str },
}

impl SubmissionError {
    pub fn rejection(&self) -> Option<&ValidationError> {
        match self {
            SubmissionError::Rejected(error) => Some(error),
            SubmissionError::MissingContext { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_key_and_message() {
        let error = ValidationError::required("weight");
        assert_eq!(error.to_string(), "weight: This field is required.");
        let error = ValidationError::all("Patient group has no patients.", ErrorCode::InvalidPatientCount);
        assert_eq!(error.to_string(), "__all__: Patient group has no patients.");
        assert!(!error.is_field_error());
    }

    #[test]
    fn code_strings_match_serialized_codes() {
        let codes = [
            ErrorCode::InvalidStatus,
            ErrorCode::InvalidRandomize,
            ErrorCode::InvalidRandomizeConfirmation,
            ErrorCode::InvalidPatientCount,
            ErrorCode::InvalidPatient,
            ErrorCode::InvalidConditionRatio,
            ErrorCode::InvalidCompleteGroupFirst,
            ErrorCode::InvalidStatusNotComplete,
            ErrorCode::Required,
            ErrorCode::NotRequired,
            ErrorCode::Applicable,
            ErrorCode::NotApplicable,
            ErrorCode::DateConflict,
            ErrorCode::InvalidAppointmentDate,
            ErrorCode::InvalidDurationInCare,
            ErrorCode::InvalidAlreadyHasDx,
            ErrorCode::ClinicalReviewMissing,
            ErrorCode::CrfMissing,
            ErrorCode::Invalid,
        ];
        for code in codes {
            assert_eq!(serde_json::to_value(code).unwrap(), code.as_str());
        }
    }

    #[test]
    fn serializes_key_as_plain_string() {
        let error = ValidationError::not_applicable("pregnant");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["key"], "pregnant");
        assert_eq!(json["code"], "NOT_APPLICABLE");
    }
}
