//! Diabetes initial review form.

use crf_model::constants::{DRUGS, INSULIN, YES};
use crf_model::{CleanedData, VisitContext};

use super::{FormKind, FormValidator, require_clinical_review};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::{Rules, whole_months_between};

/// Glucose results older than this are stale.
const GLUCOSE_MAX_AGE_MONTHS: i64 = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct DmInitialReviewValidator {
    visit: VisitContext,
}

impl DmInitialReviewValidator {
    pub fn new(visit: VisitContext) -> Self {
        Self { visit }
    }
}

/// Treatment may not start more than a day before the estimated diagnosis.
fn medication_not_before_diagnosis(rules: &Rules<'_>) -> ValidationResult {
    let (Some(dx), Some(med_start)) = (
        rules.estimated_date_from_ago("dx_ago")?,
        rules.estimated_date_from_ago("med_start_ago")?,
    ) else {
        return Ok(());
    };
    if (dx - med_start).num_days() > 1 {
        return Err(ValidationError::field(
            "med_start_ago",
            "Invalid. Cannot be before diagnosis.",
            ErrorCode::Invalid,
        ));
    }
    Ok(())
}

fn glucose_date_is_recent(rules: &Rules<'_>) -> ValidationResult {
    let (Some(glucose_date), Some(report_date)) =
        (rules.data().date("glucose_date"), rules.report_date())
    else {
        return Ok(());
    };
    // Dates less than a whole month ahead of the report count as zero months.
    let months = whole_months_between(glucose_date, report_date);
    if months < 0 {
        return Err(ValidationError::field(
            "glucose_date",
            "Invalid. Cannot be a future date.",
            ErrorCode::Invalid,
        ));
    }
    if months >= GLUCOSE_MAX_AGE_MONTHS {
        return Err(ValidationError::field(
            "glucose_date",
            format!("Invalid. Must be within the last 6 months. Got {months}m ago."),
            ErrorCode::Invalid,
        ));
    }
    Ok(())
}

fn validate_glucose_test(rules: &Rules<'_>) -> ValidationResult {
    rules.required_if(&[YES], "glucose_performed", "glucose_fasting")?;
    rules.required_if(&[YES], "glucose_fasting", "glucose_fasting_duration_str")?;
    rules.required_if(&[YES], "glucose_performed", "glucose_value")?;
    rules.required_if(&[YES], "glucose_performed", "glucose_units")
}

impl FormValidator for DmInitialReviewValidator {
    fn form(&self) -> FormKind {
        FormKind::DmInitialReview
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        let rules = Rules::new(data);

        rules.date_and_ago_conflict("dx_date", "dx_ago", "the exact date")?;
        rules.required_if(&[DRUGS, INSULIN], "managed_by", "med_start_ago")?;
        rules.validate_other_specify("managed_by", Some("managed_by_other"))?;
        medication_not_before_diagnosis(&rules)?;

        rules.required_if(&[YES], "glucose_performed", "glucose_date")?;
        glucose_date_is_recent(&rules)?;
        validate_glucose_test(&rules)
    }
}
