//! HIV initial review form.

use chrono::NaiveDate;

use crf_model::constants::{NO, OTHER, PENDING, YES};
use crf_model::{CleanedData, VisitContext};

use super::{FormKind, FormValidator, require_clinical_review};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

const BEFORE_DX_MESSAGE: &str = "Invalid. Cannot be before HIV diagnosis.";

#[derive(Debug, Clone, Copy, Default)]
pub struct HivInitialReviewValidator {
    visit: VisitContext,
}

impl HivInitialReviewValidator {
    pub fn new(visit: VisitContext) -> Self {
        Self { visit }
    }
}

/// Diagnosis date from `dx_date` or, failing that, `dx_ago`. Exactly one
/// must be given and it may not be after the report date.
fn diagnosis_date(rules: &Rules<'_>) -> Result<NaiveDate, ValidationError> {
    let data = rules.data();
    rules.date_and_ago_conflict("dx_date", "dx_ago", "the exact date")?;
    if data.is_blank("dx_date") && data.is_blank("dx_ago") {
        return Err(ValidationError::field(
            "dx_date",
            "This field is required (or the below).",
            ErrorCode::Required,
        ));
    }
    rules.date_not_after_report("dx_date")?;
    rules.date_or_estimate("dx_date", "dx_ago")?.ok_or_else(|| {
        ValidationError::field(
            "dx_date",
            "Unable to determine the diagnosis date.",
            ErrorCode::Invalid,
        )
    })
}

fn validate_art_initiation(rules: &Rules<'_>, dx_date: NaiveDate) -> ValidationResult {
    let data = rules.data();
    rules.not_required_if(&[NO], "rx_init", "rx_init_date", false)?;
    rules.not_required_if(&[NO], "rx_init", "rx_init_ago", false)?;

    let initiated = data.equals("rx_init", YES);
    let has_date = data.is_present("rx_init_date");
    let has_ago = data.is_present("rx_init_ago");
    if initiated && !has_date && !has_ago {
        return Err(ValidationError::field(
            "rx_init_date",
            "This field is required (or the below).",
            ErrorCode::Required,
        ));
    }
    if initiated && has_date && has_ago {
        return Err(ValidationError::field(
            "rx_init_ago",
            "This field is not required if the actual date is provided (below).",
            ErrorCode::NotRequired,
        ));
    }

    // An ago estimate takes precedence over the date field.
    let (field, initiated_on) = if has_ago {
        ("rx_init_ago", rules.estimated_date_from_ago("rx_init_ago")?)
    } else {
        ("rx_init_date", data.date("rx_init_date"))
    };
    if initiated_on.is_some_and(|date| date < dx_date) {
        return Err(ValidationError::field(
            field,
            "Invalid. Cannot start ART before HIV diagnosis.",
            ErrorCode::Invalid,
        ));
    }
    Ok(())
}

fn validate_viral_load(rules: &Rules<'_>, dx_date: NaiveDate) -> ValidationResult {
    rules.required_if(&[YES, PENDING], "has_vl", "drawn_date")?;
    rules.date_not_before("drawn_date", Some(dx_date), BEFORE_DX_MESSAGE)?;
    rules.required_if(&[YES], "has_vl", "vl")?;
    rules.required_if(&[YES], "has_vl", "vl_quantifier")
}

fn validate_cd4(rules: &Rules<'_>, dx_date: NaiveDate) -> ValidationResult {
    rules.required_if(&[YES], "has_cd4", "cd4")?;
    rules.required_if(&[YES], "has_cd4", "cd4_date")?;
    rules.date_not_before("cd4_date", Some(dx_date), BEFORE_DX_MESSAGE)
}

impl FormValidator for HivInitialReviewValidator {
    fn form(&self) -> FormKind {
        FormKind::HivInitialReview
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        let rules = Rules::new(data);
        let dx_date = diagnosis_date(&rules)?;

        rules.applicable_if(&[YES], "receives_care", "clinic")?;
        rules.required_if(&[OTHER], "clinic", "clinic_other")?;
        rules.required_if(&[YES], "receives_care", "rx_init")?;
        validate_art_initiation(&rules, dx_date)?;

        rules.required_if(&[YES], "rx_init", "has_vl")?;
        validate_viral_load(&rules, dx_date)?;

        rules.required_if(&[YES], "rx_init", "has_cd4")?;
        validate_cd4(&rules, dx_date)
    }
}
