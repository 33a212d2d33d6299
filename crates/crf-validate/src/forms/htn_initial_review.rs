//! Hypertension initial review form.

use crf_model::constants::DRUGS;
use crf_model::{CleanedData, VisitContext};

use super::{FormKind, FormValidator, require_clinical_review};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtnInitialReviewValidator {
    visit: VisitContext,
}

impl HtnInitialReviewValidator {
    pub fn new(visit: VisitContext) -> Self {
        Self { visit }
    }
}

impl FormValidator for HtnInitialReviewValidator {
    fn form(&self) -> FormKind {
        FormKind::HtnInitialReview
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        let rules = Rules::new(data);

        rules.date_and_ago_conflict("dx_date", "dx_ago", "the exact date")?;
        rules.required_if(&[DRUGS], "managed_by", "med_start_ago")?;

        if let (Some(med_start), Some(dx)) = (
            rules.estimated_date_from_ago("med_start_ago")?,
            rules.estimated_date_from_ago("dx_ago")?,
        ) && med_start < dx
        {
            return Err(ValidationError::field(
                "med_start_ago",
                "Invalid. Cannot be before diagnosis.",
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }
}
