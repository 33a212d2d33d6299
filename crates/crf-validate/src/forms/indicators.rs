//! Indicators form: weight, height and up to two blood pressure readings.

use crf_model::constants::{NO, NOT_REQUIRED, YES};
use crf_model::{CleanedData, VisitContext};

use super::{FormKind, FormValidator, require_clinical_review};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorsValidator {
    visit: VisitContext,
}

impl IndicatorsValidator {
    pub fn new(visit: VisitContext) -> Self {
        Self { visit }
    }
}

fn validate_reading(rules: &Rules<'_>, reading: &str) -> ValidationResult {
    let taken = format!("{reading}_taken");
    let sys = format!("sys_blood_pressure_{reading}");
    let dia = format!("dia_blood_pressure_{reading}");
    rules.required_if(&[NO], &taken, &format!("{reading}_reason_not_taken"))?;
    rules.required_if(&[YES], &taken, &sys)?;
    rules.required_if(&[YES], &taken, &dia)?;
    rules.raise_on_systolic_lt_diastolic_bp(&sys, &dia)
}

impl FormValidator for IndicatorsValidator {
    fn form(&self) -> FormKind {
        FormKind::Indicators
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        let rules = Rules::new(data);

        rules.required_if_true(self.visit.baseline, "weight", false)?;
        rules.required_if_true(self.visit.baseline, "height", false)?;

        validate_reading(&rules, "r1")?;

        if data.equals("r1_taken", NO) && data.equals("r2_taken", YES) {
            return Err(ValidationError::field(
                "r2_taken",
                "Invalid. First reading was not taken.",
                ErrorCode::Invalid,
            ));
        }
        if data.equals("r2_taken", NOT_REQUIRED) && self.visit.htn_initial_review_exists {
            return Err(ValidationError::field(
                "r2_taken",
                "Invalid. Expected YES or NO. Patient is hypertensive.",
                ErrorCode::Invalid,
            ));
        }
        validate_reading(&rules, "r2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_reading_only() -> CleanedData {
        CleanedData::new()
            .with("weight", 65.5)
            .with("height", 170)
            .with("r1_taken", YES)
            .with("sys_blood_pressure_r1", 130)
            .with("dia_blood_pressure_r1", 85)
            .with("r2_taken", NOT_REQUIRED)
    }

    #[test]
    fn second_reading_optional_without_htn_review() {
        let validator = IndicatorsValidator::new(VisitContext::baseline());
        assert!(validator.clean(&first_reading_only()).is_ok());
    }

    #[test]
    fn hypertensive_patient_needs_second_reading_answer() {
        let validator = IndicatorsValidator::new(VisitContext::follow_up().with_htn_initial_review());
        let err = validator.clean(&first_reading_only()).unwrap_err();
        assert_eq!(err.field_name(), Some("r2_taken"));
        assert_eq!(err.message, "Invalid. Expected YES or NO. Patient is hypertensive.");
    }

    #[test]
    fn reason_required_when_reading_not_taken() {
        let data = CleanedData::new().with("r1_taken", NO);
        assert_eq!(
            IndicatorsValidator::default().clean(&data),
            Err(ValidationError::required("r1_reason_not_taken"))
        );
    }

    #[test]
    fn second_reading_cannot_follow_missing_first() {
        let data = CleanedData::new()
            .with("r1_taken", NO)
            .with("r1_reason_not_taken", "machine broken")
            .with("r2_taken", YES);
        let err = IndicatorsValidator::default().clean(&data).unwrap_err();
        assert_eq!(err.field_name(), Some("r2_taken"));
    }

    #[test]
    fn weight_required_at_baseline() {
        let mut data = first_reading_only();
        data.remove("weight");
        assert_eq!(
            IndicatorsValidator::new(VisitContext::baseline()).clean(&data),
            Err(ValidationError::required("weight"))
        );
    }

    #[test]
    fn clinical_review_must_exist() {
        let validator = IndicatorsValidator::new(VisitContext::baseline().without_clinical_review());
        let err = validator.clean(&first_reading_only()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ClinicalReviewMissing);
    }
}
