//! Baseline clinical review form.

use crf_model::constants::{NO, YES};
use crf_model::{CleanedData, Condition, SubjectScreening};

use super::{FormKind, FormValidator};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

/// Conditions diagnosed at screening must be tested and diagnosed by
/// baseline.
#[derive(Debug, Clone, Copy)]
pub struct ClinicalReviewBaselineValidator<'a> {
    subject_screening: &'a SubjectScreening,
}

impl<'a> ClinicalReviewBaselineValidator<'a> {
    pub fn new(subject_screening: &'a SubjectScreening) -> Self {
        Self { subject_screening }
    }

    fn screened_with_dx(&self, condition: Condition) -> bool {
        self.subject_screening.dx(condition) == Some(YES)
    }

    fn already_has_dx(field: &str, condition: Condition) -> ValidationError {
        ValidationError::field(
            field,
            format!(
                "Invalid. Participant screened with `{}` diagnosis. Expected `Yes`.",
                condition.label()
            ),
            ErrorCode::InvalidAlreadyHasDx,
        )
    }

    fn validate_condition(&self, rules: &Rules<'_>, condition: Condition) -> ValidationResult {
        let data = rules.data();
        let prefix = condition.field_prefix();
        let test = format!("{prefix}_test");
        let test_date = format!("{prefix}_test_date");
        let test_ago = format!("{prefix}_test_ago");
        let dx = format!("{prefix}_dx");

        if data.equals(&test, NO) && self.screened_with_dx(condition) {
            return Err(Self::already_has_dx(&test, condition));
        }

        rules.not_required_if(&[NO], &test, &test_ago, false)?;
        rules.not_required_if(&[NO], &test, &test_date, false)?;
        rules.date_and_ago_conflict(&test_date, &test_ago, "test date")?;
        rules.date_not_after_report(&test_date)?;

        if data.equals(&test, YES) && !data.equals(&dx, YES) && self.screened_with_dx(condition) {
            return Err(Self::already_has_dx(&dx, condition));
        }
        Ok(())
    }
}

impl FormValidator for ClinicalReviewBaselineValidator<'_> {
    fn form(&self) -> FormKind {
        FormKind::ClinicalReviewBaseline
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        let rules = Rules::new(data);
        for condition in Condition::ALL {
            self.validate_condition(&rules, condition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn screened_condition_must_be_tested() {
        let screening = SubjectScreening::default().with_dx(Condition::Diabetes, YES);
        let data = CleanedData::new().with("dm_test", NO);
        let err = ClinicalReviewBaselineValidator::new(&screening)
            .clean(&data)
            .unwrap_err();
        assert_eq!(err.field_name(), Some("dm_test"));
        assert_eq!(
            err.message,
            "Invalid. Participant screened with `Diabetes` diagnosis. Expected `Yes`."
        );
    }

    #[test]
    fn test_date_and_ago_conflict() {
        let screening = SubjectScreening::default();
        let data = CleanedData::new()
            .with("report_datetime", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .with("hiv_test", YES)
            .with("hiv_test_date", NaiveDate::from_ymd_opt(2020, 5, 1).unwrap())
            .with("hiv_test_ago", "4y");
        let err = ClinicalReviewBaselineValidator::new(&screening)
            .clean(&data)
            .unwrap_err();
        assert_eq!(err.field_name(), Some("hiv_test_ago"));
        assert_eq!(err.code, ErrorCode::DateConflict);
    }
}
