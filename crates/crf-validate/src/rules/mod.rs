//! Reusable cross-field rules.
//!
//! Every rule returns a [`ValidationResult`] so a form's `clean` can chain
//! them with `?` and stop at the first failure.

mod blood_pressure;
mod dates;
mod other_specify;

pub use blood_pressure::{SEVERE_HTN_DIASTOLIC, SEVERE_HTN_SYSTOLIC};
pub use dates::{
    AgoDuration, DurationError, REPORT_DATETIME, duration_to_date, whole_months_between,
};

use crf_model::CleanedData;
use crf_model::constants::NOT_APPLICABLE;

use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Rule primitives bound to one form's cleaned data.
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    data: &'a CleanedData,
}

impl<'a> Rules<'a> {
    pub fn new(data: &'a CleanedData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a CleanedData {
        self.data
    }

    /// `field_required` must be answered when `field` is one of `responses`
    /// and left blank otherwise.
    pub fn required_if(
        &self,
        responses: &[&str],
        field: &str,
        field_required: &str,
    ) -> ValidationResult {
        let triggered = self.data.is_one_of(field, responses);
        if triggered && self.data.is_blank(field_required) {
            return Err(ValidationError::required(field_required));
        }
        if !triggered && self.data.is_present(field_required) {
            return Err(ValidationError::not_required(field_required));
        }
        Ok(())
    }

    /// `field_not_required` must be blank when `field` is one of `responses`.
    ///
    /// With `inverse`, an answered `field` outside `responses` makes
    /// `field_not_required` required.
    pub fn not_required_if(
        &self,
        responses: &[&str],
        field: &str,
        field_not_required: &str,
        inverse: bool,
    ) -> ValidationResult {
        let triggered = self.data.is_one_of(field, responses);
        if triggered && self.data.is_present(field_not_required) {
            return Err(ValidationError::not_required(field_not_required));
        }
        if inverse
            && !triggered
            && self.data.is_present(field)
            && self.data.is_blank(field_not_required)
        {
            return Err(ValidationError::required(field_not_required));
        }
        Ok(())
    }

    pub fn required_if_true(
        &self,
        condition: bool,
        field_required: &str,
        inverse: bool,
    ) -> ValidationResult {
        if condition && self.data.is_blank(field_required) {
            return Err(ValidationError::required(field_required));
        }
        if inverse && !condition && self.data.is_present(field_required) {
            return Err(ValidationError::not_required(field_required));
        }
        Ok(())
    }

    /// `field` must be blank while `condition` holds. `msg` replaces the
    /// default message.
    pub fn not_required_if_true(
        &self,
        condition: bool,
        field: &str,
        msg: Option<&str>,
    ) -> ValidationResult {
        if condition && self.data.is_present(field) {
            return Err(match msg {
                Some(msg) => ValidationError::field(field, msg, ErrorCode::NotRequired),
                None => ValidationError::not_required(field),
            });
        }
        Ok(())
    }

    /// `field_applicable` must hold a real answer when `field` is one of
    /// `responses`, and be `N/A` when `field` is answered otherwise.
    /// Blank counts as "not N/A". Skipped while `field` is blank.
    pub fn applicable_if(
        &self,
        responses: &[&str],
        field: &str,
        field_applicable: &str,
    ) -> ValidationResult {
        if self.data.is_blank(field) {
            return Ok(());
        }
        let is_na = self.data.equals(field_applicable, NOT_APPLICABLE);
        if self.data.is_one_of(field, responses) {
            if is_na || self.data.is_blank(field_applicable) {
                return Err(ValidationError::applicable(field_applicable));
            }
        } else if !is_na {
            return Err(ValidationError::not_applicable(field_applicable));
        }
        Ok(())
    }

    /// `field_applicable` must be `N/A` when `field` is one of `responses`.
    ///
    /// With `inverse`, an answered `field` outside `responses` makes
    /// `field_applicable` applicable.
    pub fn not_applicable_if(
        &self,
        responses: &[&str],
        field: &str,
        field_applicable: &str,
        inverse: bool,
    ) -> ValidationResult {
        if self.data.is_blank(field) {
            return Ok(());
        }
        let is_na = self.data.equals(field_applicable, NOT_APPLICABLE);
        if self.data.is_one_of(field, responses) {
            if !is_na {
                return Err(ValidationError::not_applicable(field_applicable));
            }
        } else if inverse && (is_na || self.data.is_blank(field_applicable)) {
            return Err(ValidationError::applicable(field_applicable));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crf_model::constants::{MALE, NO, YES};

    #[test]
    fn required_if_both_directions() {
        let data = CleanedData::new().with("in_care_6m", YES);
        let rules = Rules::new(&data);
        assert_eq!(
            rules.required_if(&[YES], "in_care_6m", "in_care_duration"),
            Err(ValidationError::required("in_care_duration"))
        );

        let data = CleanedData::new()
            .with("in_care_6m", NO)
            .with("in_care_duration", "5y");
        assert_eq!(
            Rules::new(&data).required_if(&[YES], "in_care_6m", "in_care_duration"),
            Err(ValidationError::not_required("in_care_duration"))
        );
    }

    #[test]
    fn not_required_if_without_inverse_allows_blank() {
        let data = CleanedData::new().with("dm_test", YES);
        let rules = Rules::new(&data);
        assert!(rules.not_required_if(&[NO], "dm_test", "dm_test_date", false).is_ok());
        assert_eq!(
            rules.not_required_if(&[NO], "dm_test", "dm_test_date", true),
            Err(ValidationError::required("dm_test_date"))
        );
    }

    #[test]
    fn applicable_if_treats_blank_as_answered_not_na() {
        let data = CleanedData::new().with("hoh", YES);
        assert_eq!(
            Rules::new(&data).applicable_if(&[NO], "hoh", "relationship_to_hoh"),
            Err(ValidationError::not_applicable("relationship_to_hoh"))
        );

        let data = CleanedData::new().with("hoh", NO);
        assert_eq!(
            Rules::new(&data).applicable_if(&[NO], "hoh", "relationship_to_hoh"),
            Err(ValidationError::applicable("relationship_to_hoh"))
        );

        let data = CleanedData::new();
        assert!(
            Rules::new(&data)
                .applicable_if(&[NO], "hoh", "relationship_to_hoh")
                .is_ok()
        );
    }

    #[test]
    fn not_applicable_if_for_males() {
        let data = CleanedData::new().with("gender", MALE).with("pregnant", NO);
        assert_eq!(
            Rules::new(&data).not_applicable_if(&[MALE], "gender", "pregnant", false),
            Err(ValidationError::not_applicable("pregnant"))
        );
        let data = CleanedData::new()
            .with("gender", MALE)
            .with("pregnant", NOT_APPLICABLE);
        assert!(
            Rules::new(&data)
                .not_applicable_if(&[MALE], "gender", "pregnant", false)
                .is_ok()
        );
    }

    #[test]
    fn not_required_if_true_uses_custom_message() {
        let data = CleanedData::new().with("confirm_randomize_now", "RANDOMIZE");
        let err = Rules::new(&data)
            .not_required_if_true(true, "confirm_randomize_now", Some("Only complete if ready."))
            .unwrap_err();
        assert_eq!(err.message, "Only complete if ready.");
        assert_eq!(err.code, ErrorCode::NotRequired);
    }
}
