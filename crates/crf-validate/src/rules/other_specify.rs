//! "Other, specify" and multi-select rules.

use crf_model::constants::OTHER;

use super::Rules;
use crate::error::{ErrorCode, ValidationError, ValidationResult};

impl Rules<'_> {
    /// Free text in `other_field` (default `{field}_other`) is required when
    /// `field` is OTHER and must be blank otherwise.
    pub fn validate_other_specify(
        &self,
        field: &str,
        other_field: Option<&str>,
    ) -> ValidationResult {
        let other_field = other_field.map_or_else(|| format!("{field}_other"), str::to_string);
        self.required_if(&[OTHER], field, &other_field)
    }

    /// Like [`Rules::validate_other_specify`] for a multi-select field:
    /// `field_other` is required when `response` is among the selections.
    pub fn m2m_other_specify(
        &self,
        response: &str,
        m2m_field: &str,
        field_other: &str,
    ) -> ValidationResult {
        let selected = self.data().choices(m2m_field).contains(&response);
        if selected && self.data().is_blank(field_other) {
            return Err(ValidationError::required(field_other));
        }
        if !selected && self.data().is_present(field_other) {
            return Err(ValidationError::not_required(field_other));
        }
        Ok(())
    }

    /// Any of `responses` must be the only selection in `m2m_field`.
    pub fn m2m_single_selection_if(&self, responses: &[&str], m2m_field: &str) -> ValidationResult {
        let selections = self.data().choices(m2m_field);
        if selections.len() < 2 {
            return Ok(());
        }
        if let Some(exclusive) = selections.iter().find(|s| responses.contains(*s)) {
            return Err(ValidationError::field(
                m2m_field,
                format!(
                    "Invalid combination. `{exclusive}` may not be combined with other selections"
                ),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }
}
