//! Patient group form: status changes and the completion gate.

use crf_model::constants::YES;
use crf_model::{CleanedData, GroupStatus, PatientGroup, PatientRecord};

use super::{FormKind, FormValidator};
use crate::config::GroupRules;
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::group::{
    GroupError, confirm_group_size, confirm_ratio, confirm_stable_screened_consented,
};

pub(super) const RANDOMIZED_GROUP_MESSAGE: &str = "A randomized group may not be changed";
pub(super) const CONFIRM_RANDOMIZE_MESSAGE: &str =
    "If you wish to randomize this group, please confirm";

/// Validates edits to a patient group.
///
/// Members are read from the submitted patient list when one is given,
/// otherwise from the stored group.
#[derive(Debug, Clone, Copy)]
pub struct PatientGroupValidator<'a> {
    group: &'a PatientGroup,
    patients: Option<&'a [PatientRecord]>,
    rules: &'a GroupRules,
}

impl<'a> PatientGroupValidator<'a> {
    pub fn new(group: &'a PatientGroup, rules: &'a GroupRules) -> Self {
        Self {
            group,
            patients: None,
            rules,
        }
    }

    /// Use the submitted membership instead of the stored one.
    #[must_use]
    pub fn with_patients(mut self, patients: &'a [PatientRecord]) -> Self {
        self.patients = Some(patients);
        self
    }

    fn patients(&self) -> &'a [PatientRecord] {
        match self.patients {
            Some(patients) if !patients.is_empty() => patients,
            _ => self.group.patients.as_slice(),
        }
    }

    fn confirm_complete_group(&self, data: &CleanedData) -> ValidationResult {
        let patients = self.patients();

        confirm_stable_screened_consented(patients).map_err(membership_error)?;

        confirm_group_size(
            patients,
            self.rules.min_group_size,
            flag_set(data, "bypass_group_size_min"),
        )
        .map_err(membership_error)?;

        if !flag_set(data, "bypass_group_ratio")
            && patients.len() >= self.rules.min_group_size_for_ratio
        {
            confirm_ratio(patients, self.rules).map_err(|e| {
                let name = data.text("name").unwrap_or(&self.group.name);
                ValidationError::all(
                    format!("{e} See group {name}"),
                    ErrorCode::InvalidConditionRatio,
                )
            })?;
        }
        Ok(())
    }
}

impl FormValidator for PatientGroupValidator<'_> {
    fn form(&self) -> FormKind {
        FormKind::PatientGroup
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        if self.group.randomized {
            return Err(ValidationError::all(
                RANDOMIZED_GROUP_MESSAGE,
                ErrorCode::InvalidRandomize,
            ));
        }

        let status = match data.text("status") {
            Some(text) => Some(text.parse::<GroupStatus>().map_err(|_| {
                ValidationError::field("status", "Invalid selection", ErrorCode::InvalidStatus)
            })?),
            None => None,
        };
        let complete = status.is_some_and(|s| s.is_complete());
        let randomize_now = data.equals("randomize_now", YES);

        if randomize_now && !complete {
            return Err(ValidationError::field(
                "randomize_now",
                "Invalid. Group is not complete",
                ErrorCode::InvalidRandomize,
            ));
        }

        if complete {
            self.confirm_complete_group(data)?;
        }

        confirm_randomize_literal(data, self.rules)
    }
}

/// `confirm_randomize_now` must carry the confirmation literal when
/// randomizing now.
pub(super) fn confirm_randomize_literal(
    data: &CleanedData,
    rules: &GroupRules,
) -> ValidationResult {
    if data.equals("randomize_now", YES)
        && data.text("confirm_randomize_now") != Some(rules.randomize_confirmation.as_str())
    {
        return Err(ValidationError::field(
            "confirm_randomize_now",
            CONFIRM_RANDOMIZE_MESSAGE,
            ErrorCode::InvalidRandomizeConfirmation,
        ));
    }
    Ok(())
}

/// Report an eligibility or size failure on `__all__`. An empty group is a
/// count problem whichever rule finds it.
fn membership_error(error: GroupError) -> ValidationError {
    let code = if error.is_size_error() {
        ErrorCode::InvalidPatientCount
    } else if error.is_eligibility_error() {
        ErrorCode::InvalidPatient
    } else {
        ErrorCode::InvalidConditionRatio
    };
    ValidationError::all(error.to_string(), code)
}

/// Bypass flags arrive as checkbox booleans or as a Yes response.
fn flag_set(data: &CleanedData, field: &str) -> bool {
    data.boolean(field) == Some(true) || data.equals(field, YES)
}
