//! Patient group randomization form.

use crf_model::constants::YES;
use crf_model::{CleanedData, PatientGroup, PatientRecord};

use super::patient_group::{RANDOMIZED_GROUP_MESSAGE, confirm_randomize_literal};
use super::{FormKind, FormValidator};
use crate::config::GroupRules;
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

/// Confirms a saved, complete group may be randomized.
#[derive(Debug, Clone, Copy)]
pub struct PatientGroupRandoValidator<'a> {
    group: &'a PatientGroup,
    rules: &'a GroupRules,
}

impl<'a> PatientGroupRandoValidator<'a> {
    pub fn new(group: &'a PatientGroup, rules: &'a GroupRules) -> Self {
        Self { group, rules }
    }

    fn block_if_patient_in_multiple_groups(&self) -> ValidationResult {
        if let Some(patient) = self.group.patients.iter().find(|p| p.groups.len() > 1) {
            return Err(ValidationError::all(
                format!(
                    "Patient is in more than one group. See {}. Got {}.",
                    identifier(patient),
                    patient.groups.join(" ")
                ),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    fn block_if_patient_already_randomized(&self) -> ValidationResult {
        let randomized = self.group.patients.iter().find_map(|p| {
            p.group_identifier
                .as_deref()
                .filter(|g| !g.trim().is_empty())
                .map(|g| (p, g))
        });
        if let Some((patient, group_identifier)) = randomized {
            return Err(ValidationError::all(
                format!(
                    "Patient is already in a randomized group. Got {} is in group {group_identifier}",
                    identifier(patient)
                ),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }
}

fn identifier(patient: &PatientRecord) -> &str {
    patient
        .subject_identifier
        .as_deref()
        .unwrap_or(&patient.name)
}

impl FormValidator for PatientGroupRandoValidator<'_> {
    fn form(&self) -> FormKind {
        FormKind::PatientGroupRando
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        if self.group.randomized {
            return Err(ValidationError::all(
                RANDOMIZED_GROUP_MESSAGE,
                ErrorCode::InvalidRandomize,
            ));
        }
        self.block_if_patient_in_multiple_groups()?;
        self.block_if_patient_already_randomized()?;

        if data.is_blank("name") {
            return Err(ValidationError::required("name"));
        }
        if !self.group.is_saved() {
            return Err(ValidationError::all(
                "Complete Patient Group form first",
                ErrorCode::InvalidCompleteGroupFirst,
            ));
        }
        if !self.group.status.is_complete() {
            return Err(ValidationError::all(
                "Return to the Patient Group form and verify the status is set to COMPLETE",
                ErrorCode::InvalidStatusNotComplete,
            ));
        }

        confirm_randomize_literal(data, self.rules)?;
        Rules::new(data).not_required_if_true(
            !data.equals("randomize_now", YES),
            "confirm_randomize_now",
            Some("Only complete if you are ready to randomize now."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crf_model::GroupStatus;

    fn saved_complete_group() -> PatientGroup {
        PatientGroup::new("PARKSIDE")
            .with_id("1")
            .with_status(GroupStatus::Complete)
            .with_patients(vec![PatientRecord::new("NAME-0").consented("999-0")])
    }

    #[test]
    fn patient_in_two_groups_is_named() {
        let mut group = saved_complete_group();
        group.patients[0].groups = vec!["PARKSIDE".to_string(), "RIVERSIDE".to_string()];
        let rules = GroupRules::default();
        let err = PatientGroupRandoValidator::new(&group, &rules)
            .clean(&CleanedData::new().with("name", "PARKSIDE"))
            .unwrap_err();
        assert_eq!(
            err.message,
            "Patient is in more than one group. See 999-0. Got PARKSIDE RIVERSIDE."
        );
    }

    #[test]
    fn unsaved_group_must_be_completed_first() {
        let group = PatientGroup::new("PARKSIDE");
        let rules = GroupRules::default();
        let err = PatientGroupRandoValidator::new(&group, &rules)
            .clean(&CleanedData::new().with("name", "PARKSIDE"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCompleteGroupFirst);
    }

    #[test]
    fn confirmation_only_when_randomizing_now() {
        let group = saved_complete_group();
        let rules = GroupRules::default();
        let validator = PatientGroupRandoValidator::new(&group, &rules);

        let data = CleanedData::new()
            .with("name", "PARKSIDE")
            .with("randomize_now", YES)
            .with("confirm_randomize_now", "randomize");
        assert_eq!(
            validator.clean(&data).unwrap_err().code,
            ErrorCode::InvalidRandomizeConfirmation
        );

        let data = CleanedData::new()
            .with("name", "PARKSIDE")
            .with("randomize_now", "No")
            .with("confirm_randomize_now", "RANDOMIZE");
        assert_eq!(
            validator.clean(&data).unwrap_err().code,
            ErrorCode::NotRequired
        );

        let data = CleanedData::new()
            .with("name", "PARKSIDE")
            .with("randomize_now", YES)
            .with("confirm_randomize_now", "RANDOMIZE");
        assert!(validator.clean(&data).is_ok());
    }
}
