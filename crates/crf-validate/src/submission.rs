//! A form submission and the related records needed to validate it.

use serde::{Deserialize, Serialize};
use tracing::info_span;

use crf_model::{
    CleanedData, HealthEconomicsContext, PatientGroup, PatientLog, PatientRecord,
    SubjectScreening, VisitContext,
};

use crate::config::ValidatorConfig;
use crate::error::SubmissionError;
use crate::forms::{
    ClinicalReviewBaselineValidator, DmInitialReviewValidator, FormKind, HivInitialReviewValidator,
    HouseholdAssetsValidator, HouseholdHeadValidator, HtnInitialReviewValidator,
    IndicatorsValidator, PatientGroupRandoValidator, PatientGroupValidator, PatientLogValidator,
    SubjectScreeningValidator, VitalsValidator, validate_form,
};

/// One CRF submission.
///
/// Only the context fields the chosen form reads need to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub form: FormKind,
    #[serde(default)]
    pub cleaned_data: CleanedData,
    #[serde(default)]
    pub visit: VisitContext,
    /// The stored group being edited. Absent for a new group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_group: Option<PatientGroup>,
    /// Patients selected on the group form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients: Option<Vec<PatientRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_log: Option<PatientLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_screening: Option<SubjectScreening>,
    #[serde(default)]
    pub health_economics: HealthEconomicsContext,
}

impl FormSubmission {
    pub fn new(form: FormKind, cleaned_data: CleanedData) -> Self {
        Self {
            form,
            cleaned_data,
            visit: VisitContext::default(),
            patient_group: None,
            patients: None,
            patient_log: None,
            subject_screening: None,
            health_economics: HealthEconomicsContext::default(),
        }
    }

    #[must_use]
    pub fn with_visit(mut self, visit: VisitContext) -> Self {
        self.visit = visit;
        self
    }

    #[must_use]
    pub fn with_patient_group(mut self, group: PatientGroup) -> Self {
        self.patient_group = Some(group);
        self
    }

    #[must_use]
    pub fn with_patients(mut self, patients: Vec<PatientRecord>) -> Self {
        self.patients = Some(patients);
        self
    }

    #[must_use]
    pub fn with_patient_log(mut self, patient_log: PatientLog) -> Self {
        self.patient_log = Some(patient_log);
        self
    }

    #[must_use]
    pub fn with_subject_screening(mut self, subject_screening: SubjectScreening) -> Self {
        self.subject_screening = Some(subject_screening);
        self
    }

    #[must_use]
    pub fn with_health_economics(mut self, health_economics: HealthEconomicsContext) -> Self {
        self.health_economics = health_economics;
        self
    }

    /// The stored group, or `new_group` when editing an unsaved one.
    fn group<'a>(&'a self, new_group: &'a PatientGroup) -> &'a PatientGroup {
        self.patient_group.as_ref().unwrap_or(new_group)
    }

    /// Run the form's validator against the submitted data.
    pub fn validate(&self, config: &ValidatorConfig) -> Result<(), SubmissionError> {
        let span = info_span!("validate_submission", form = %self.form);
        let _guard = span.enter();

        let data = &self.cleaned_data;
        let rules = &config.group;
        let new_group = PatientGroup::default();
        let result = match self.form {
            FormKind::PatientGroup => {
                let mut validator = PatientGroupValidator::new(self.group(&new_group), rules);
                if let Some(patients) = &self.patients {
                    validator = validator.with_patients(patients);
                }
                validate_form(&validator, data)
            }
            FormKind::PatientGroupRando => validate_form(
                &PatientGroupRandoValidator::new(self.group(&new_group), rules),
                data,
            ),
            FormKind::PatientLog => {
                let mut validator = PatientLogValidator::new();
                if let Some(subject_screening) = &self.subject_screening {
                    validator = validator.with_subject_screening(subject_screening);
                }
                validate_form(&validator, data)
            }
            FormKind::SubjectScreening => {
                let patient_log = self.patient_log.as_ref().ok_or(
                    SubmissionError::MissingContext {
                        form: self.form,
                        context: "patient_log",
                    },
                )?;
                let validator = SubjectScreeningValidator::new(patient_log)
                    .with_consent_period(config.consent_period);
                validate_form(&validator, data)
            }
            FormKind::ClinicalReviewBaseline => {
                let subject_screening = self.subject_screening.as_ref().ok_or(
                    SubmissionError::MissingContext {
                        form: self.form,
                        context: "subject_screening",
                    },
                )?;
                validate_form(&ClinicalReviewBaselineValidator::new(subject_screening), data)
            }
            FormKind::HivInitialReview => {
                validate_form(&HivInitialReviewValidator::new(self.visit), data)
            }
            FormKind::DmInitialReview => {
                validate_form(&DmInitialReviewValidator::new(self.visit), data)
            }
            FormKind::HtnInitialReview => {
                validate_form(&HtnInitialReviewValidator::new(self.visit), data)
            }
            FormKind::Vitals => validate_form(&VitalsValidator::new(self.visit), data),
            FormKind::Indicators => validate_form(&IndicatorsValidator::new(self.visit), data),
            FormKind::HealthEconomicsHouseholdHead => {
                validate_form(&HouseholdHeadValidator::new(self.visit), data)
            }
            FormKind::HealthEconomicsAssets => validate_form(
                &HouseholdAssetsValidator::new(self.visit, &self.health_economics),
                data,
            ),
        };
        result.map_err(SubmissionError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crf_model::constants::YES;
    use crf_model::{Condition, GroupStatus};

    use crate::error::ErrorCode;

    #[test]
    fn screening_without_patient_log_is_missing_context() {
        let submission = FormSubmission::new(FormKind::SubjectScreening, CleanedData::new());
        let err = submission.validate(&ValidatorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::MissingContext {
                context: "patient_log",
                ..
            }
        ));
        assert!(err.rejection().is_none());
    }

    #[test]
    fn randomized_group_is_rejected_through_dispatch() {
        let group = PatientGroup::new("Group A")
            .with_id("grp-1")
            .with_status(GroupStatus::Complete)
            .with_randomized(true);
        let submission = FormSubmission::new(FormKind::PatientGroup, CleanedData::new())
            .with_patient_group(group);
        let err = submission.validate(&ValidatorConfig::default()).unwrap_err();
        assert_eq!(
            err.rejection().map(|e| e.code),
            Some(ErrorCode::InvalidRandomize)
        );
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "form": "indicators",
            "cleaned_data": {"r1_taken": "Yes", "sys_blood_pressure_r1": 120},
            "visit": {"baseline": true}
        }"#;
        let submission: FormSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.form, FormKind::Indicators);
        assert!(submission.visit.baseline);
        assert!(submission.visit.clinical_review_exists);
        assert!(submission.cleaned_data.equals("r1_taken", YES));
        let err = submission.validate(&ValidatorConfig::default()).unwrap_err();
        assert_eq!(
            err.rejection().and_then(|e| e.field_name()),
            Some("weight")
        );
    }

    #[test]
    fn clinical_review_reads_screening_record() {
        let submission = FormSubmission::new(FormKind::ClinicalReviewBaseline, CleanedData::new())
            .with_subject_screening(SubjectScreening::default().with_dx(Condition::Hiv, YES));
        assert!(submission.validate(&ValidatorConfig::default()).is_ok());
    }
}
