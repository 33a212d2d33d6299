//! Outcomes of checking a submission file or reviewing a patient list.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info_span};

use crf_model::PatientRecord;
use crf_validate::group::{
    confirm_group_size, confirm_minimum_of_each_condition, confirm_ratio,
    confirm_stable_screened_consented, verify_ratio,
};
use crf_validate::{
    FormKind, FormSubmission, GroupError, GroupRules, RatioSummary, SubmissionError,
    ValidationError, ValidatorConfig,
};

use crate::logging::redact_value;

/// Result of validating one submission.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub form: FormKind,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

/// Read a JSON submission from disk.
pub fn read_submission(path: &Path) -> Result<FormSubmission> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Read a JSON list of patient records from disk.
pub fn read_patients(path: &Path) -> Result<Vec<PatientRecord>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Validate a submission. A rejection is an outcome; missing context is an
/// error.
pub fn check_submission(
    submission: &FormSubmission,
    config: &ValidatorConfig,
) -> Result<CheckOutcome> {
    let error = match submission.validate(config) {
        Ok(()) => None,
        Err(SubmissionError::Rejected(error)) => Some(error),
        Err(other) => return Err(other.into()),
    };
    Ok(CheckOutcome {
        form: submission.form,
        accepted: error.is_none(),
        error,
    })
}

/// One composition rule applied to a patient list.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleOutcome {
    fn from_result(rule: &'static str, result: Result<(), GroupError>) -> Self {
        match result {
            Ok(()) => Self {
                rule,
                passed: true,
                message: None,
            },
            Err(error) => Self {
                rule,
                passed: false,
                message: Some(error.to_string()),
            },
        }
    }
}

/// Composition review of a candidate patient group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub patients: usize,
    pub ratio: RatioSummary,
    pub rules: Vec<RuleOutcome>,
}

impl GroupReport {
    pub fn passed(&self) -> bool {
        self.rules.iter().all(|rule| rule.passed)
    }
}

/// Apply every group composition rule to `patients`.
pub fn review_group(patients: &[PatientRecord], rules: &GroupRules) -> GroupReport {
    let span = info_span!("review_group", patients = patients.len());
    let _guard = span.enter();
    for patient in patients {
        debug!(
            patient = redact_value(&patient.name),
            ncd = patient.has_ncd(),
            hiv = patient.has_hiv(),
            "reviewing patient"
        );
    }

    let ratio_rule = if patients.len() < rules.min_group_size_for_ratio {
        RuleOutcome {
            rule: "ratio",
            passed: true,
            message: Some(format!(
                "Not checked for groups under {} patients.",
                rules.min_group_size_for_ratio
            )),
        }
    } else {
        RuleOutcome::from_result("ratio", confirm_ratio(patients, rules).map(|_| ()))
    };

    GroupReport {
        patients: patients.len(),
        ratio: verify_ratio(patients, rules),
        rules: vec![
            RuleOutcome::from_result("eligibility", confirm_stable_screened_consented(patients)),
            RuleOutcome::from_result(
                "size",
                confirm_group_size(patients, rules.min_group_size, false),
            ),
            ratio_rule,
            RuleOutcome::from_result("makeup", confirm_minimum_of_each_condition(patients)),
        ],
    }
}
