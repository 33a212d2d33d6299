//! Per-form validators.
//!
//! Each form is a small struct holding the related records its rules read,
//! implementing [`FormValidator::clean`]. Rules run in a fixed order and the
//! first failure is returned.

mod clinical_review_baseline;
mod dm_initial_review;
mod health_economics;
mod hiv_initial_review;
mod htn_initial_review;
mod indicators;
mod patient_group;
mod patient_group_rando;
mod patient_log;
mod subject_screening;
mod vitals;

pub use clinical_review_baseline::ClinicalReviewBaselineValidator;
pub use dm_initial_review::DmInitialReviewValidator;
pub use health_economics::{HouseholdAssetsValidator, HouseholdHeadValidator};
pub use hiv_initial_review::HivInitialReviewValidator;
pub use htn_initial_review::HtnInitialReviewValidator;
pub use indicators::IndicatorsValidator;
pub use patient_group::PatientGroupValidator;
pub use patient_group_rando::PatientGroupRandoValidator;
pub use patient_log::PatientLogValidator;
pub use subject_screening::SubjectScreeningValidator;
pub use vitals::VitalsValidator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crf_model::{CleanedData, VisitContext};

use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// A validator for one CRF.
pub trait FormValidator {
    fn form(&self) -> FormKind;

    /// Check the cleaned data, returning the first rule that fails.
    fn clean(&self, data: &CleanedData) -> ValidationResult;
}

/// Run `validator` inside a tracing span, logging the outcome.
///
/// Only the error key and code are logged; messages may name patients.
pub fn validate_form<V>(validator: &V, data: &CleanedData) -> ValidationResult
where
    V: FormValidator + ?Sized,
{
    let form = validator.form();
    let span = debug_span!("validate_form", form = form.as_str(), fields = data.len());
    let _guard = span.enter();

    match validator.clean(data) {
        Ok(()) => {
            debug!("form accepted");
            Ok(())
        }
        Err(error) => {
            warn!(key = %error.key, code = %error.code, "form rejected");
            Err(error)
        }
    }
}

/// Subject CRFs may only be entered after the visit's clinical review.
pub(crate) fn require_clinical_review(visit: &VisitContext) -> ValidationResult {
    if visit.clinical_review_exists {
        Ok(())
    } else {
        Err(ValidationError::all(
            "Complete the `Clinical Review` CRF first.",
            ErrorCode::ClinicalReviewMissing,
        ))
    }
}

/// Every form with a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    PatientGroup,
    PatientGroupRando,
    PatientLog,
    SubjectScreening,
    ClinicalReviewBaseline,
    HivInitialReview,
    DmInitialReview,
    HtnInitialReview,
    Vitals,
    Indicators,
    HealthEconomicsHouseholdHead,
    HealthEconomicsAssets,
}

impl FormKind {
    pub const ALL: [FormKind; 12] = [
        FormKind::PatientGroup,
        FormKind::PatientGroupRando,
        FormKind::PatientLog,
        FormKind::SubjectScreening,
        FormKind::ClinicalReviewBaseline,
        FormKind::HivInitialReview,
        FormKind::DmInitialReview,
        FormKind::HtnInitialReview,
        FormKind::Vitals,
        FormKind::Indicators,
        FormKind::HealthEconomicsHouseholdHead,
        FormKind::HealthEconomicsAssets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::PatientGroup => "patient_group",
            FormKind::PatientGroupRando => "patient_group_rando",
            FormKind::PatientLog => "patient_log",
            FormKind::SubjectScreening => "subject_screening",
            FormKind::ClinicalReviewBaseline => "clinical_review_baseline",
            FormKind::HivInitialReview => "hiv_initial_review",
            FormKind::DmInitialReview => "dm_initial_review",
            FormKind::HtnInitialReview => "htn_initial_review",
            FormKind::Vitals => "vitals",
            FormKind::Indicators => "indicators",
            FormKind::HealthEconomicsHouseholdHead => "health_economics_household_head",
            FormKind::HealthEconomicsAssets => "health_economics_assets",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FormKind::PatientGroup => "Patient Group",
            FormKind::PatientGroupRando => "Patient Group Randomization",
            FormKind::PatientLog => "Patient Log",
            FormKind::SubjectScreening => "Subject Screening",
            FormKind::ClinicalReviewBaseline => "Clinical Review (Baseline)",
            FormKind::HivInitialReview => "HIV Initial Review",
            FormKind::DmInitialReview => "Diabetes Initial Review",
            FormKind::HtnInitialReview => "Hypertension Initial Review",
            FormKind::Vitals => "Vitals",
            FormKind::Indicators => "Indicators",
            FormKind::HealthEconomicsHouseholdHead => "Health Economics: Household Head",
            FormKind::HealthEconomicsAssets => "Health Economics: Assets",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormKind::PatientGroup => "Group status, eligibility, size and NCD:HIV ratio",
            FormKind::PatientGroupRando => "Confirm a complete group is ready to randomize",
            FormKind::PatientLog => "Appointment dates and agreement with screening",
            FormKind::SubjectScreening => "Eligibility against the patient log",
            FormKind::ClinicalReviewBaseline => "Condition tests and diagnoses at baseline",
            FormKind::HivInitialReview => "HIV diagnosis, ART, viral load and CD4",
            FormKind::DmInitialReview => "Diabetes diagnosis, treatment and glucose",
            FormKind::HtnInitialReview => "Hypertension diagnosis and treatment",
            FormKind::Vitals => "Weight, height and blood pressure",
            FormKind::Indicators => "Baseline measures and blood pressure readings",
            FormKind::HealthEconomicsHouseholdHead => "Household head demographics",
            FormKind::HealthEconomicsAssets => "Household assets",
        }
    }

    /// Subject CRFs need the visit's clinical review saved first.
    pub fn requires_clinical_review(&self) -> bool {
        matches!(
            self,
            FormKind::HivInitialReview
                | FormKind::DmInitialReview
                | FormKind::HtnInitialReview
                | FormKind::Vitals
                | FormKind::Indicators
                | FormKind::HealthEconomicsHouseholdHead
                | FormKind::HealthEconomicsAssets
        )
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown form: {s}"))
    }
}
