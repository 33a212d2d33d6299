//! Summaries of records related to the form being validated.
//!
//! Validators do not query storage. The caller resolves the prior forms a
//! rule needs and passes these summaries in alongside the cleaned data.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::Condition;

/// Facts about the subject visit a CRF is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitContext {
    #[serde(default)]
    pub baseline: bool,
    #[serde(default)]
    pub end_of_study: bool,
    /// The clinical review CRF for this visit has been saved.
    #[serde(default = "default_true")]
    pub clinical_review_exists: bool,
    /// An initial hypertension review exists for the subject.
    #[serde(default)]
    pub htn_initial_review_exists: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VisitContext {
    fn default() -> Self {
        Self::follow_up()
    }
}

impl VisitContext {
    pub fn baseline() -> Self {
        Self {
            baseline: true,
            ..Self::follow_up()
        }
    }

    pub fn follow_up() -> Self {
        Self {
            baseline: false,
            end_of_study: false,
            clinical_review_exists: true,
            htn_initial_review_exists: false,
        }
    }

    pub fn end_of_study() -> Self {
        Self {
            end_of_study: true,
            ..Self::follow_up()
        }
    }

    #[must_use]
    pub fn without_clinical_review(mut self) -> Self {
        self.clinical_review_exists = false;
        self
    }

    #[must_use]
    pub fn with_htn_initial_review(mut self) -> Self {
        self.htn_initial_review_exists = true;
        self
    }
}

/// The subject screening form as recorded for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubjectScreening {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub initials: Option<String>,
    #[serde(default)]
    pub hospital_identifier: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub hiv_dx: Option<String>,
    #[serde(default)]
    pub dm_dx: Option<String>,
    #[serde(default)]
    pub htn_dx: Option<String>,
}

impl SubjectScreening {
    /// Screening answer for "diagnosed with `condition`".
    pub fn dx(&self, condition: Condition) -> Option<&str> {
        match condition {
            Condition::Hiv => self.hiv_dx.as_deref(),
            Condition::Diabetes => self.dm_dx.as_deref(),
            Condition::Hypertension => self.htn_dx.as_deref(),
        }
    }

    #[must_use]
    pub fn with_dx(mut self, condition: Condition, response: &str) -> Self {
        let slot = match condition {
            Condition::Hiv => &mut self.hiv_dx,
            Condition::Diabetes => &mut self.dm_dx,
            Condition::Hypertension => &mut self.htn_dx,
        };
        *slot = Some(response.to_string());
        self
    }
}

/// The patient log entry a screening form was started from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientLog {
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age_in_years: Option<i64>,
    #[serde(default)]
    pub conditions: BTreeSet<Condition>,
}

/// Related health-economics CRFs for the visit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthEconomicsContext {
    /// The household-head CRF, if saved. Holds the `hoh` response.
    #[serde(default)]
    pub household_head: Option<HouseholdHeadSummary>,
    #[serde(default)]
    pub patient_crf_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdHeadSummary {
    /// Whether the participant is the head of household.
    pub hoh: String,
}
