//! Patient group composition rules.
//!
//! A group may only be marked complete (and later randomized) when every
//! member is stable, screened and consented, the group is large enough, and
//! the NCD:HIV mix falls inside the protocol ratio.

use serde::Serialize;
use thiserror::Error;

use crf_model::PatientRecord;

use crate::config::GroupRules;

/// A violated group composition rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("Patient is not known to be stable and in-care. {reference}.")]
    NotStable { patient: String, reference: String },

    #[error("Patient has not screened for eligibility. {reference}.")]
    NotScreened { patient: String, reference: String },

    #[error("Patient has not consented. {reference}.")]
    NotConsented { patient: String, reference: String },

    #[error("Patient group has no patients.")]
    NoPatients,

    #[error("Patient group must have at least {minimum} patients. Got {count}.")]
    Size { minimum: usize, count: usize },

    #[error("Ratio NDC:HIV not met. Expected at least 2:1. Got {ncd}:{hiv}.")]
    Ratio { ncd: usize, hiv: usize },

    #[error("Patient group must have at least {minimum} {kind} only patients. Got {count}.")]
    Makeup {
        kind: &'static str,
        minimum: usize,
        count: usize,
    },
}

impl GroupError {
    pub fn is_size_error(&self) -> bool {
        matches!(self, GroupError::NoPatients | GroupError::Size { .. })
    }

    pub fn is_eligibility_error(&self) -> bool {
        matches!(
            self,
            GroupError::NotStable { .. }
                | GroupError::NotScreened { .. }
                | GroupError::NotConsented { .. }
        )
    }
}

/// Fail if the group is empty, or smaller than `minimum` unless bypassed.
pub fn confirm_group_size(
    patients: &[PatientRecord],
    minimum: usize,
    bypass: bool,
) -> Result<(), GroupError> {
    if patients.is_empty() {
        return Err(GroupError::NoPatients);
    }
    if !bypass && patients.len() < minimum {
        return Err(GroupError::Size {
            minimum,
            count: patients.len(),
        });
    }
    Ok(())
}

/// Fail on the first patient, in stored order, who is not stable, not
/// screened or not consented (checked in that order).
pub fn confirm_stable_screened_consented(patients: &[PatientRecord]) -> Result<(), GroupError> {
    if patients.is_empty() {
        return Err(GroupError::NoPatients);
    }
    for patient in patients {
        let name = patient.name.clone();
        if !patient.stable {
            return Err(GroupError::NotStable {
                patient: name,
                reference: patient.reference(),
            });
        }
        if !patient.is_screened() {
            return Err(GroupError::NotScreened {
                patient: name,
                reference: patient.reference(),
            });
        }
        if !patient.is_consented() {
            return Err(GroupError::NotConsented {
                patient: name,
                reference: patient.reference(),
            });
        }
    }
    Ok(())
}

/// NCD:HIV counts for a candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioSummary {
    /// Patients with diabetes and/or hypertension.
    pub ncd: usize,
    /// Patients with HIV.
    pub hiv: usize,
    /// `ncd / hiv` rounded half-up to one decimal, `0.0` if either is zero.
    pub ratio: f64,
    pub out_of_range: bool,
}

/// Count NCD and HIV patients and test the ratio against `rules`.
///
/// A comorbid patient counts toward both sides. The range test uses the
/// exact ratio; only the reported value is rounded.
pub fn verify_ratio(patients: &[PatientRecord], rules: &GroupRules) -> RatioSummary {
    let ncd = patients.iter().filter(|p| p.has_ncd()).count();
    let hiv = patients.iter().filter(|p| p.has_hiv()).count();
    let exact = if ncd == 0 || hiv == 0 {
        0.0
    } else {
        ncd as f64 / hiv as f64
    };
    RatioSummary {
        ncd,
        hiv,
        ratio: round_half_up(exact, 1),
        out_of_range: !rules.ratio_in_range(exact),
    }
}

/// Fail if the NCD:HIV ratio is outside the configured range.
pub fn confirm_ratio(
    patients: &[PatientRecord],
    rules: &GroupRules,
) -> Result<RatioSummary, GroupError> {
    let summary = verify_ratio(patients, rules);
    if summary.out_of_range {
        return Err(GroupError::Ratio {
            ncd: summary.ncd,
            hiv: summary.hiv,
        });
    }
    Ok(summary)
}

pub const MIN_HIV_ONLY: usize = 2;
pub const MIN_NCD_ONLY: usize = 4;

/// Fail unless the group has at least two HIV-only and four NCD-only
/// patients.
pub fn confirm_minimum_of_each_condition(patients: &[PatientRecord]) -> Result<(), GroupError> {
    let hiv_only = patients
        .iter()
        .filter(|p| p.has_hiv() && !p.has_ncd())
        .count();
    if hiv_only < MIN_HIV_ONLY {
        return Err(GroupError::Makeup {
            kind: "HIV",
            minimum: MIN_HIV_ONLY,
            count: hiv_only,
        });
    }
    let ncd_only = patients
        .iter()
        .filter(|p| p.has_ncd() && !p.has_hiv())
        .count();
    if ncd_only < MIN_NCD_ONLY {
        return Err(GroupError::Makeup {
            kind: "NCD",
            minimum: MIN_NCD_ONLY,
            count: ncd_only,
        });
    }
    Ok(())
}

/// Ratios are never negative, so `f64::round` (half away from zero) rounds
/// half-up.
fn round_half_up(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
