//! Subject screening form.

use chrono::Months;

use crf_model::constants::{FEMALE, MALE, NO, YES};
use crf_model::{CleanedData, Condition, PatientLog};

use super::{FormKind, FormValidator};
use crate::config::ConsentPeriod;
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::{Rules, duration_to_date};

/// Minimum time in care, and since each diagnosis, to be eligible.
const MIN_MONTHS_IN_CARE: u32 = 6;

/// Checks a screening form against the patient log it was started from.
#[derive(Debug, Clone, Copy)]
pub struct SubjectScreeningValidator<'a> {
    patient_log: &'a PatientLog,
    consent_period: Option<ConsentPeriod>,
}

impl<'a> SubjectScreeningValidator<'a> {
    pub fn new(patient_log: &'a PatientLog) -> Self {
        Self {
            patient_log,
            consent_period: None,
        }
    }

    #[must_use]
    pub fn with_consent_period(mut self, consent_period: Option<ConsentPeriod>) -> Self {
        self.consent_period = consent_period;
        self
    }

    fn consent_for_period(&self, rules: &Rules<'_>) -> ValidationResult {
        if let (Some(period), Some(report_date)) = (self.consent_period, rules.report_date())
            && !period.contains(report_date)
        {
            return Err(ValidationError::all(
                format!(
                    "Report date is outside the consent period. Expected {} to {}.",
                    period.start, period.end
                ),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    fn gender_matches_patient_log(&self, data: &CleanedData) -> ValidationResult {
        let expected = self.patient_log.gender.as_deref();
        if data.text("gender") != expected {
            let display = match expected {
                Some(MALE) => "Male",
                Some(FEMALE) => "Female",
                Some(other) => other,
                None => "no gender",
            };
            return Err(ValidationError::field(
                "gender",
                format!("Invalid. Expected {display}. See Patient Log."),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    fn age_matches_patient_log(&self, data: &CleanedData) -> ValidationResult {
        let expected = self.patient_log.age_in_years;
        if data.int("age_in_years") != expected {
            let display = expected.map_or_else(|| "no age".to_string(), |age| age.to_string());
            return Err(ValidationError::field(
                "age_in_years",
                format!("Invalid. Expected {display}. See Patient Log."),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    /// A screening answer must agree with the conditions on the patient log.
    fn condition_matches_patient_log(
        &self,
        data: &CleanedData,
        condition: Condition,
    ) -> ValidationResult {
        if self.patient_log.conditions.is_empty() {
            return Err(ValidationError::all(
                "No conditions (HIV/DM/HTN) have been indicated for this patient. \
                 See the Patient Log",
                ErrorCode::Invalid,
            ));
        }
        let field = dx_field(condition);
        let logged = self.patient_log.conditions.contains(&condition);
        let code = condition.as_code();
        if !logged && data.equals(&field, YES) {
            return Err(ValidationError::field(
                &field,
                format!("Invalid. {code} was not indicated as a condition on the Patient Log"),
                ErrorCode::Invalid,
            ));
        }
        if logged && data.equals(&field, NO) {
            return Err(ValidationError::field(
                &field,
                format!("Invalid. {code} was indicated as a condition on the Patient Log"),
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    fn validate_condition_section(
        &self,
        rules: &Rules<'_>,
        condition: Condition,
    ) -> ValidationResult {
        let prefix = condition.field_prefix();
        let dx = dx_field(condition);
        let dx_6m = format!("{prefix}_dx_6m");
        let dx_ago = format!("{prefix}_dx_ago");

        self.condition_matches_patient_log(rules.data(), condition)?;
        rules.applicable_if(&[YES], &dx, &dx_6m)?;
        rules.required_if(&[YES], &dx_6m, &dx_ago)?;
        duration_is_6m_or_more(rules, &dx_ago)?;

        let follow_ups: &[&str] = match condition {
            Condition::Hiv => &["art_unchanged_3m", "art_stable", "art_adherent"],
            Condition::Diabetes => &["dm_complications"],
            Condition::Hypertension => &["htn_complications"],
        };
        for field in follow_ups {
            rules.applicable_if(&[YES], &dx, field)?;
        }
        Ok(())
    }
}

fn dx_field(condition: Condition) -> String {
    format!("{}_dx", condition.field_prefix())
}

/// The duration in `field` must reach back at least six months from the
/// report date.
fn duration_is_6m_or_more(rules: &Rules<'_>, field: &str) -> ValidationResult {
    let Some(report_date) = rules.report_date() else {
        return Ok(());
    };
    let Some(duration) = rules.ago_duration(field)? else {
        return Ok(());
    };
    let too_recent = duration_to_date(duration, report_date)
        .and_then(|start| start.checked_add_months(Months::new(MIN_MONTHS_IN_CARE)))
        .is_none_or(|eligible_from| eligible_from > report_date);
    if too_recent {
        return Err(ValidationError::field(
            field,
            "Expected at least 6m from the report date",
            ErrorCode::InvalidDurationInCare,
        ));
    }
    Ok(())
}

impl FormValidator for SubjectScreeningValidator<'_> {
    fn form(&self) -> FormKind {
        FormKind::SubjectScreening
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        let rules = Rules::new(data);

        self.consent_for_period(&rules)?;
        self.gender_matches_patient_log(data)?;
        self.age_matches_patient_log(data)?;

        if data.equals("consent_ability", NO) {
            return Err(ValidationError::field(
                "consent_ability",
                "You may NOT screen this subject without their verbal consent.",
                ErrorCode::Invalid,
            ));
        }

        rules.required_if(&[YES], "in_care_6m", "in_care_duration")?;
        duration_is_6m_or_more(&rules, "in_care_duration")?;

        for condition in Condition::ALL {
            self.validate_condition_section(&rules, condition)?;
        }

        rules.not_applicable_if(&[MALE], "gender", "pregnant", false)?;
        rules.required_if(&[YES], "unsuitable_for_study", "reasons_unsuitable")
    }
}
