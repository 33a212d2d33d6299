//! Vitals form.

use crf_model::constants::{ESTIMATED, MEASURED};
use crf_model::{CleanedData, VisitContext};

use super::{FormKind, FormValidator, require_clinical_review};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

/// Reading suffixes for the two blood pressure pairs on the form.
const BP_READINGS: [&str; 2] = ["one", "two"];

#[derive(Debug, Clone, Copy, Default)]
pub struct VitalsValidator {
    visit: VisitContext,
}

impl VitalsValidator {
    pub fn new(visit: VisitContext) -> Self {
        Self { visit }
    }

    fn validate_weight(&self, rules: &Rules<'_>) -> ValidationResult {
        let data = rules.data();
        if (self.visit.baseline || self.visit.end_of_study)
            && !data.equals("weight_determination", MEASURED)
        {
            return Err(ValidationError::field(
                "weight_determination",
                "Expected weight to be measured at this timepoint",
                ErrorCode::Invalid,
            ));
        }
        rules.required_if(&[MEASURED, ESTIMATED], "weight_determination", "weight")
    }
}

impl FormValidator for VitalsValidator {
    fn form(&self) -> FormKind {
        FormKind::Vitals
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        let rules = Rules::new(data);

        self.validate_weight(&rules)?;

        let fields: Vec<(String, String)> = BP_READINGS
            .iter()
            .map(|reading| {
                (
                    format!("sys_blood_pressure_{reading}"),
                    format!("dia_blood_pressure_{reading}"),
                )
            })
            .collect();
        for (sys, dia) in &fields {
            rules.raise_on_systolic_lt_diastolic_bp(sys, dia)?;
        }
        let readings: Vec<(&str, &str)> = fields
            .iter()
            .map(|(sys, dia)| (sys.as_str(), dia.as_str()))
            .collect();
        rules.raise_on_avg_blood_pressure_suggests_severe_htn(&readings, "severe_htn")?;

        rules.required_if_true(self.visit.baseline, "height", false)
    }
}
