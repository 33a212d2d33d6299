//! Health economics forms: household head and household assets.

use crf_model::constants::{DONT_KNOW, NO, NONE, OTHER};
use crf_model::{CleanedData, HealthEconomicsContext, VisitContext};

use super::{FormKind, FormValidator, require_clinical_review};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

const HOUSEHOLD_HEAD_OTHER_FIELDS: [&str; 6] = [
    "relationship_to_hoh",
    "hoh_religion",
    "hoh_ethnicity",
    "hoh_education",
    "hoh_employment_type",
    "hoh_marital_status",
];

const ASSETS_OTHER_FIELDS: [&str; 8] = [
    "water_source",
    "toilet",
    "roof_material",
    "external_wall_material",
    "external_window_material",
    "floor_material",
    "light_source",
    "cooking_fuel",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct HouseholdHeadValidator {
    visit: VisitContext,
}

impl HouseholdHeadValidator {
    pub fn new(visit: VisitContext) -> Self {
        Self { visit }
    }
}

impl FormValidator for HouseholdHeadValidator {
    fn form(&self) -> FormKind {
        FormKind::HealthEconomicsHouseholdHead
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        let rules = Rules::new(data);

        rules.applicable_if(&[NO], "hoh", "relationship_to_hoh")?;
        for field in HOUSEHOLD_HEAD_OTHER_FIELDS {
            rules.validate_other_specify(field, None)?;
        }
        rules.m2m_single_selection_if(&[DONT_KNOW, NONE], "hoh_insurance")?;
        rules.m2m_other_specify(OTHER, "hoh_insurance", "hoh_insurance_other")?;
        rules.number_not_greater(
            "hh_minors_count",
            "hh_count",
            "Invalid. Cannot exceed the number of people in the household.",
        )
    }
}

/// Assets are recorded after the household head and, when the participant
/// is not the head, the patient health economics CRF.
#[derive(Debug, Clone, Copy)]
pub struct HouseholdAssetsValidator<'a> {
    visit: VisitContext,
    health_economics: &'a HealthEconomicsContext,
}

impl<'a> HouseholdAssetsValidator<'a> {
    pub fn new(visit: VisitContext, health_economics: &'a HealthEconomicsContext) -> Self {
        Self {
            visit,
            health_economics,
        }
    }

    fn prerequisite_crfs_exist(&self) -> ValidationResult {
        let Some(household_head) = &self.health_economics.household_head else {
            return Err(ValidationError::all(
                "Complete the `Health Economics: Household Head` CRF first.",
                ErrorCode::CrfMissing,
            ));
        };
        if household_head.hoh == NO && !self.health_economics.patient_crf_exists {
            return Err(ValidationError::all(
                "Complete the `Health Economics: Patient` CRF first.",
                ErrorCode::CrfMissing,
            ));
        }
        Ok(())
    }
}

impl FormValidator for HouseholdAssetsValidator<'_> {
    fn form(&self) -> FormKind {
        FormKind::HealthEconomicsAssets
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        require_clinical_review(&self.visit)?;
        self.prerequisite_crfs_exist()?;
        let rules = Rules::new(data);
        for field in ASSETS_OTHER_FIELDS {
            rules.validate_other_specify(field, None)?;
        }
        Ok(())
    }
}
