//! Blood pressure reading rules.

use crf_model::constants::YES;

use super::Rules;
use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Average systolic at or above this suggests severe hypertension.
pub const SEVERE_HTN_SYSTOLIC: f64 = 180.0;
/// Average diastolic at or above this suggests severe hypertension.
pub const SEVERE_HTN_DIASTOLIC: f64 = 110.0;

impl Rules<'_> {
    pub fn raise_on_systolic_lt_diastolic_bp(
        &self,
        sys_field: &str,
        dia_field: &str,
    ) -> ValidationResult {
        let data = self.data();
        if let (Some(sys), Some(dia)) = (data.number(sys_field), data.number(dia_field))
            && sys < dia
        {
            return Err(ValidationError::field(
                dia_field,
                "Invalid. Diastolic must be less than systolic.",
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    /// Average the `(systolic, diastolic)` reading pairs that were taken and
    /// check `severe_htn_field` agrees with the result.
    pub fn raise_on_avg_blood_pressure_suggests_severe_htn(
        &self,
        readings: &[(&str, &str)],
        severe_htn_field: &str,
    ) -> ValidationResult {
        let sys = self.average(readings.iter().map(|(sys, _)| *sys));
        let dia = self.average(readings.iter().map(|(_, dia)| *dia));
        if sys.is_none() && dia.is_none() {
            return Ok(());
        }
        let severe = sys.is_some_and(|avg| avg >= SEVERE_HTN_SYSTOLIC)
            || dia.is_some_and(|avg| avg >= SEVERE_HTN_DIASTOLIC);
        let answered_yes = self.data().equals(severe_htn_field, YES);
        if severe && !answered_yes {
            return Err(ValidationError::field(
                severe_htn_field,
                "Invalid. Patient has severe hypertension",
                ErrorCode::Invalid,
            ));
        }
        if !severe && answered_yes {
            return Err(ValidationError::field(
                severe_htn_field,
                "Invalid. Patient does not have severe hypertension",
                ErrorCode::Invalid,
            ));
        }
        Ok(())
    }

    fn average<'f>(&self, fields: impl Iterator<Item = &'f str>) -> Option<f64> {
        let values: Vec<f64> = fields.filter_map(|field| self.data().number(field)).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crf_model::CleanedData;
    use crf_model::constants::NO;

    const READINGS: [(&str, &str); 2] = [
        ("sys_blood_pressure_one", "dia_blood_pressure_one"),
        ("sys_blood_pressure_two", "dia_blood_pressure_two"),
    ];

    fn readings(sys: (i64, i64), dia: (i64, i64), severe_htn: &str) -> CleanedData {
        CleanedData::new()
            .with("sys_blood_pressure_one", sys.0)
            .with("sys_blood_pressure_two", sys.1)
            .with("dia_blood_pressure_one", dia.0)
            .with("dia_blood_pressure_two", dia.1)
            .with("severe_htn", severe_htn)
    }

    #[test]
    fn equal_readings_are_allowed() {
        let data = CleanedData::new()
            .with("sys_blood_pressure_one", 100)
            .with("dia_blood_pressure_one", 100);
        assert!(
            Rules::new(&data)
                .raise_on_systolic_lt_diastolic_bp(
                    "sys_blood_pressure_one",
                    "dia_blood_pressure_one"
                )
                .is_ok()
        );
    }

    #[test]
    fn average_at_threshold_is_severe() {
        let data = readings((179, 181), (80, 79), NO);
        let err = Rules::new(&data)
            .raise_on_avg_blood_pressure_suggests_severe_htn(&READINGS, "severe_htn")
            .unwrap_err();
        assert_eq!(err.message, "Invalid. Patient has severe hypertension");

        let data = readings((150, 150), (109, 111), YES);
        assert!(
            Rules::new(&data)
                .raise_on_avg_blood_pressure_suggests_severe_htn(&READINGS, "severe_htn")
                .is_ok()
        );
    }

    #[test]
    fn yes_without_severe_readings_is_invalid() {
        let data = readings((120, 119), (80, 79), YES);
        let err = Rules::new(&data)
            .raise_on_avg_blood_pressure_suggests_severe_htn(&READINGS, "severe_htn")
            .unwrap_err();
        assert_eq!(err.message, "Invalid. Patient does not have severe hypertension");
    }

    #[test]
    fn no_readings_skips_the_check() {
        let data = CleanedData::new().with("severe_htn", YES);
        assert!(
            Rules::new(&data)
                .raise_on_avg_blood_pressure_suggests_severe_htn(&READINGS, "severe_htn")
                .is_ok()
        );
    }
}
