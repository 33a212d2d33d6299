//! Patient log form.

use crf_model::{CleanedData, SubjectScreening};

use super::{FormKind, FormValidator};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, Default)]
pub struct PatientLogValidator<'a> {
    subject_screening: Option<&'a SubjectScreening>,
}

impl<'a> PatientLogValidator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once screened, identity fields must agree with the screening form.
    #[must_use]
    pub fn with_subject_screening(mut self, subject_screening: &'a SubjectScreening) -> Self {
        self.subject_screening = Some(subject_screening);
        self
    }
}

impl FormValidator for PatientLogValidator<'_> {
    fn form(&self) -> FormKind {
        FormKind::PatientLog
    }

    fn clean(&self, data: &CleanedData) -> ValidationResult {
        let rules = Rules::new(data);
        rules.date_not_in_future("last_appt_date", ErrorCode::InvalidAppointmentDate)?;
        rules.date_not_in_past("next_appt_date", ErrorCode::InvalidAppointmentDate)?;
        if let Some(screening) = self.subject_screening {
            match_screening(data, screening)?;
        }
        Ok(())
    }
}

/// Identity fields on the log must agree with the screening form.
fn match_screening(data: &CleanedData, screening: &SubjectScreening) -> ValidationResult {
    let identity = [
        ("gender", "Gender", screening.gender.as_deref()),
        ("initials", "Initials", screening.initials.as_deref()),
        (
            "hospital_identifier",
            "Hospital Identifier",
            screening.hospital_identifier.as_deref(),
        ),
        ("site", "Site", screening.site.as_deref()),
    ];
    for (field, label, screened) in identity {
        let (Some(value), Some(screened)) = (data.get(field), screened) else {
            continue;
        };
        if value.is_blank() {
            continue;
        }
        if value.to_string() != screened {
            return Err(ValidationError::all(
                format!("Invalid. {label} does not match the Subject Screening form."),
                ErrorCode::Invalid,
            ));
        }
    }
    Ok(())
}
