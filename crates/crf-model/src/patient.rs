//! Patient log records and patient groups.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{Condition, GroupStatus};

/// A patient log entry as seen by the group validators.
///
/// Read-only view of the external store; validators never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Known to be stable and in care.
    #[serde(default)]
    pub stable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_identifier: Option<String>,
    #[serde(default)]
    pub conditions: BTreeSet<Condition>,
    /// Names of every patient group this record belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Set once the patient is part of a randomized group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
}

impl PatientRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.insert(condition);
        self
    }

    #[must_use]
    pub fn with_stable(mut self, stable: bool) -> Self {
        self.stable = stable;
        self
    }

    #[must_use]
    pub fn screened(mut self, screening_identifier: impl Into<String>) -> Self {
        self.screening_identifier = Some(screening_identifier.into());
        self
    }

    #[must_use]
    pub fn consented(mut self, subject_identifier: impl Into<String>) -> Self {
        self.subject_identifier = Some(subject_identifier.into());
        self
    }

    #[must_use]
    pub fn in_group(mut self, group_name: impl Into<String>) -> Self {
        self.groups.push(group_name.into());
        self
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Has diabetes and/or hypertension.
    pub fn has_ncd(&self) -> bool {
        self.conditions.iter().any(Condition::is_ncd)
    }

    pub fn has_hiv(&self) -> bool {
        self.has_condition(Condition::Hiv)
    }

    pub fn is_screened(&self) -> bool {
        non_blank(self.screening_identifier.as_deref())
    }

    pub fn is_consented(&self) -> bool {
        non_blank(self.subject_identifier.as_deref())
    }

    /// Plain-text pointer to this record for error messages.
    pub fn reference(&self) -> String {
        match &self.id {
            Some(id) => format!("See patient {} (id {id})", self.name),
            None => format!("See patient {}", self.name),
        }
    }
}

impl fmt::Display for PatientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// A named, ordered group of patients recruited together.
///
/// Once `randomized` is set the group and its membership are immutable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientGroup {
    /// Absent until the group has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub status: GroupStatus,
    #[serde(default)]
    pub randomized: bool,
    #[serde(default)]
    pub patients: Vec<PatientRecord>,
}

impl PatientGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: GroupStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_randomized(mut self, randomized: bool) -> Self {
        self.randomized = randomized;
        self
    }

    #[must_use]
    pub fn with_patients(mut self, patients: Vec<PatientRecord>) -> Self {
        self.patients = patients;
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ncd_and_hiv_flags_follow_conditions() {
        let comorbid = PatientRecord::new("A")
            .with_condition(Condition::Hiv)
            .with_condition(Condition::Hypertension);
        assert!(comorbid.has_ncd());
        assert!(comorbid.has_hiv());

        let dm_only = PatientRecord::new("B").with_condition(Condition::Diabetes);
        assert!(dm_only.has_ncd());
        assert!(!dm_only.has_hiv());
    }

    #[test]
    fn blank_identifiers_do_not_count() {
        let patient = PatientRecord::new("A").screened(" ").consented("");
        assert!(!patient.is_screened());
        assert!(!patient.is_consented());
    }

    #[test]
    fn reference_includes_id_when_known() {
        assert_eq!(PatientRecord::new("NAME-1").reference(), "See patient NAME-1");
        assert_eq!(
            PatientRecord::new("NAME-1").with_id("42").reference(),
            "See patient NAME-1 (id 42)"
        );
    }
}
