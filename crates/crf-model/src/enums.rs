//! Type-safe enumerations for patient and group metadata.
//!
//! These are stored as short codes on the forms; parsing is
//! case-insensitive and tolerant of surrounding whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Chronic condition tracked on the patient log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "HIV")]
    Hiv,
    /// Diabetes mellitus.
    #[serde(rename = "DM")]
    Diabetes,
    /// Hypertension.
    #[serde(rename = "HTN")]
    Hypertension,
}

impl Condition {
    pub const ALL: [Condition; 3] = [
        Condition::Hiv,
        Condition::Diabetes,
        Condition::Hypertension,
    ];

    /// Stored code (HIV, DM, HTN).
    pub fn as_code(&self) -> &'static str {
        match self {
            Condition::Hiv => "HIV",
            Condition::Diabetes => "DM",
            Condition::Hypertension => "HTN",
        }
    }

    /// Human-readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Hiv => "HIV",
            Condition::Diabetes => "Diabetes",
            Condition::Hypertension => "Hypertension",
        }
    }

    /// Field-name prefix used by forms with one section per condition
    /// (`hiv_dx`, `dm_test_date`, ...).
    pub fn field_prefix(&self) -> &'static str {
        match self {
            Condition::Hiv => "hiv",
            Condition::Diabetes => "dm",
            Condition::Hypertension => "htn",
        }
    }

    /// Returns true for non-communicable diseases (diabetes, hypertension).
    pub fn is_ncd(&self) -> bool {
        matches!(self, Condition::Diabetes | Condition::Hypertension)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for Condition {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIV" => Ok(Condition::Hiv),
            "DM" | "DIABETES" => Ok(Condition::Diabetes),
            "HTN" | "HYPERTENSION" => Ok(Condition::Hypertension),
            _ => Err(ModelError::UnknownCondition(s.to_string())),
        }
    }
}

/// Recruitment status of a patient group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupStatus {
    #[default]
    New,
    Recruiting,
    /// Recruitment finished; the only status from which a group may be
    /// randomized.
    Complete,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::New => "NEW",
            GroupStatus::Recruiting => "RECRUITING",
            GroupStatus::Complete => "COMPLETE",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, GroupStatus::Complete)
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = ModelError;

    /// Status codes are stored values and match exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(GroupStatus::New),
            "RECRUITING" => Ok(GroupStatus::Recruiting),
            "COMPLETE" => Ok(GroupStatus::Complete),
            _ => Err(ModelError::UnknownGroupStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parses_codes_and_names() {
        assert_eq!("hiv".parse::<Condition>().unwrap(), Condition::Hiv);
        assert_eq!(" DM ".parse::<Condition>().unwrap(), Condition::Diabetes);
        assert_eq!(
            "Hypertension".parse::<Condition>().unwrap(),
            Condition::Hypertension
        );
        assert!("TB".parse::<Condition>().is_err());
    }

    #[test]
    fn only_dm_and_htn_are_ncd() {
        assert!(!Condition::Hiv.is_ncd());
        assert!(Condition::Diabetes.is_ncd());
        assert!(Condition::Hypertension.is_ncd());
    }

    #[test]
    fn group_status_round_trips_through_str() {
        for status in [
            GroupStatus::New,
            GroupStatus::Recruiting,
            GroupStatus::Complete,
        ] {
            assert_eq!(status.as_str().parse::<GroupStatus>().unwrap(), status);
        }
        assert_eq!(
            "DISSOLVED".parse::<GroupStatus>(),
            Err(ModelError::UnknownGroupStatus("DISSOLVED".to_string()))
        );
    }

    #[test]
    fn group_status_is_case_sensitive() {
        assert_eq!(
            "complete".parse::<GroupStatus>(),
            Err(ModelError::UnknownGroupStatus("complete".to_string()))
        );
        assert!(" NEW".parse::<GroupStatus>().is_err());
    }
}
