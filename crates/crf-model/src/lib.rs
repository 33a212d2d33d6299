//! Data model for case report form (CRF) validation.
//!
//! - [`CleanedData`] / [`FieldValue`]: submitted field values
//! - [`PatientRecord`] / [`PatientGroup`]: patient log entries and groups
//! - [`VisitContext`] and friends: summaries of related records
//! - [`constants`]: stored response values

pub mod constants;
pub mod enums;
pub mod error;
pub mod patient;
pub mod related;
pub mod value;

pub use enums::{Condition, GroupStatus};
pub use error::{ModelError, Result};
pub use patient::{PatientGroup, PatientRecord};
pub use related::{
    HealthEconomicsContext, HouseholdHeadSummary, PatientLog, SubjectScreening, VisitContext,
};
pub use value::{CleanedData, FieldValue};
