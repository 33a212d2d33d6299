//! Form validators for clinical-trial case report forms (CRFs).
//!
//! - [`group`]: patient group composition (size, eligibility, NCD:HIV ratio)
//! - [`rules`]: reusable cross-field rule primitives
//! - [`forms`]: one validator per CRF
//! - [`submission`]: dispatch a submitted form to its validator

pub mod config;
pub mod error;
pub mod forms;
pub mod group;
pub mod rules;
pub mod submission;

pub use config::{ConfigError, ConsentPeriod, GroupRules, ValidatorConfig};
pub use error::{ErrorCode, ErrorKey, SubmissionError, ValidationError, ValidationResult};
pub use forms::{FormKind, FormValidator, validate_form};
pub use group::{GroupError, RatioSummary};
pub use submission::FormSubmission;
