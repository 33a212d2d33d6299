//! Stored response values shared by all case report forms.
//!
//! Choice fields store these exact strings, so validators compare against
//! them rather than against display labels.

pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const NOT_APPLICABLE: &str = "N/A";
pub const NOT_REQUIRED: &str = "not_required";
pub const OTHER: &str = "OTHER";
pub const NONE: &str = "NONE";
pub const DONT_KNOW: &str = "D";
pub const PENDING: &str = "PENDING";

pub const MALE: &str = "M";
pub const FEMALE: &str = "F";

pub const MEASURED: &str = "measured";
pub const ESTIMATED: &str = "estimated";

// Diagnosis management
pub const DRUGS: &str = "drugs";
pub const INSULIN: &str = "insulin";

/// Literal the user must type to confirm an irreversible randomization.
pub const RANDOMIZE_CONFIRMATION: &str = "RANDOMIZE";

/// Catch-all error key for errors not tied to a single field.
pub const ALL_FIELDS: &str = "__all__";
