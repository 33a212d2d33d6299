//! CLI library components for the CRF checker.

pub mod logging;
pub mod outcome;
