//! Validator configuration.
//!
//! Thresholds default to the study protocol values and may be overridden
//! from a TOML file and from the environment:
//!
//! ```toml
//! [group]
//! min_group_size = 14
//! min_group_size_for_ratio = 9
//! ratio_min = 2.0
//! ratio_max = 2.7
//!
//! [consent_period]
//! start = "2022-10-01"
//! end = "2025-12-31"
//! ```
//!
//! Environment variables `INTECOMM_MIN_GROUP_SIZE` and
//! `INTECOMM_MIN_GROUP_SIZE_FOR_RATIO` take precedence over the file.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crf_model::constants::RANDOMIZE_CONFIRMATION;

pub const MIN_GROUP_SIZE_ENV_VAR: &str = "INTECOMM_MIN_GROUP_SIZE";
pub const MIN_GROUP_SIZE_FOR_RATIO_ENV_VAR: &str = "INTECOMM_MIN_GROUP_SIZE_FOR_RATIO";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

/// Top-level validator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub group: GroupRules,
    /// Dates within which a subject may be screened and consented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_period: Option<ConsentPeriod>,
}

/// Patient group composition thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupRules {
    /// Smallest group that may be marked complete.
    pub min_group_size: usize,
    /// Groups smaller than this skip the condition ratio check.
    pub min_group_size_for_ratio: usize,
    /// Inclusive lower bound of the NCD:HIV ratio.
    pub ratio_min: f64,
    /// Inclusive upper bound of the NCD:HIV ratio.
    pub ratio_max: f64,
    /// Text the user must type to confirm randomization.
    pub randomize_confirmation: String,
}

impl Default for GroupRules {
    fn default() -> Self {
        Self {
            min_group_size: 14,
            min_group_size_for_ratio: 9,
            ratio_min: 2.0,
            ratio_max: 2.7,
            randomize_confirmation: RANDOMIZE_CONFIRMATION.to_string(),
        }
    }
}

impl GroupRules {
    pub fn ratio_in_range(&self, ratio: f64) -> bool {
        (self.ratio_min..=self.ratio_max).contains(&ratio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ConsentPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl ValidatorConfig {
    /// Load from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)?.with_env_overrides()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    /// Apply `INTECOMM_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(MIN_GROUP_SIZE_ENV_VAR) {
            self.group.min_group_size = parse_count(MIN_GROUP_SIZE_ENV_VAR, &value)?;
        }
        if let Some(value) = lookup(MIN_GROUP_SIZE_FOR_RATIO_ENV_VAR) {
            self.group.min_group_size_for_ratio =
                parse_count(MIN_GROUP_SIZE_FOR_RATIO_ENV_VAR, &value)?;
        }
        self.check()?;
        Ok(self)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let group = &self.group;
        if group.min_group_size == 0 {
            return Err(ConfigError::Invalid {
                message: "group.min_group_size must be at least 1".to_string(),
            });
        }
        if !(group.ratio_min.is_finite() && group.ratio_max.is_finite())
            || group.ratio_min > group.ratio_max
        {
            return Err(ConfigError::Invalid {
                message: format!(
                    "group ratio range {}..={} is empty",
                    group.ratio_min, group.ratio_max
                ),
            });
        }
        if group.randomize_confirmation.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "group.randomize_confirmation must not be blank".to_string(),
            });
        }
        if let Some(period) = &self.consent_period
            && period.start > period.end
        {
            return Err(ConfigError::Invalid {
                message: format!(
                    "consent period starts ({}) after it ends ({})",
                    period.start, period.end
                ),
            });
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol() {
        let config = ValidatorConfig::default();
        assert_eq!(config.group.min_group_size, 14);
        assert_eq!(config.group.min_group_size_for_ratio, 9);
        assert!(config.group.ratio_in_range(2.0));
        assert!(config.group.ratio_in_range(2.7));
        assert!(!config.group.ratio_in_range(2.71));
        assert_eq!(config.group.randomize_confirmation, "RANDOMIZE");
        assert!(config.consent_period.is_none());
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = ValidatorConfig::from_toml_str(
            r#"
            [group]
            min_group_size = 10

            [consent_period]
            start = "2022-10-01"
            end = "2025-12-31"
            "#,
        )
        .unwrap();
        assert_eq!(config.group.min_group_size, 10);
        assert_eq!(config.group.min_group_size_for_ratio, 9);
        let period = config.consent_period.unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn inverted_ratio_range_is_rejected() {
        let result = ValidatorConfig::from_toml_str("[group]\nratio_min = 3.0\nratio_max = 2.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let config = ValidatorConfig::default()
            .with_overrides(|key| match key {
                MIN_GROUP_SIZE_ENV_VAR => Some("12".to_string()),
                MIN_GROUP_SIZE_FOR_RATIO_ENV_VAR => Some(" 6 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.group.min_group_size, 12);
        assert_eq!(config.group.min_group_size_for_ratio, 6);
    }

    #[test]
    fn non_numeric_env_override_is_an_error() {
        let result = ValidatorConfig::default().with_overrides(|key| {
            (key == MIN_GROUP_SIZE_ENV_VAR).then(|| "fourteen".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == MIN_GROUP_SIZE_ENV_VAR
        ));
    }
}
