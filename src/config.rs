//! Environment-driven pipeline configuration.

use std::path::PathBuf;

use crate::constants::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_INPUT_FILE, ENV_BATCH_SIZE, ENV_INPUT_FILE, ENV_MAX_RECORDS,
    ENV_SKIP_INVALID,
};
use crate::errors::EtlError;
use crate::validate::BatchOptions;

/// Pipeline settings resolved from the process environment.
#[derive(Clone, Debug, PartialEq)]
pub struct EtlConfig {
    /// Path of the raw property-records file.
    pub input_file: PathBuf,
    /// Record cap; zero means unlimited.
    pub max_records: usize,
    /// Continue past rejected records, accumulating failures.
    pub skip_invalid: bool,
    /// Row-chunk size handed to storage sinks.
    pub batch_size: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            max_records: 0,
            skip_invalid: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl EtlConfig {
    /// Resolve settings from process environment variables.
    pub fn from_env() -> Result<Self, EtlError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup (tests inject maps
    /// here instead of mutating the process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EtlError> {
        let defaults = Self::default();
        let input_file = lookup(ENV_INPUT_FILE)
            .map(PathBuf::from)
            .unwrap_or(defaults.input_file);
        let max_records = parse_count(ENV_MAX_RECORDS, lookup(ENV_MAX_RECORDS), defaults.max_records)?;
        let batch_size = parse_count(ENV_BATCH_SIZE, lookup(ENV_BATCH_SIZE), defaults.batch_size)?;
        let skip_invalid = lookup(ENV_SKIP_INVALID)
            .map(|raw| raw.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.skip_invalid);
        Ok(Self {
            input_file,
            max_records,
            skip_invalid,
            batch_size,
        })
    }

    /// Batch-validation controls derived from these settings.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            max_records: (self.max_records > 0).then_some(self.max_records),
            stop_on_first_failure: !self.skip_invalid,
        }
    }
}

fn parse_count(key: &str, raw: Option<String>, default: usize) -> Result<usize, EtlError> {
    match raw {
        Some(text) => text.trim().parse().map_err(|_| {
            EtlError::Configuration(format!("{key} must be a non-negative integer, got '{text}'"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = EtlConfig::from_lookup(|_| None).expect("config");
        assert_eq!(config, EtlConfig::default());
        assert!(config.skip_invalid);
        assert_eq!(config.max_records, 0);
    }

    #[test]
    fn environment_overrides_are_parsed() {
        let config = EtlConfig::from_lookup(lookup_from(&[
            (ENV_INPUT_FILE, "/tmp/records.json"),
            (ENV_MAX_RECORDS, "25"),
            (ENV_SKIP_INVALID, "FALSE"),
            (ENV_BATCH_SIZE, "500"),
        ]))
        .expect("config");
        assert_eq!(config.input_file, PathBuf::from("/tmp/records.json"));
        assert_eq!(config.max_records, 25);
        assert!(!config.skip_invalid);
        assert_eq!(config.batch_size, 500);
    }

    #[test]
    fn malformed_counts_are_configuration_errors() {
        let error = EtlConfig::from_lookup(lookup_from(&[(ENV_MAX_RECORDS, "lots")]))
            .expect_err("must fail");
        assert!(matches!(error, EtlError::Configuration(_)));
    }

    #[test]
    fn batch_options_translate_the_zero_cap() {
        let mut config = EtlConfig::default();
        assert_eq!(config.batch_options().max_records, None);
        config.max_records = 10;
        config.skip_invalid = false;
        let options = config.batch_options();
        assert_eq!(options.max_records, Some(10));
        assert!(options.stop_on_first_failure);
    }
}
