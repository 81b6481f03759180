//! Run configuration for test selection.
//!
//! Read from environment variables so CI jobs can pin the random target
//! selection and decide how broken guard markers are reported.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_RANDOM_SEED: &str = "ENV_TESTS_RANDOM_SEED";
pub const ENV_GUARD_ERRORS: &str = "ENV_TESTS_GUARD_ERRORS";
pub const ENV_LOG_FILTER: &str = "ENV_TESTS_LOG_FILTER";
pub const ENV_LOG_FORMAT: &str = "ENV_TESTS_LOG_FORMAT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid ENV_TESTS_RANDOM_SEED value '{0}': expected an unsigned integer")]
    InvalidSeed(String),

    #[error("Invalid ENV_TESTS_GUARD_ERRORS value '{0}': expected 'fail' or 'skip'")]
    InvalidPolicy(String),

    #[error("Invalid ENV_TESTS_LOG_FORMAT value '{0}': expected 'text' or 'json'")]
    InvalidLogFormat(String),
}

/// How a guard that cannot be evaluated affects its test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardErrorPolicy {
    /// Surface the error; the test fails.
    #[default]
    Fail,
    /// Skip the test with the error as the reason.
    Skip,
}

impl FromStr for GuardErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(GuardErrorPolicy::Fail),
            "skip" => Ok(GuardErrorPolicy::Skip),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

/// Output format of test tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, for CI log collectors.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Seed for random target selection; entropy when unset.
    pub random_seed: Option<u64>,
    pub guard_errors: GuardErrorPolicy,
    /// Tracing filter override for test binaries.
    pub log_filter: Option<String>,
    pub log_format: LogFormat,
}

impl SelectionConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let random_seed = vars
            .get(ENV_RANDOM_SEED)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed(raw.clone()))
            })
            .transpose()?;

        let guard_errors = vars
            .get(ENV_GUARD_ERRORS)
            .map(|raw| raw.parse::<GuardErrorPolicy>())
            .transpose()?
            .unwrap_or_default();

        let log_filter = vars
            .get(ENV_LOG_FILTER)
            .filter(|filter| !filter.trim().is_empty())
            .cloned();

        let log_format = vars
            .get(ENV_LOG_FORMAT)
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(SelectionConfig {
            random_seed,
            guard_errors,
            log_filter,
            log_format,
        })
    }

    /// Random source for target selection.
    ///
    /// Seeded from `random_seed` when configured so a failing run can be
    /// replayed with the same targets.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.random_seed {
            Some(seed) => {
                tracing::info!(target: "env_tests.config", seed, "Using seeded target selection");
                StdRng::seed_from_u64(seed)
            }
            None => {
                tracing::debug!(target: "env_tests.config", "Using entropy-seeded target selection");
                StdRng::from_entropy()
            }
        }
    }
}
