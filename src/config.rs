//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::scan::DEFAULT_WORKER_LIMIT;

/// Tool configuration derived from environment variables, configuration
/// files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "NETREAP")]
pub struct NetreapConfig {
    /// Path to the `aws` CLI binary.
    #[ortho_config(default = "aws".to_owned())]
    pub aws_bin: String,
    /// Optional AWS CLI profile passed to every invocation.
    pub profile: Option<String>,
    /// Slack incoming-webhook URL for operator notifications. When absent,
    /// reports and outcomes are written to the console instead.
    pub webhook_url: Option<String>,
    /// Cap on simultaneously in-flight region probes. Defaults to the
    /// scanner's built-in budget.
    pub worker_limit: Option<usize>,
}

impl NetreapConfig {
    /// Loads configuration without attempting to parse CLI arguments.
    /// Values merge defaults, configuration files, and environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("netreap")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Worker budget for the scan phase.
    #[must_use]
    pub fn effective_worker_limit(&self) -> usize {
        self.worker_limit.unwrap_or(DEFAULT_WORKER_LIMIT)
    }

    /// Performs semantic validation on the loaded values. Error messages
    /// include guidance on how to supply missing values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aws_bin.trim().is_empty() {
            return Err(ConfigError::MissingField(String::from(
                "missing aws CLI path: set NETREAP_AWS_BIN or add aws_bin to netreap.toml",
            )));
        }
        if let Some(url) = &self.webhook_url {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingField(String::from(
                    "webhook_url must not be blank: set NETREAP_WEBHOOK_URL or remove it",
                )));
            }
        }
        Ok(())
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Raised when configuration sources cannot be merged.
    #[error("configuration error: {0}")]
    Parse(String),
    /// Raised when a required value is missing or blank.
    #[error("{0}")]
    MissingField(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_config() -> NetreapConfig {
        NetreapConfig {
            aws_bin: String::from("aws"),
            profile: None,
            webhook_url: Some(String::from("https://hooks.example.com/services/T0/B0/x")),
            worker_limit: None,
        }
    }

    #[rstest]
    fn validate_accepts_complete_config(valid_config: NetreapConfig) {
        assert!(valid_config.validate().is_ok());
    }

    #[rstest]
    fn validate_rejects_blank_aws_bin(mut valid_config: NetreapConfig) {
        valid_config.aws_bin = String::from("  ");
        let err = valid_config.validate().expect_err("blank aws_bin");
        assert!(
            matches!(err, ConfigError::MissingField(ref msg) if msg.contains("NETREAP_AWS_BIN"))
        );
    }

    #[rstest]
    fn validate_rejects_blank_webhook(mut valid_config: NetreapConfig) {
        valid_config.webhook_url = Some(String::new());
        let err = valid_config.validate().expect_err("blank webhook");
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[rstest]
    fn worker_limit_falls_back_to_scanner_default(valid_config: NetreapConfig) {
        assert_eq!(valid_config.effective_worker_limit(), DEFAULT_WORKER_LIMIT);
        let bounded = NetreapConfig {
            worker_limit: Some(3),
            ..valid_config
        };
        assert_eq!(bounded.effective_worker_limit(), 3);
    }
}
