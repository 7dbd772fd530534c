//! Configuration file.
//!
//! ```toml
//! [controller]
//! url = "http://localhost:9990/management"
//! username = "admin"
//! password = "secret"
//! timeout_secs = 30
//!
//! [validation]
//! mode = "lazy"
//! missing_child = "fail"
//! max_depth = 32
//! ```
//!
//! Every field is optional.

use crate::client::http::{HttpModelClient, DEFAULT_TIMEOUT, DEFAULT_URL};
use crate::core::error::ConfigError;
use crate::validation::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Settings for the management endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Management endpoint URL.
    pub url: String,
    /// Basic auth user.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ControllerConfig {
    /// Build an HTTP client from these settings.
    pub fn http_client(&self) -> HttpModelClient {
        let mut builder = HttpModelClient::builder()
            .url(self.url.clone())
            .timeout(Duration::from_secs(self.timeout_secs));
        if let (Some(user), Some(password)) = (&self.username, &self.password) {
            builder = builder.credentials(user.clone(), password.clone());
        }
        builder.build()
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[controller]` section.
    pub controller: ControllerConfig,
    /// `[validation]` section.
    pub validation: ValidatorConfig,
}

impl AppConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str, path: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|error| ConfigError::Parse {
            path: path.to_string(),
            error,
        })?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            error,
        })?;
        Self::from_toml(&text, &path.display().to_string())
    }

    /// Reject combinations that cannot work.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.controller.timeout_secs == 0 {
            return Err(ConfigError::Invalid("controller.timeout_secs must be > 0".to_string()));
        }
        if self.controller.username.is_some() != self.controller.password.is_some() {
            return Err(ConfigError::Invalid(
                "controller.username and controller.password must be given together".to_string(),
            ));
        }
        if self.validation.max_depth == 0 {
            return Err(ConfigError::Invalid("validation.max_depth must be > 0".to_string()));
        }
        Ok(())
    }
}
