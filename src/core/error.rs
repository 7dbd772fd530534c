//! Error and report types.
//!
//! Two kinds of problem come out of a run and they are kept apart:
//! - fatal errors ([`ClientError`] and friends) abort the run and are returned
//!   as `Err`;
//! - schema findings ([`ValidationFailure`]) are collected into a
//!   [`ValidationReport`] and never stop the walk.

use crate::core::address::Address;
use crate::core::types::ModelType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum TypeValidatorError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by a [`ModelClient`](crate::client::ModelClient).
///
/// Every variant is fatal for the run that hit it, except `NotFound` for a
/// child below the start address: the lazy walk treats that as a child
/// without a description.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot reach management endpoint {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Management endpoint {url} answered HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("Operation '{operation}' failed at {address}: {description}")]
    OperationFailed {
        operation: String,
        address: Address,
        description: String,
    },

    #[error("Malformed response to '{operation}' at {address}: {reason}")]
    Protocol {
        operation: String,
        address: Address,
        reason: String,
    },

    #[error("No resource at {address} in {source_name}")]
    NotFound { address: Address, source_name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors parsing an address in CLI syntax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address segment '{0}' is not of the form type=name")]
    MissingSeparator(String),

    #[error("Address segment '{0}' has an empty type or name")]
    EmptyPart(String),
}

/// Errors loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {error}")]
    Read { path: String, error: std::io::Error },

    #[error("Invalid config file {path}: {error}")]
    Parse { path: String, error: toml::de::Error },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for crate operations.
pub type TypeValidatorResult<T> = Result<T, TypeValidatorError>;

// ============================================================================
// Validation findings
// ============================================================================

/// What is wrong with a descriptor or resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// `type` is absent.
    MissingType,
    /// `type` does not resolve to a known tag.
    UnknownType,
    /// Container type without `value-type`.
    MissingValueType(ModelType),
    /// Non-container type with a `value-type`.
    UnexpectedValueType(ModelType),
    /// `value-type` is neither a tag nor a member mapping.
    InvalidValueType(ModelType),
    /// A declared child has no embedded description.
    MissingChildDescription,
    /// The walk reached the configured depth cap.
    DepthLimitExceeded,
}

impl FailureKind {
    fn message(&self, context: &str) -> String {
        match self {
            FailureKind::MissingType => format!("no type for {}", context),
            FailureKind::UnknownType => format!("can't create type for {}", context),
            FailureKind::MissingValueType(t) => format!("no value-type for {} {}", t, context),
            FailureKind::UnexpectedValueType(t) => {
                format!("value-type given for non-container {} {}", t, context)
            }
            FailureKind::InvalidValueType(t) => {
                format!("can't create value-type for {} {}", t, context)
            }
            FailureKind::MissingChildDescription => {
                format!("no model-description for {}", context)
            }
            FailureKind::DepthLimitExceeded => format!("depth limit exceeded for {}", context),
        }
    }
}

/// One schema finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// What is wrong.
    pub kind: FailureKind,
    /// Where in the resource, e.g. `attribute timeout`.
    pub location: String,
    /// Member names inside complex value-types, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member_path: Vec<String>,
    /// Resource the descriptor belongs to.
    pub address: Address,
    /// The offending fragment.
    pub detail: Value,
}

impl ValidationFailure {
    /// Human-readable context: location plus member path.
    pub fn context(&self) -> String {
        if self.member_path.is_empty() {
            format!("'{}'", self.location)
        } else {
            format!("'{}' member '{}'", self.location, self.member_path.join("."))
        }
    }

    /// The failure message without address or detail.
    pub fn message(&self) -> String {
        self.kind.message(&self.context())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} {}", self.message(), self.address, self.detail)
    }
}

/// Non-fatal finding that does not count as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Warning message.
    pub message: String,
    /// Resource that triggered the warning.
    pub address: Address,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.address)
    }
}

/// Counts of what a run looked at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Resources whose description was validated.
    pub resources: usize,
    /// Attribute descriptors checked.
    pub attributes: usize,
    /// Operation parameter descriptors checked.
    pub parameters: usize,
}

// ============================================================================
// Validation Report
// ============================================================================

/// Outcome of one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether validation found no failures.
    pub success: bool,
    /// Failures in walk order.
    pub failures: Vec<ValidationFailure>,
    /// Warnings in walk order.
    pub warnings: Vec<ValidationWarning>,
    /// What was visited.
    pub stats: ValidationStats,
    /// Time taken for validation in milliseconds.
    pub duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report (success).
    pub fn new() -> Self {
        Self {
            success: true,
            failures: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
            duration_ms: 0,
        }
    }

    /// Add a failure to the report.
    pub fn add_failure(&mut self, failure: ValidationFailure) {
        self.success = false;
        self.failures.push(failure);
    }

    /// Add a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        let visited = format!(
            "{} resource(s), {} attribute(s), {} parameter(s)",
            self.stats.resources, self.stats.attributes, self.stats.parameters
        );
        if self.success {
            if self.warnings.is_empty() {
                format!("OK: checked {}", visited)
            } else {
                format!(
                    "OK with {} warning(s): checked {}",
                    self.warnings.len(),
                    visited
                )
            }
        } else {
            format!(
                "{} failure(s) in {}",
                self.failures.len(),
                visited
            )
        }
    }

    /// One line per failure, numbered.
    pub fn detailed_failures(&self) -> Vec<String> {
        self.failures
            .iter()
            .enumerate()
            .map(|(i, failure)| format!("{}. {}", i + 1, failure))
            .collect()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure(kind: FailureKind) -> ValidationFailure {
        ValidationFailure {
            kind,
            location: "attribute timeout".to_string(),
            member_path: Vec::new(),
            address: Address::from_pairs([("subsystem", "messaging")]),
            detail: json!({"type": "LIST"}),
        }
    }

    #[test]
    fn test_failure_messages() {
        let f = failure(FailureKind::MissingValueType(ModelType::List));
        let text = f.to_string();
        assert!(text.starts_with("no value-type for LIST 'attribute timeout'"));
        assert!(text.contains("/subsystem=messaging"));

        let f = failure(FailureKind::UnexpectedValueType(ModelType::Long));
        assert!(f.to_string().contains("value-type given"));
        assert!(failure(FailureKind::MissingType).message().starts_with("no type for"));
        assert!(failure(FailureKind::UnknownType)
            .message()
            .starts_with("can't create type for"));
    }

    #[test]
    fn test_member_path_in_context() {
        let mut f = failure(FailureKind::MissingType);
        f.member_path = vec!["server".to_string(), "port".to_string()];
        assert_eq!(f.context(), "'attribute timeout' member 'server.port'");
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();
        assert!(report.success);
        assert!(report.summary().starts_with("OK"));

        report.add_failure(failure(FailureKind::MissingType));
        assert!(!report.success);
        assert_eq!(report.failures.len(), 1);
        assert!(report.detailed_failures()[0].starts_with("1. no type"));
    }

    #[test]
    fn test_report_serializes() {
        let mut report = ValidationReport::new();
        report.add_failure(failure(FailureKind::MissingValueType(ModelType::Object)));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["kind"], json!({"missing-value-type": "OBJECT"}));
        assert_eq!(json["failures"][0]["address"], json!([{"subsystem": "messaging"}]));
    }
}
