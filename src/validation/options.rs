//! Validator configuration.

use serde::{Deserialize, Serialize};

/// Default cap on resource depth below the starting address.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How descriptions are acquired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// One recursive read, children embedded in the result.
    #[default]
    Eager,
    /// One set of reads per resource, level by level.
    Lazy,
}

/// What to do with a declared child that has no embedded description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingChildPolicy {
    /// Log a warning and skip the branch.
    #[default]
    Skip,
    /// Record a failure.
    Fail,
}

/// Options for [`DescriptionValidator`](crate::validation::DescriptionValidator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Eager or lazy acquisition.
    pub mode: TraversalMode,
    /// Handling of undescribed children in eager mode.
    pub missing_child: MissingChildPolicy,
    /// Deepest resource, relative to the start, that is still validated.
    pub max_depth: usize,
    /// Ask for inherited attributes and operations.
    pub inherited: bool,
    /// Warn when an operation's `operation-name` differs from its key.
    pub check_operation_names: bool,
}

impl ValidatorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            mode: TraversalMode::Eager,
            missing_child: MissingChildPolicy::Skip,
            max_depth: DEFAULT_MAX_DEPTH,
            inherited: false,
            check_operation_names: true,
        }
    }

    /// Set the traversal mode.
    pub fn with_mode(mut self, mode: TraversalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the missing-child policy.
    pub fn with_missing_child(mut self, policy: MissingChildPolicy) -> Self {
        self.missing_child = policy;
        self
    }

    /// Set the depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the `inherited` read flag.
    pub fn with_inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
