//! # model-type-validator
//!
//! Checks the type descriptors of a management model. Every attribute and
//! operation parameter of every resource is checked against one rule:
//! OBJECT and LIST types must declare a `value-type`, and no other type may.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use model_type_validator::prelude::*;
//!
//! let client = HttpModelClient::builder()
//!     .url("http://localhost:9990/management")
//!     .build();
//!
//! let validator = DescriptionValidator::new(ValidatorConfig::default());
//! let report = validator.run(&client, &"/subsystem=messaging".parse()?)?;
//!
//! for failure in &report.failures {
//!     println!("{}", failure);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: addresses, model types, descriptions, errors and reports
//! - [`client`]: the [`ModelClient`](client::ModelClient) trait with HTTP and
//!   snapshot implementations
//! - [`validation`]: descriptor checks and the tree walk
//! - [`config`]: TOML configuration for the command line tool
//!
//! Validation never prints. Failures come back in a
//! [`ValidationReport`](core::ValidationReport) and the caller decides how to
//! show them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod core;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use model_type_validator::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use crate::core::address::{Address, AddressElement};
    pub use crate::core::description::{
        ChildTypeDescription, OperationDescription, ResourceDescription,
    };
    pub use crate::core::types::{Descriptor, DescriptorDefect, ModelType, ValueType};

    // Errors and reports
    pub use crate::core::error::{
        AddressError, ClientError, ClientResult, ConfigError, FailureKind, TypeValidatorError,
        TypeValidatorResult, ValidationFailure, ValidationReport, ValidationStats,
        ValidationWarning,
    };

    // Clients
    pub use crate::client::{
        DescriptionOptions, HttpModelClient, HttpModelClientBuilder, ModelClient, SnapshotClient,
    };

    // Validation
    pub use crate::validation::{
        check_descriptor, DescriptionValidator, MissingChildPolicy, TraversalMode,
        ValidatorConfig,
    };

    // Configuration
    pub use crate::config::{AppConfig, ControllerConfig};
}

use crate::config::AppConfig;
use crate::core::address::Address;
use crate::core::error::{TypeValidatorResult, ValidationReport};
use crate::validation::DescriptionValidator;

/// Validate the server configured in `config`, starting at `address` given
/// in CLI syntax (`/subsystem=messaging`).
pub fn validate_server(config: &AppConfig, address: &str) -> TypeValidatorResult<ValidationReport> {
    let address: Address = address.parse()?;
    let client = config.controller.http_client();
    let validator = DescriptionValidator::new(config.validation.clone());
    Ok(validator.run(&client, &address)?)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
