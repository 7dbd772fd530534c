//! Core types for the model type validator.
//!
//! This module contains the data model the validator works on:
//! - Resource addresses
//! - Model type tags and the parsed descriptor sum type
//! - Resource and operation descriptions
//! - Error, failure and report types

pub mod address;
pub mod description;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use address::{Address, AddressElement};
pub use description::{ChildTypeDescription, OperationDescription, ResourceDescription};
pub use error::{
    ClientError, FailureKind, TypeValidatorError, ValidationFailure, ValidationReport,
    ValidationWarning,
};
pub use types::{Descriptor, DescriptorDefect, ModelType, ValueType};
