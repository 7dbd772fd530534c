//! Validation of type descriptors across a resource tree.
//!
//! The validator runs over a tree that is either fully embedded in one
//! recursive description or read resource by resource from a client.

pub mod descriptor;
pub mod options;
pub mod validator;

pub use descriptor::check_descriptor;
pub use options::{MissingChildPolicy, TraversalMode, ValidatorConfig, DEFAULT_MAX_DEPTH};
pub use validator::DescriptionValidator;
