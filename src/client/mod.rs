//! Access to the management model.
//!
//! The validator never talks to a server directly. It goes through a
//! [`ModelClient`], which offers the five read operations a walk needs.
//! Two implementations ship with the crate:
//! - [`HttpModelClient`]: the server's JSON management API over HTTP
//! - [`SnapshotClient`]: a recursive description dump loaded from disk

pub mod http;
pub mod operation;
pub mod snapshot;

pub use http::{HttpModelClient, HttpModelClientBuilder};
pub use operation::{parse_outcome, read_json, ModelOperation};
pub use snapshot::SnapshotClient;

use crate::core::address::Address;
use crate::core::description::{OperationDescription, ResourceDescription};
use crate::core::error::ClientResult;

/// Options for `read-resource-description`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionOptions {
    /// Embed child descriptions under `children[type].model-description`.
    pub recursive: bool,
    /// Include attributes and operations inherited from parent resources.
    pub inherited: bool,
    /// Include operation descriptions.
    pub include_operations: bool,
}

impl DescriptionOptions {
    /// One resource, attributes only.
    pub fn shallow() -> Self {
        Self {
            recursive: false,
            inherited: true,
            include_operations: false,
        }
    }

    /// The whole subtree with operations, in one call.
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            inherited: false,
            include_operations: true,
        }
    }

    /// Set the `inherited` flag.
    pub fn with_inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }
}

impl Default for DescriptionOptions {
    fn default() -> Self {
        Self::shallow()
    }
}

/// Read access to a management model.
///
/// Any `Err` is fatal to the validation run that issued the call.
pub trait ModelClient {
    /// Describe the resource at `address`.
    fn read_resource_description(
        &self,
        address: &Address,
        options: DescriptionOptions,
    ) -> ClientResult<ResourceDescription>;

    /// Names of the child types registered under `address`.
    fn read_children_types(&self, address: &Address) -> ClientResult<Vec<String>>;

    /// Names of the existing children of one type.
    fn read_children_names(&self, address: &Address, child_type: &str)
        -> ClientResult<Vec<String>>;

    /// Names of the operations available at `address`.
    fn read_operation_names(&self, address: &Address) -> ClientResult<Vec<String>>;

    /// Describe one operation at `address`.
    fn read_operation_description(
        &self,
        address: &Address,
        name: &str,
    ) -> ClientResult<OperationDescription>;
}

impl<C: ModelClient + ?Sized> ModelClient for &C {
    fn read_resource_description(
        &self,
        address: &Address,
        options: DescriptionOptions,
    ) -> ClientResult<ResourceDescription> {
        (**self).read_resource_description(address, options)
    }

    fn read_children_types(&self, address: &Address) -> ClientResult<Vec<String>> {
        (**self).read_children_types(address)
    }

    fn read_children_names(
        &self,
        address: &Address,
        child_type: &str,
    ) -> ClientResult<Vec<String>> {
        (**self).read_children_names(address, child_type)
    }

    fn read_operation_names(&self, address: &Address) -> ClientResult<Vec<String>> {
        (**self).read_operation_names(address)
    }

    fn read_operation_description(
        &self,
        address: &Address,
        name: &str,
    ) -> ClientResult<OperationDescription> {
        (**self).read_operation_description(address, name)
    }
}

impl<C: ModelClient + ?Sized> ModelClient for Box<C> {
    fn read_resource_description(
        &self,
        address: &Address,
        options: DescriptionOptions,
    ) -> ClientResult<ResourceDescription> {
        (**self).read_resource_description(address, options)
    }

    fn read_children_types(&self, address: &Address) -> ClientResult<Vec<String>> {
        (**self).read_children_types(address)
    }

    fn read_children_names(
        &self,
        address: &Address,
        child_type: &str,
    ) -> ClientResult<Vec<String>> {
        (**self).read_children_names(address, child_type)
    }

    fn read_operation_names(&self, address: &Address) -> ClientResult<Vec<String>> {
        (**self).read_operation_names(address)
    }

    fn read_operation_description(
        &self,
        address: &Address,
        name: &str,
    ) -> ClientResult<OperationDescription> {
        (**self).read_operation_description(address, name)
    }
}
