//! Offline client backed by a recursive description dump.

use crate::client::operation::{
    parse_outcome, read_json, ModelOperation, READ_CHILDREN_NAMES, READ_OPERATION_DESCRIPTION,
};
use crate::client::{DescriptionOptions, ModelClient};
use crate::core::address::Address;
use crate::core::description::{OperationDescription, ResourceDescription};
use crate::core::error::{ClientError, ClientResult};
use log::debug;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// [`ModelClient`] that answers from an in-memory description tree.
///
/// The tree is the result of a recursive `read-resource-description` taken
/// at `root`. Addresses are resolved by walking
/// `children[type].model-description[name]`, falling back to `*`.
/// Parts of the tree the dump does not describe answer with
/// [`ClientError::NotFound`].
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    root: Address,
    description: ResourceDescription,
    source_name: String,
}

impl SnapshotClient {
    /// Wrap an already parsed tree.
    pub fn new(root: Address, description: ResourceDescription) -> Self {
        Self {
            root,
            description,
            source_name: "snapshot".to_string(),
        }
    }

    /// Parse a dump, either bare or in an `outcome`/`result` envelope.
    pub fn from_value(root: Address, value: Value) -> ClientResult<Self> {
        let value = if value.get("outcome").is_some() {
            unwrap_envelope(value, &root)?
        } else {
            value
        };
        let description = ResourceDescription::from_value(value)?;
        Ok(Self::new(root, description))
    }

    /// Load a dump from a JSON file.
    pub fn from_file(path: impl AsRef<Path>, root: Address) -> ClientResult<Self> {
        let path = path.as_ref();
        let value = read_json(BufReader::new(File::open(path)?))?;
        let mut client = Self::from_value(root, value)?;
        client.source_name = path.display().to_string();
        Ok(client)
    }

    /// Address the dump was taken at.
    pub fn root(&self) -> &Address {
        &self.root
    }

    /// The whole tree.
    pub fn description(&self) -> &ResourceDescription {
        &self.description
    }

    fn resolve(&self, address: &Address) -> ClientResult<&ResourceDescription> {
        let relative = address
            .strip_prefix(&self.root)
            .ok_or_else(|| self.not_found(address))?;

        let mut current = &self.description;
        for element in relative {
            current = match current.child(&element.key, &element.value) {
                Some(Some(child)) => child,
                _ => return Err(self.not_found(address)),
            };
        }
        Ok(current)
    }

    fn not_found(&self, address: &Address) -> ClientError {
        ClientError::NotFound {
            address: address.clone(),
            source_name: self.source_name.clone(),
        }
    }
}

impl ModelClient for SnapshotClient {
    fn read_resource_description(
        &self,
        address: &Address,
        options: DescriptionOptions,
    ) -> ClientResult<ResourceDescription> {
        debug!("snapshot read-resource-description at {}", address);
        let resource = self.resolve(address)?;
        let mut description = if options.recursive {
            resource.clone()
        } else {
            resource.shallow()
        };
        if !options.include_operations {
            description.operations.clear();
        }
        Ok(description)
    }

    fn read_children_types(&self, address: &Address) -> ClientResult<Vec<String>> {
        Ok(self.resolve(address)?.children.keys().cloned().collect())
    }

    /// Instances named in the dump, described or not. A child type without
    /// a `model-description` is not found.
    fn read_children_names(
        &self,
        address: &Address,
        child_type: &str,
    ) -> ClientResult<Vec<String>> {
        let resource = self.resolve(address)?;
        let entry = resource
            .children
            .get(child_type)
            .ok_or_else(|| ClientError::OperationFailed {
                operation: READ_CHILDREN_NAMES.to_string(),
                address: address.clone(),
                description: format!("no child type '{}'", child_type),
            })?;
        match &entry.model_description {
            Some(described) => Ok(described.keys().cloned().collect()),
            None => Err(self.not_found(&address.child(child_type, "*"))),
        }
    }

    fn read_operation_names(&self, address: &Address) -> ClientResult<Vec<String>> {
        Ok(self.resolve(address)?.operations.keys().cloned().collect())
    }

    fn read_operation_description(
        &self,
        address: &Address,
        name: &str,
    ) -> ClientResult<OperationDescription> {
        self.resolve(address)?
            .operations
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::OperationFailed {
                operation: READ_OPERATION_DESCRIPTION.to_string(),
                address: address.clone(),
                description: format!("no operation '{}'", name),
            })
    }
}

/// Read the result of an operation response envelope.
///
/// Used when a dump was saved straight from the management endpoint.
pub fn unwrap_envelope(value: Value, root: &Address) -> ClientResult<Value> {
    let operation = ModelOperation::read_resource_description(root, DescriptionOptions::recursive());
    parse_outcome(&operation, value)
}
