//! Resource and operation descriptions as returned by the management API.
//!
//! Only the structural parts are typed. Attribute and parameter descriptors
//! stay raw JSON so the validator can report the offending fragment exactly
//! as the server sent it.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Wildcard instance name used by descriptions that cover every instance.
pub const WILDCARD: &str = "*";

/// Description of one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceDescription {
    /// Attribute name to raw type descriptor.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Value>,
    /// Operation name to operation description.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "IndexMap::is_empty")]
    pub operations: IndexMap<String, OperationDescription>,
    /// Child type name to child type entry.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, ChildTypeDescription>,
}

/// Description of one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperationDescription {
    /// Name the description claims for itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Parameter name to raw type descriptor.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "IndexMap::is_empty")]
    pub request_properties: IndexMap<String, Value>,
}

/// Entry for one child type under `children`.
///
/// `model_description` is only filled in by recursive reads. A present key
/// with a null value means the instance is declared but not described.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChildTypeDescription {
    /// Free-text description of the child type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Instance name to that instance's description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_description: Option<IndexMap<String, Option<ResourceDescription>>>,
}

impl ResourceDescription {
    /// Parse a description from its JSON form.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Description of a child, falling back to the wildcard entry.
    ///
    /// The outer `None` means the child type or its `model-description` is
    /// missing; the inner `None` means the instance is declared but has no
    /// description.
    pub fn child(&self, child_type: &str, name: &str) -> Option<Option<&ResourceDescription>> {
        let described = self.children.get(child_type)?.model_description.as_ref()?;
        described
            .get(name)
            .or_else(|| described.get(WILDCARD))
            .map(Option::as_ref)
    }

    /// Copy of this description without the embedded child descriptions.
    pub fn shallow(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            operations: self.operations.clone(),
            children: self
                .children
                .iter()
                .map(|(name, entry)| {
                    (
                        name.clone(),
                        ChildTypeDescription {
                            description: entry.description.clone(),
                            model_description: None,
                        },
                    )
                })
                .collect(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
