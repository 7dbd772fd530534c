//! Management operations in their JSON (DMR) form.
//!
//! Request shape:
//! ```json
//! {"operation": "read-children-names", "address": [{"subsystem": "messaging"}], "child-type": "server"}
//! ```
//! Response shape:
//! ```json
//! {"outcome": "success", "result": ["default"]}
//! {"outcome": "failed", "failure-description": "WFLYCTL0216: Management resource not found"}
//! ```

use crate::client::DescriptionOptions;
use crate::core::address::Address;
use crate::core::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

pub const READ_RESOURCE_DESCRIPTION: &str = "read-resource-description";
pub const READ_CHILDREN_TYPES: &str = "read-children-types";
pub const READ_CHILDREN_NAMES: &str = "read-children-names";
pub const READ_OPERATION_NAMES: &str = "read-operation-names";
pub const READ_OPERATION_DESCRIPTION: &str = "read-operation-description";

const OUTCOME: &str = "outcome";
const SUCCESS: &str = "success";
const RESULT: &str = "result";
const FAILURE_DESCRIPTION: &str = "failure-description";

/// One management operation addressed to a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOperation {
    /// Operation name.
    pub name: &'static str,
    /// Target resource.
    pub address: Address,
    /// Extra request parameters.
    pub params: Map<String, Value>,
}

impl ModelOperation {
    fn new(name: &'static str, address: &Address) -> Self {
        Self {
            name,
            address: address.clone(),
            params: Map::new(),
        }
    }

    fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn read_resource_description(address: &Address, options: DescriptionOptions) -> Self {
        Self::new(READ_RESOURCE_DESCRIPTION, address)
            .param("recursive", options.recursive)
            .param("inherited", options.inherited)
            .param("operations", options.include_operations)
    }

    pub fn read_children_types(address: &Address) -> Self {
        Self::new(READ_CHILDREN_TYPES, address)
    }

    pub fn read_children_names(address: &Address, child_type: &str) -> Self {
        Self::new(READ_CHILDREN_NAMES, address).param("child-type", child_type)
    }

    pub fn read_operation_names(address: &Address) -> Self {
        Self::new(READ_OPERATION_NAMES, address)
    }

    pub fn read_operation_description(address: &Address, name: &str) -> Self {
        Self::new(READ_OPERATION_DESCRIPTION, address).param("name", name)
    }

    /// Request body.
    pub fn to_request(&self) -> Value {
        let mut body = Map::new();
        body.insert("operation".to_string(), Value::String(self.name.to_string()));
        body.insert("address".to_string(), self.address.to_dmr());
        for (key, value) in &self.params {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }

    /// Deserialize the `result` of a successful response.
    pub fn decode<T: DeserializeOwned>(&self, response: Value) -> ClientResult<T> {
        let result = parse_outcome(self, response)?;
        serde_json::from_value(result).map_err(|e| self.protocol(e.to_string()))
    }

    pub(crate) fn protocol(&self, reason: impl Into<String>) -> ClientError {
        ClientError::Protocol {
            operation: self.name.to_string(),
            address: self.address.clone(),
            reason: reason.into(),
        }
    }
}

/// Check the outcome of a response and extract its `result`.
///
/// A missing `result` on success is returned as `null`.
pub fn parse_outcome(operation: &ModelOperation, response: Value) -> ClientResult<Value> {
    let Value::Object(mut body) = response else {
        return Err(operation.protocol("response is not a JSON object"));
    };

    match body.get(OUTCOME).and_then(Value::as_str) {
        Some(SUCCESS) => Ok(body.remove(RESULT).unwrap_or(Value::Null)),
        Some(_) => {
            let description = match body.remove(FAILURE_DESCRIPTION) {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => "no failure-description given".to_string(),
            };
            Err(ClientError::OperationFailed {
                operation: operation.name.to_string(),
                address: operation.address.clone(),
                description,
            })
        }
        None => Err(operation.protocol("response has no outcome")),
    }
}

/// Parse a JSON document without a nesting limit.
///
/// Each resource level of a recursive description costs four levels of
/// JSON nesting, so the parser's default limit of 128 would cut a dump off
/// long before the walk's own depth cap.
pub fn read_json<R: Read>(reader: R) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_reader(reader);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
