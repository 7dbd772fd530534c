//! Model types and the parsed form of a type descriptor.
//!
//! A type descriptor arrives as loosely shaped JSON. It is resolved once, by
//! [`Descriptor::parse`], into a closed sum type so the validator can match on
//! it instead of probing fields at every level of recursion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Key of the `type` field in a descriptor.
pub const TYPE: &str = "type";

/// Key of the `value-type` field in a descriptor.
pub const VALUE_TYPE: &str = "value-type";

/// Wrapper key used by the JSON encoding of a DMR type value.
pub const TYPE_MODEL_VALUE: &str = "TYPE_MODEL_VALUE";

/// Type tags known to the management model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    BigDecimal,
    BigInteger,
    Boolean,
    Bytes,
    Double,
    Expression,
    Int,
    List,
    Long,
    Object,
    Property,
    String,
    Type,
    Undefined,
}

impl ModelType {
    /// All known tags, in declaration order.
    pub const ALL: [ModelType; 14] = [
        ModelType::BigDecimal,
        ModelType::BigInteger,
        ModelType::Boolean,
        ModelType::Bytes,
        ModelType::Double,
        ModelType::Expression,
        ModelType::Int,
        ModelType::List,
        ModelType::Long,
        ModelType::Object,
        ModelType::Property,
        ModelType::String,
        ModelType::Type,
        ModelType::Undefined,
    ];

    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::BigDecimal => "BIG_DECIMAL",
            ModelType::BigInteger => "BIG_INTEGER",
            ModelType::Boolean => "BOOLEAN",
            ModelType::Bytes => "BYTES",
            ModelType::Double => "DOUBLE",
            ModelType::Expression => "EXPRESSION",
            ModelType::Int => "INT",
            ModelType::List => "LIST",
            ModelType::Long => "LONG",
            ModelType::Object => "OBJECT",
            ModelType::Property => "PROPERTY",
            ModelType::String => "STRING",
            ModelType::Type => "TYPE",
            ModelType::Undefined => "UNDEFINED",
        }
    }

    /// Container kinds carry a nested value-type describing their contents.
    pub fn is_container(&self) -> bool {
        matches!(self, ModelType::List | ModelType::Object)
    }

    /// Resolve a JSON node to a type tag.
    ///
    /// Accepts both the plain form (`"LONG"`) and the wrapped DMR form
    /// (`{"TYPE_MODEL_VALUE": "LONG"}`). Anything else yields `None`.
    pub fn from_value(value: &Value) -> Option<ModelType> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Object(map) if map.len() == 1 => map
                .get(TYPE_MODEL_VALUE)
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            _ => None,
        }
    }
}

impl FromStr for ModelType {
    type Err = UnknownModelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownModelType(s.to_string()))
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known type tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown model type '{0}'")]
pub struct UnknownModelType(pub String);

/// Shape of the contents of a container type.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    /// Every element has the same primitive type.
    Simple(ModelType),
    /// Named members, each with its own (still unparsed) descriptor.
    Complex(IndexMap<String, Value>),
}

/// A resolved type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// Non-container type, no value-type.
    Primitive(ModelType),
    /// OBJECT or LIST together with the description of its contents.
    Container(ModelType, ValueType),
}

/// Why a descriptor could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorDefect {
    /// `type` is absent or null.
    MissingType,
    /// `type` is present but is not a known tag.
    UnknownType(Value),
    /// Container type without a `value-type`.
    MissingValueType(ModelType),
    /// Non-container type that still declares a `value-type`.
    UnexpectedValueType(ModelType),
    /// `value-type` is neither a type tag nor a mapping of members.
    InvalidValueType(ModelType, Value),
}

impl Descriptor {
    /// Parse a raw descriptor node.
    pub fn parse(raw: &Value) -> Result<Descriptor, DescriptorDefect> {
        let type_node = field(raw, TYPE).ok_or(DescriptorDefect::MissingType)?;
        let kind = ModelType::from_value(type_node)
            .ok_or_else(|| DescriptorDefect::UnknownType(type_node.clone()))?;
        let value_type = field(raw, VALUE_TYPE);

        if !kind.is_container() {
            return match value_type {
                Some(_) => Err(DescriptorDefect::UnexpectedValueType(kind)),
                None => Ok(Descriptor::Primitive(kind)),
            };
        }

        let value_type = value_type.ok_or(DescriptorDefect::MissingValueType(kind))?;
        if let Some(simple) = ModelType::from_value(value_type) {
            return Ok(Descriptor::Container(kind, ValueType::Simple(simple)));
        }
        match value_type {
            Value::Object(members) => Ok(Descriptor::Container(
                kind,
                ValueType::Complex(
                    members
                        .iter()
                        .map(|(name, member)| (name.clone(), member.clone()))
                        .collect(),
                ),
            )),
            other => Err(DescriptorDefect::InvalidValueType(kind, other.clone())),
        }
    }

    /// The resolved type tag.
    pub fn model_type(&self) -> ModelType {
        match self {
            Descriptor::Primitive(kind) | Descriptor::Container(kind, _) => *kind,
        }
    }
}

/// A defined (present and non-null) field of a mapping node.
fn field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.as_object()
        .and_then(|map| map.get(key))
        .filter(|v| !v.is_null())
}
