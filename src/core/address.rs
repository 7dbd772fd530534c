//! Resource addresses.
//!
//! An address is the path from the root resource to a resource, one
//! `(type, name)` pair per level. It is displayed and parsed in management
//! CLI syntax (`/subsystem=messaging/server=default`) and goes over the wire
//! as a list of single-entry objects (`[{"subsystem": "messaging"}]`).

use crate::core::error::AddressError;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One level of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressElement {
    /// Resource type, e.g. `subsystem`.
    pub key: String,
    /// Resource instance name, e.g. `messaging` or `*`.
    pub value: String,
}

/// Ordered path of `(type, name)` pairs. The empty address is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address(Vec<AddressElement>);

impl Address {
    /// The root address.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build an address from `(type, name)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| AddressElement {
                    key: key.into(),
                    value: value.into(),
                })
                .collect(),
        )
    }

    /// Address of a child: this address with one pair appended.
    pub fn child(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut elements = self.0.clone();
        elements.push(AddressElement {
            key: key.into(),
            value: value.into(),
        });
        Self(elements)
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root address.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The address elements, outermost first.
    pub fn elements(&self) -> &[AddressElement] {
        &self.0
    }

    /// If `self` lies at or below `base`, the elements that follow `base`.
    pub fn strip_prefix(&self, base: &Address) -> Option<&[AddressElement]> {
        if self.0.len() < base.0.len() || self.0[..base.0.len()] != base.0[..] {
            return None;
        }
        Some(&self.0[base.0.len()..])
    }

    /// Wire form: `[{"type": "name"}, ...]`.
    pub fn to_dmr(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|e| {
                    let mut pair = Map::new();
                    pair.insert(e.key.clone(), Value::String(e.value.clone()));
                    Value::Object(pair)
                })
                .collect(),
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for e in &self.0 {
            write!(f, "/{}={}", e.key, e.value)?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut elements = Vec::new();
        for segment in trimmed.split('/').filter(|seg| !seg.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| AddressError::MissingSeparator(segment.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(AddressError::EmptyPart(segment.to_string()));
            }
            elements.push(AddressElement {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        Ok(Self(elements))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for e in &self.0 {
            let mut pair = Map::new();
            pair.insert(e.key.clone(), Value::String(e.value.clone()));
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<Map<String, Value>>::deserialize(deserializer)?;
        let mut elements = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let mut entries = pair.into_iter();
            match (entries.next(), entries.next()) {
                (Some((key, Value::String(value))), None) => {
                    elements.push(AddressElement { key, value })
                }
                _ => {
                    return Err(de::Error::custom(
                        "address element must be a single \"type\": \"name\" entry",
                    ))
                }
            }
        }
        Ok(Self(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_display_and_parse() {
        assert_eq!(Address::root().to_string(), "/");
        assert_eq!("/".parse::<Address>().unwrap(), Address::root());
        assert_eq!("".parse::<Address>().unwrap(), Address::root());
    }

    #[test]
    fn test_child_appends_without_touching_parent() {
        let parent = Address::from_pairs([("subsystem", "messaging")]);
        let child = parent.child("server", "default");
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
        assert_eq!(child.to_string(), "/subsystem=messaging/server=default");
    }

    #[test]
    fn test_parse_cli_syntax() {
        let addr: Address = "/subsystem=messaging/server=default".parse().unwrap();
        assert_eq!(
            addr,
            Address::from_pairs([("subsystem", "messaging"), ("server", "default")])
        );
        assert!(matches!(
            "/subsystem".parse::<Address>(),
            Err(AddressError::MissingSeparator(_))
        ));
        assert!(matches!(
            "/subsystem=".parse::<Address>(),
            Err(AddressError::EmptyPart(_))
        ));
    }

    #[test]
    fn test_wire_form() {
        let addr = Address::from_pairs([("subsystem", "messaging")]);
        assert_eq!(addr.to_dmr(), json!([{"subsystem": "messaging"}]));
        assert_eq!(serde_json::to_value(&addr).unwrap(), addr.to_dmr());

        let back: Address = serde_json::from_value(json!([{"subsystem": "messaging"}])).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_value::<Address>(json!([{"a": "b", "c": "d"}])).is_err());
    }

    #[test]
    fn test_strip_prefix() {
        let base = Address::from_pairs([("subsystem", "messaging")]);
        let below = base.child("server", "default");
        assert_eq!(below.strip_prefix(&base).unwrap().len(), 1);
        assert_eq!(base.strip_prefix(&base).unwrap().len(), 0);
        assert!(Address::root().strip_prefix(&base).is_none());
    }
}
