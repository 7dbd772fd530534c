//! Type descriptor check.
//!
//! Checks one attribute or parameter descriptor against the value-type rule:
//! OBJECT and LIST need a `value-type`, everything else must not have one.
//! Complex value-types are checked member by member, recursively.

use crate::core::address::Address;
use crate::core::error::{FailureKind, ValidationFailure};
use crate::core::types::{Descriptor, DescriptorDefect, ValueType};
use serde_json::Value;

/// Check a raw descriptor and append any failures.
///
/// `location` names the descriptor within its resource, e.g.
/// `attribute timeout` or `parameter name of add`.
pub fn check_descriptor(
    location: &str,
    address: &Address,
    raw: &Value,
    failures: &mut Vec<ValidationFailure>,
) {
    let mut checker = DescriptorChecker {
        location,
        address,
        member_path: Vec::new(),
        failures,
    };
    checker.check(raw);
}

struct DescriptorChecker<'a> {
    location: &'a str,
    address: &'a Address,
    member_path: Vec<String>,
    failures: &'a mut Vec<ValidationFailure>,
}

impl DescriptorChecker<'_> {
    fn check(&mut self, raw: &Value) {
        match Descriptor::parse(raw) {
            Ok(Descriptor::Primitive(_)) => {}
            Ok(Descriptor::Container(_, ValueType::Simple(_))) => {}
            Ok(Descriptor::Container(_, ValueType::Complex(members))) => {
                for (name, member) in &members {
                    self.member_path.push(name.clone());
                    self.check(member);
                    self.member_path.pop();
                }
            }
            Err(defect) => self.record(defect_kind(&defect), raw),
        }
    }

    fn record(&mut self, kind: FailureKind, raw: &Value) {
        self.failures.push(ValidationFailure {
            kind,
            location: self.location.to_string(),
            member_path: self.member_path.clone(),
            address: self.address.clone(),
            detail: raw.clone(),
        });
    }
}

fn defect_kind(defect: &DescriptorDefect) -> FailureKind {
    match defect {
        DescriptorDefect::MissingType => FailureKind::MissingType,
        DescriptorDefect::UnknownType(_) => FailureKind::UnknownType,
        DescriptorDefect::MissingValueType(t) => FailureKind::MissingValueType(*t),
        DescriptorDefect::UnexpectedValueType(t) => FailureKind::UnexpectedValueType(*t),
        DescriptorDefect::InvalidValueType(t, _) => FailureKind::InvalidValueType(*t),
    }
}
