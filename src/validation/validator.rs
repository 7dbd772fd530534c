//! The description validator.
//!
//! Walks a resource tree depth-first, pre-order: the resource's attributes,
//! then its operation parameters, then each child in turn. Schema problems
//! are collected as failures and never stop the walk; client errors abort it.

use crate::client::{DescriptionOptions, ModelClient};
use crate::core::address::Address;
use crate::core::description::{OperationDescription, ResourceDescription};
use crate::core::error::{
    ClientError, ClientResult, FailureKind, ValidationFailure, ValidationReport,
    ValidationWarning,
};
use crate::validation::descriptor::check_descriptor;
use crate::validation::options::{MissingChildPolicy, TraversalMode, ValidatorConfig};
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::{json, Value};
use std::time::Instant;

/// Validates attribute and parameter type descriptors of a resource tree.
#[derive(Debug, Clone, Default)]
pub struct DescriptionValidator {
    config: ValidatorConfig,
}

impl DescriptionValidator {
    /// Create a validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate an already materialized tree and return its failures.
    pub fn validate(
        &self,
        address: &Address,
        description: &ResourceDescription,
    ) -> Vec<ValidationFailure> {
        self.validate_report(address, description).failures
    }

    /// Validate an already materialized tree.
    ///
    /// Children are taken from the embedded `model-description` entries.
    pub fn validate_report(
        &self,
        address: &Address,
        description: &ResourceDescription,
    ) -> ValidationReport {
        let mut walk = Walk::new(&self.config, address);
        walk.embedded(address, description);
        walk.finish()
    }

    /// Fetch descriptions from `client` and validate everything at and
    /// below `address`.
    ///
    /// The first client error aborts the run; no partial report is returned.
    pub fn run<C: ModelClient>(&self, client: &C, address: &Address) -> ClientResult<ValidationReport> {
        match self.config.mode {
            TraversalMode::Eager => {
                let options = DescriptionOptions::recursive().with_inherited(self.config.inherited);
                let description = client.read_resource_description(address, options)?;
                Ok(self.validate_report(address, &description))
            }
            TraversalMode::Lazy => {
                let mut walk = Walk::new(&self.config, address);
                walk.fetched(client, address)?;
                Ok(walk.finish())
            }
        }
    }
}

/// State of one validation run.
struct Walk<'a> {
    config: &'a ValidatorConfig,
    start_depth: usize,
    started: Instant,
    report: ValidationReport,
}

impl<'a> Walk<'a> {
    fn new(config: &'a ValidatorConfig, start: &Address) -> Self {
        Self {
            config,
            start_depth: start.depth(),
            started: Instant::now(),
            report: ValidationReport::new(),
        }
    }

    fn finish(mut self) -> ValidationReport {
        self.report.duration_ms = self.started.elapsed().as_millis() as u64;
        self.report
    }

    /// Count the resource, or record the depth cap and refuse to descend.
    fn enter(&mut self, address: &Address) -> bool {
        let depth = address.depth().saturating_sub(self.start_depth);
        if depth > self.config.max_depth {
            warn!("depth limit {} reached at {}, not descending", self.config.max_depth, address);
            self.report.add_failure(ValidationFailure {
                kind: FailureKind::DepthLimitExceeded,
                location: format!("resource at depth {}", depth),
                member_path: Vec::new(),
                address: address.clone(),
                detail: Value::from(self.config.max_depth),
            });
            return false;
        }
        debug!("validating {}", address);
        self.report.stats.resources += 1;
        true
    }

    fn attributes(&mut self, address: &Address, attributes: &IndexMap<String, Value>) {
        for (name, descriptor) in attributes {
            self.report.stats.attributes += 1;
            let location = format!("attribute {}", name);
            self.descriptor(&location, address, descriptor);
        }
    }

    fn operation(&mut self, address: &Address, name: &str, operation: &OperationDescription) {
        if self.config.check_operation_names {
            if let Some(declared) = operation.operation_name.as_deref() {
                if declared != name {
                    self.warn(
                        address,
                        format!("operation '{}' is described as '{}'", name, declared),
                    );
                }
            }
        }
        for (param, descriptor) in &operation.request_properties {
            self.report.stats.parameters += 1;
            let location = format!("parameter {} of {}", param, name);
            self.descriptor(&location, address, descriptor);
        }
    }

    fn descriptor(&mut self, location: &str, address: &Address, descriptor: &Value) {
        let mut found = Vec::new();
        check_descriptor(location, address, descriptor, &mut found);
        for failure in found {
            self.report.add_failure(failure);
        }
    }

    fn warn(&mut self, address: &Address, message: String) {
        warn!("{} at {}", message, address);
        self.report.add_warning(ValidationWarning {
            message,
            address: address.clone(),
        });
    }

    /// Walk a tree whose children are embedded in the description.
    fn embedded(&mut self, address: &Address, description: &ResourceDescription) {
        if !self.enter(address) {
            return;
        }

        self.attributes(address, &description.attributes);
        for (name, operation) in &description.operations {
            self.operation(address, name, operation);
        }

        for (child_type, entry) in &description.children {
            let Some(described) = &entry.model_description else {
                self.missing_child(address, child_type, None);
                continue;
            };
            for (name, child) in described {
                match child {
                    Some(child) => self.embedded(&address.child(child_type, name), child),
                    None => self.missing_child(address, child_type, Some(name.as_str())),
                }
            }
        }
    }

    fn missing_child(&mut self, address: &Address, child_type: &str, name: Option<&str>) {
        let location = match name {
            Some(name) => format!("child {}={}", child_type, name),
            None => format!("child type {}", child_type),
        };
        match self.config.missing_child {
            MissingChildPolicy::Skip => {
                self.warn(address, format!("no model-description for {}, skipping", location));
            }
            MissingChildPolicy::Fail => self.report.add_failure(ValidationFailure {
                kind: FailureKind::MissingChildDescription,
                location,
                member_path: Vec::new(),
                address: address.clone(),
                detail: json!({"child-type": child_type, "name": name}),
            }),
        }
    }

    /// Walk a tree by reading each resource from the client.
    ///
    /// A child the client cannot find is handled like an embedded child
    /// without a description.
    fn fetched<C: ModelClient>(&mut self, client: &C, address: &Address) -> ClientResult<()> {
        let description = client.read_resource_description(address, self.shallow())?;
        self.fetched_resource(client, address, &description)
    }

    fn fetched_resource<C: ModelClient>(
        &mut self,
        client: &C,
        address: &Address,
        description: &ResourceDescription,
    ) -> ClientResult<()> {
        if !self.enter(address) {
            return Ok(());
        }

        self.attributes(address, &description.attributes);
        for name in client.read_operation_names(address)? {
            let operation = client.read_operation_description(address, &name)?;
            self.operation(address, &name, &operation);
        }

        for child_type in client.read_children_types(address)? {
            let names = match client.read_children_names(address, &child_type) {
                Err(ClientError::NotFound { .. }) => {
                    self.missing_child(address, &child_type, None);
                    continue;
                }
                names => names?,
            };
            for name in names {
                let child = address.child(&child_type, &name);
                match client.read_resource_description(&child, self.shallow()) {
                    Ok(description) => self.fetched_resource(client, &child, &description)?,
                    Err(ClientError::NotFound { .. }) => {
                        self.missing_child(address, &child_type, Some(name.as_str()))
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    fn shallow(&self) -> DescriptionOptions {
        DescriptionOptions::shallow().with_inherited(self.config.inherited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SnapshotClient;
    use crate::core::types::ModelType;
    use std::cell::Cell;

    fn desc(value: Value) -> ResourceDescription {
        ResourceDescription::from_value(value).unwrap()
    }

    fn timeout(descriptor: Value) -> Vec<ValidationFailure> {
        let tree = desc(json!({"attributes": {"timeout": descriptor}}));
        DescriptionValidator::default().validate(&Address::root(), &tree)
    }

    #[test]
    fn test_timeout_examples() {
        assert!(timeout(json!({"type": "LONG"})).is_empty());

        let failures = timeout(json!({"type": "LIST"}));
        assert_eq!(failures.len(), 1);
        let text = failures[0].to_string();
        assert!(text.contains("no value-type"));
        assert!(text.contains("timeout"));
        assert_eq!(failures[0].address, Address::root());

        assert!(timeout(json!({"type": "LIST", "value-type": "LONG"})).is_empty());

        let failures = timeout(json!({"type": "LONG", "value-type": "LONG"}));
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("value-type given"));
    }

    #[test]
    fn test_operation_parameters_are_checked() {
        let tree = desc(json!({
            "operations": {
                "add": {
                    "operation-name": "add",
                    "request-properties": {
                        "name": {"type": "STRING"},
                        "entries": {"type": "OBJECT"}
                    }
                }
            }
        }));
        let failures = DescriptionValidator::default().validate(&Address::root(), &tree);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].location, "parameter entries of add");
        assert_eq!(failures[0].kind, FailureKind::MissingValueType(ModelType::Object));
    }

    fn tree_with_undescribed_child() -> ResourceDescription {
        desc(json!({
            "children": {
                "subsystem": {"description": "subsystems"},
                "interface": {
                    "model-description": {
                        "public": {"attributes": {"inet-address": {"type": "LIST"}}}
                    }
                }
            }
        }))
    }

    #[test]
    fn test_missing_child_description_is_skipped() {
        let report = DescriptionValidator::default()
            .validate_report(&Address::root(), &tree_with_undescribed_child());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].address,
            Address::from_pairs([("interface", "public")])
        );
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("subsystem"));
        assert_eq!(report.stats.resources, 2);
    }

    #[test]
    fn test_missing_child_description_can_fail() {
        let config = ValidatorConfig::new().with_missing_child(MissingChildPolicy::Fail);
        let report = DescriptionValidator::new(config)
            .validate_report(&Address::root(), &tree_with_undescribed_child());

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].kind, FailureKind::MissingChildDescription);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_null_instance_description_is_skipped() {
        let tree = desc(json!({
            "children": {
                "subsystem": {"model-description": {"messaging": null, "logging": {}}}
            }
        }));
        let report = DescriptionValidator::default().validate_report(&Address::root(), &tree);
        assert!(report.failures.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("subsystem=messaging"));
        assert_eq!(report.stats.resources, 2);
    }

    #[test]
    fn test_child_addresses_extend_parent() {
        let tree = desc(json!({
            "children": {
                "subsystem": {
                    "model-description": {
                        "messaging": {
                            "children": {
                                "server": {
                                    "model-description": {
                                        "default": {"attributes": {"bad": {"type": "BOGUS"}}}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }));
        let start = Address::from_pairs([("host", "primary")]);
        let failures = DescriptionValidator::default().validate(&start, &tree);
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].address.to_string(),
            "/host=primary/subsystem=messaging/server=default"
        );
    }

    #[test]
    fn test_depth_cap() {
        let tree = desc(json!({
            "children": {"a": {"model-description": {"1": {
                "children": {"b": {"model-description": {"2": {
                    "attributes": {"x": {"type": "LIST"}}
                }}}}
            }}}}
        }));
        let config = ValidatorConfig::new().with_max_depth(1);
        let report = DescriptionValidator::new(config).validate_report(&Address::root(), &tree);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::DepthLimitExceeded);
        assert_eq!(report.stats.resources, 2);
    }

    #[test]
    fn test_operation_name_mismatch_warns() {
        let tree = desc(json!({
            "operations": {"remove": {"operation-name": "delete"}}
        }));
        let report = DescriptionValidator::default().validate_report(&Address::root(), &tree);
        assert!(report.success);
        assert_eq!(report.warnings.len(), 1);
    }

    fn snapshot_tree() -> Value {
        json!({
            "attributes": {"name": {"type": "STRING"}, "tags": {"type": "LIST"}},
            "operations": {
                "add": {"request-properties": {"opts": {"type": "INT", "value-type": "INT"}}}
            },
            "children": {
                "subsystem": {
                    "model-description": {
                        "messaging": {
                            "attributes": {"queues": {"type": "OBJECT", "value-type": {
                                "name": {"type": "STRING"},
                                "size": {}
                            }}}
                        },
                        "logging": {"attributes": {"level": {"type": "STRING"}}}
                    }
                }
            }
        })
    }

    #[test]
    fn test_eager_and_lazy_agree() {
        let client = SnapshotClient::from_value(Address::root(), snapshot_tree()).unwrap();

        let eager = DescriptionValidator::default()
            .run(&client, &Address::root())
            .unwrap();
        let lazy = DescriptionValidator::new(ValidatorConfig::new().with_mode(TraversalMode::Lazy))
            .run(&client, &Address::root())
            .unwrap();

        assert_eq!(eager.failures.len(), 3);
        assert_eq!(eager.failures, lazy.failures);
        assert_eq!(eager.stats, lazy.stats);
        assert_eq!(eager.stats.resources, 3);
        assert_eq!(eager.stats.attributes, 4);
        assert_eq!(eager.stats.parameters, 1);
    }

    fn tree_with_null_instance() -> Value {
        json!({
            "children": {
                "subsystem": {
                    "model-description": {
                        "messaging": null,
                        "logging": {"attributes": {"bad": {"type": "LIST"}}}
                    }
                },
                "path": {"description": "paths"}
            }
        })
    }

    #[test]
    fn test_lazy_walk_skips_undescribed_children() {
        let client = SnapshotClient::from_value(Address::root(), tree_with_null_instance()).unwrap();
        let eager = DescriptionValidator::default()
            .run(&client, &Address::root())
            .unwrap();
        let lazy = DescriptionValidator::new(ValidatorConfig::new().with_mode(TraversalMode::Lazy))
            .run(&client, &Address::root())
            .unwrap();

        assert_eq!(lazy.failures.len(), 1);
        assert_eq!(
            lazy.failures[0].address,
            Address::from_pairs([("subsystem", "logging")])
        );
        assert_eq!(lazy.warnings, eager.warnings);
        assert_eq!(lazy.warnings.len(), 2);
        assert_eq!(lazy.failures, eager.failures);
        assert_eq!(lazy.stats, eager.stats);
    }

    #[test]
    fn test_lazy_walk_fails_undescribed_children_on_request() {
        let client = SnapshotClient::from_value(Address::root(), tree_with_null_instance()).unwrap();
        let config = ValidatorConfig::new().with_missing_child(MissingChildPolicy::Fail);
        let eager = DescriptionValidator::new(config.clone())
            .run(&client, &Address::root())
            .unwrap();
        let lazy = DescriptionValidator::new(config.with_mode(TraversalMode::Lazy))
            .run(&client, &Address::root())
            .unwrap();

        assert_eq!(lazy.failures.len(), 3);
        assert_eq!(lazy.failures[0].kind, FailureKind::MissingChildDescription);
        assert_eq!(
            lazy.failures[0].detail,
            json!({"child-type": "subsystem", "name": "messaging"})
        );
        assert_eq!(lazy.failures[2].detail, json!({"child-type": "path", "name": null}));
        assert_eq!(lazy.failures, eager.failures);
    }

    #[test]
    fn test_lazy_walk_start_address_must_exist() {
        let client = SnapshotClient::from_value(Address::root(), tree_with_null_instance()).unwrap();
        let validator =
            DescriptionValidator::new(ValidatorConfig::new().with_mode(TraversalMode::Lazy));
        assert!(matches!(
            validator.run(&client, &Address::from_pairs([("subsystem", "messaging")])),
            Err(ClientError::NotFound { .. })
        ));
    }

    /// Client whose every call fails after a number of successful ones.
    struct FailingClient {
        inner: SnapshotClient,
        remaining: Cell<usize>,
    }

    impl FailingClient {
        fn tick(&self) -> ClientResult<()> {
            if self.remaining.get() == 0 {
                return Err(ClientError::Transport {
                    url: "test".to_string(),
                    message: "connection reset".to_string(),
                });
            }
            self.remaining.set(self.remaining.get() - 1);
            Ok(())
        }
    }

    impl ModelClient for FailingClient {
        fn read_resource_description(
            &self,
            address: &Address,
            options: DescriptionOptions,
        ) -> ClientResult<ResourceDescription> {
            self.tick()?;
            self.inner.read_resource_description(address, options)
        }

        fn read_children_types(&self, address: &Address) -> ClientResult<Vec<String>> {
            self.tick()?;
            self.inner.read_children_types(address)
        }

        fn read_children_names(
            &self,
            address: &Address,
            child_type: &str,
        ) -> ClientResult<Vec<String>> {
            self.tick()?;
            self.inner.read_children_names(address, child_type)
        }

        fn read_operation_names(&self, address: &Address) -> ClientResult<Vec<String>> {
            self.tick()?;
            self.inner.read_operation_names(address)
        }

        fn read_operation_description(
            &self,
            address: &Address,
            name: &str,
        ) -> ClientResult<OperationDescription> {
            self.tick()?;
            self.inner.read_operation_description(address, name)
        }
    }

    #[test]
    fn test_client_error_aborts_lazy_run() {
        let client = FailingClient {
            inner: SnapshotClient::from_value(Address::root(), snapshot_tree()).unwrap(),
            remaining: Cell::new(5),
        };
        let validator =
            DescriptionValidator::new(ValidatorConfig::new().with_mode(TraversalMode::Lazy));
        assert!(matches!(
            validator.run(&client, &Address::root()),
            Err(ClientError::Transport { .. })
        ));
    }

    #[test]
    fn test_client_error_aborts_eager_run() {
        let client = FailingClient {
            inner: SnapshotClient::from_value(Address::root(), snapshot_tree()).unwrap(),
            remaining: Cell::new(0),
        };
        assert!(DescriptionValidator::default()
            .run(&client, &Address::root())
            .is_err());
    }
}
