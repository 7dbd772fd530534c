//! Client for the management API over HTTP.

use crate::client::operation::{read_json, ModelOperation};
use crate::client::{DescriptionOptions, ModelClient};
use crate::core::address::Address;
use crate::core::description::{OperationDescription, ResourceDescription};
use crate::core::error::{ClientError, ClientResult};
use base64::Engine;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Default management endpoint of a local server.
pub const DEFAULT_URL: &str = "http://localhost:9990/management";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`ModelClient`] that POSTs DMR operations to a management endpoint.
pub struct HttpModelClient {
    agent: ureq::Agent,
    url: String,
    authorization: Option<String>,
}

impl std::fmt::Debug for HttpModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpModelClient")
            .field("url", &self.url)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpModelClient {
    /// Client for `url` with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        HttpModelClientBuilder::new().url(url).build()
    }

    /// Start building a client.
    pub fn builder() -> HttpModelClientBuilder {
        HttpModelClientBuilder::new()
    }

    /// Endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one operation and return the raw response body.
    ///
    /// Failed outcomes come back with HTTP 500; their body is still returned
    /// so the caller can report the server's failure description.
    fn execute(&self, operation: &ModelOperation) -> ClientResult<Value> {
        debug!("{} at {}", operation.name, operation.address);

        let mut request = self.agent.post(&self.url);
        if let Some(authorization) = &self.authorization {
            request = request.set("Authorization", authorization);
        }

        let response = match request.send_json(operation.to_request()) {
            Ok(response) => response,
            Err(ureq::Error::Status(500, response)) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(ClientError::Http {
                    url: self.url.clone(),
                    status,
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ClientError::Transport {
                    url: self.url.clone(),
                    message: transport.to_string(),
                })
            }
        };

        read_json(response.into_reader())
            .map_err(|e| operation.protocol(format!("unreadable body: {}", e)))
    }

    fn call<T: DeserializeOwned>(&self, operation: ModelOperation) -> ClientResult<T> {
        let response = self.execute(&operation)?;
        operation.decode(response)
    }
}

impl ModelClient for HttpModelClient {
    fn read_resource_description(
        &self,
        address: &Address,
        options: DescriptionOptions,
    ) -> ClientResult<ResourceDescription> {
        self.call(ModelOperation::read_resource_description(address, options))
    }

    fn read_children_types(&self, address: &Address) -> ClientResult<Vec<String>> {
        self.call(ModelOperation::read_children_types(address))
    }

    fn read_children_names(
        &self,
        address: &Address,
        child_type: &str,
    ) -> ClientResult<Vec<String>> {
        self.call(ModelOperation::read_children_names(address, child_type))
    }

    fn read_operation_names(&self, address: &Address) -> ClientResult<Vec<String>> {
        self.call(ModelOperation::read_operation_names(address))
    }

    fn read_operation_description(
        &self,
        address: &Address,
        name: &str,
    ) -> ClientResult<OperationDescription> {
        self.call(ModelOperation::read_operation_description(address, name))
    }
}

/// Builder for [`HttpModelClient`].
#[derive(Debug, Clone)]
pub struct HttpModelClientBuilder {
    url: String,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl HttpModelClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Management endpoint URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Authenticate with HTTP basic auth.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> HttpModelClient {
        HttpModelClient {
            agent: ureq::AgentBuilder::new().timeout(self.timeout).build(),
            url: self.url,
            authorization: self
                .credentials
                .map(|(user, password)| basic_authorization(&user, &password)),
        }
    }
}

impl Default for HttpModelClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `Authorization` header value for basic auth.
fn basic_authorization(user: &str, password: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
    format!("Basic {}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization() {
        assert_eq!(basic_authorization("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_builder_defaults() {
        let client = HttpModelClient::builder().build();
        assert_eq!(client.url(), DEFAULT_URL);
        assert!(client.authorization.is_none());

        let client = HttpModelClient::builder()
            .url("http://mgmt:9990/management")
            .credentials("admin", "secret")
            .build();
        assert_eq!(client.url(), "http://mgmt:9990/management");
        assert!(client.authorization.is_some());
        assert!(!format!("{:?}", client).contains("YWRtaW46c2VjcmV0"));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let client = HttpModelClient::builder()
            .url("http://127.0.0.1:1/management")
            .timeout(Duration::from_secs(2))
            .build();
        let err = client.read_children_types(&Address::root()).unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
