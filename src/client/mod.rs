//! The API client.
//!
//! [`ApiClient`] pairs a [`RestTransport`] with an optional [`Credential`]
//! and parses every response body into a [`Document`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hauler::{ApiClient, ClientConfig, CredentialResolver, Query};
//!
//! let config = ClientConfig::builder().base_url("https://app.hauler.example").build();
//! let credential = CredentialResolver::system(config.base_url()).resolve(None)?;
//! let client = ApiClient::new(&config, Some(credential))?;
//!
//! let doc = client
//!     .fetch_collection("/v1/brokers", &Query::new().page(Some(10), None))
//!     .await?;
//! println!("{} brokers", doc.resources().len());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::auth::Credential;
use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::Result;
use crate::transport::{Query, RestTransport};

struct ClientInner {
    transport: RestTransport,
    credential: Option<Credential>,
}

/// JSON:API client for one base URL.
///
/// `ApiClient` is `Clone`; clones share the transport and credential.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Creates a client. With `credential` set to `None`, requests are sent
    /// without an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an invalid base URL.
    pub fn new(config: &ClientConfig, credential: Option<Credential>) -> Result<Self> {
        Ok(Self::with_transport(
            RestTransport::from_config(config)?,
            credential,
        ))
    }

    /// Creates a client over an existing transport.
    pub fn with_transport(transport: RestTransport, credential: Option<Credential>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                credential,
            }),
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &RestTransport {
        &self.inner.transport
    }

    /// Returns `true` if requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.inner.credential.is_some()
    }

    /// Fetches a document whose primary data is a single resource.
    ///
    /// # Errors
    ///
    /// Returns transport errors, or `MalformedResponse` when the body is not
    /// a single-resource document.
    pub async fn fetch_single(&self, path: &str, query: &Query) -> Result<Document> {
        let body = self.get(path, query).await?;
        Document::parse_single(&body)
    }

    /// Fetches a document whose primary data is a collection.
    ///
    /// # Errors
    ///
    /// Returns transport errors, or `MalformedResponse` when the body is not
    /// a collection document.
    pub async fn fetch_collection(&self, path: &str, query: &Query) -> Result<Document> {
        let body = self.get(path, query).await?;
        Document::parse_collection(&body)
    }

    async fn get(&self, path: &str, query: &Query) -> Result<bytes::Bytes> {
        self.inner
            .transport
            .get(path, query, self.inner.credential.as_ref())
            .await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("transport", &self.inner.transport)
            .field(
                "provenance",
                &self.inner.credential.as_ref().map(Credential::provenance),
            )
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod wiremock_tests {
    use std::time::Duration;

    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{ErrorKind, Provenance, RetryConfig};

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig::builder()
            .base_url(server.uri())
            .timeout(Duration::from_secs(5))
            .retry(RetryConfig::disabled())
            .build()
    }

    #[tokio::test]
    async fn test_fetch_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/truckers"))
            .and(query_param("fields[truckers]", "company-name"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": [{"id": "1", "type": "truckers", "attributes": {"company-name": "Haul Co"}}]}"#,
            ))
            .mount(&server)
            .await;

        let client = ApiClient::new(
            &config(&server),
            Some(Credential::new("tok", Provenance::Explicit)),
        )
        .unwrap();
        assert!(client.is_authenticated());

        let doc = client
            .fetch_collection("/v1/truckers", &Query::new().fields("truckers", ["company-name"]))
            .await
            .unwrap();
        assert_eq!(doc.resources()[0].attributes().string("company-name"), "Haul Co");
    }

    #[tokio::test]
    async fn test_fetch_single_shape_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server), None).unwrap();
        let err = client
            .fetch_single("/v1/truckers/1", &Query::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(err.body(), Some(r#"{"data": []}"#));
    }

    #[test]
    fn test_debug_shows_provenance_only() {
        let config = ClientConfig::builder().base_url("https://app.example.com").build();
        let client =
            ApiClient::new(&config, Some(Credential::new("secret", Provenance::Keychain))).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("Keychain"));
        assert!(!debug.contains("secret"));
    }
}
