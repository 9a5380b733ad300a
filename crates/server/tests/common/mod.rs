//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock backends injected, so the HTTP surface can be exercised
//! without touching the network.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use relocator_core::{
    testing::{MockRetriever, MockStorage},
    Config, ImgurConfig, Relocator, RelocatorConfig, Retriever, RetrieverConfig, ServerConfig,
    Storage, StorageBackend, StorageConfig,
};
use relocator_server::state::AppState;

/// Test fixture for E2E testing with mock backends.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_start_job() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/v1/images/upload", json!({
///         "urls": ["https://example.com/a.png"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock retriever - configure content and failures
    pub retriever: MockRetriever,
    /// Mock storage - configure locations and failures
    pub storage: MockStorage,
    /// Relocator behind the router, for waiting on background work
    pub relocator: Arc<Relocator>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test fixture from a custom configuration.
    ///
    /// Backends are always the mocks; the configuration only shapes what
    /// `/v1/config` reports and the relocator settings.
    pub fn with_config(config: Config) -> Self {
        let retriever = MockRetriever::new();
        let storage = MockStorage::new();

        let relocator = Arc::new(Relocator::new(
            config.relocator.clone(),
            Arc::new(retriever.clone()) as Arc<dyn Retriever>,
            Arc::new(storage.clone()) as Arc<dyn Storage>,
        ));

        let state = Arc::new(AppState::new(config, Arc::clone(&relocator)));
        let router = relocator_server::api::create_router(state);

        Self {
            router,
            retriever,
            storage,
            relocator,
        }
    }

    /// Wait until every job started so far has committed.
    pub async fn wait_idle(&self) {
        self.relocator.wait_idle().await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body, "application/json").await
    }

    /// Send a POST request with custom content type (for testing wrong content types).
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        self.request_raw("POST", path, body, content_type).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Default fixture configuration: stub backends, local address.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 0, // Not used for in-process testing
        },
        retriever: RetrieverConfig::default(),
        storage: StorageConfig {
            backend: StorageBackend::Stub,
            imgur: None,
        },
        relocator: RelocatorConfig::default(),
    }
}

/// Configuration carrying an Imgur section, for redaction checks.
pub fn imgur_config(client_id: &str) -> Config {
    Config {
        storage: StorageConfig {
            backend: StorageBackend::Imgur,
            imgur: Some(ImgurConfig::new(client_id)),
        },
        ..test_config()
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
