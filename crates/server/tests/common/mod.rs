//! Common test utilities for in-process API testing with mocks.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pickbook_core::{
    testing::{MockMetadataProvider, MockPreferenceStore},
    Config,
};

/// Re-export fixtures for test convenience
pub use pickbook_core::testing::fixtures;

/// In-process router backed by controllable mocks.
///
/// The metadata mock knows the Turkish and Greek fixtures; the preference
/// mock starts empty.
pub struct TestFixture {
    pub router: Router,
    pub metadata: Arc<MockMetadataProvider>,
    pub preferences: Arc<MockPreferenceStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    /// Raw body text
    pub text: String,
    /// Body parsed as JSON, `Null` if it is not JSON
    pub body: Value,
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let metadata = Arc::new(MockMetadataProvider::with_metadata(
            fixtures::turkey_metadata(),
        ));
        metadata.set_metadata(fixtures::greece_metadata()).await;
        let preferences = Arc::new(MockPreferenceStore::new());

        let state = Arc::new(pickbook_server::state::AppState::new(
            config,
            Arc::clone(&metadata) as Arc<dyn pickbook_core::CatalogMetadataProvider>,
            Arc::clone(&preferences) as Arc<dyn pickbook_core::PreferenceStore>,
        ));
        let router = pickbook_server::api::create_router(state);

        Self {
            router,
            metadata,
            preferences,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::builder().method("GET").uri(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
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
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
