//! Common test utilities for infra-console
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{TestApi, fixtures};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let api = TestApi::start().await;
//!     api.mock_session(fixtures::user("u1", "ann@example.com")).await;
//!     let client = api.client();
//!     // ...
//! }
//! ```

pub mod fixtures;

use infra_console::ConsoleClient;
use infra_console::config::ApiConfig;
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_KEY: &str = "test.access-key";

/// Mock access-management API
pub struct TestApi {
    pub server: MockServer,
}

impl TestApi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            server: self.server.uri(),
            access_key: Some(ACCESS_KEY.to_string()),
            timeout: 5,
            ..Default::default()
        }
    }

    pub fn client(&self) -> ConsoleClient {
        ConsoleClient::new(&self.config()).expect("client for mock server")
    }

    pub async fn mock_session(&self, user: Value) {
        Mock::given(method("GET"))
            .and(path("/api/users/self"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.server)
            .await;
    }

    /// `GET /api/grants?resource=...` returning `items`
    pub async fn mock_grants(&self, resource: &str, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/grants"))
            .and(query_param("resource", resource))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::list(items)))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_directory(&self, users: Vec<Value>, groups: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::list(users)))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/groups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::list(groups)))
            .mount(&self.server)
            .await;
    }
}
