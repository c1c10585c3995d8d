//! Core API client implementation

use crate::config::ApiConfig;
use crate::utils::error::{ConsoleError, Result};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for the access-management API
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    pub(crate) http_client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) access_key: Option<String>,
    pub(crate) list_limit: u32,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl ConsoleClient {
    /// Create new API client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.server)
            .map_err(|e| ConsoleError::config(format!("Invalid server URL: {}", e)))?;

        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .build()
            .map_err(|e| ConsoleError::config(format!("Failed to create HTTP client: {}", e)))?;

        if config.skip_tls_verify {
            warn!("TLS certificate verification is disabled for {}", base_url);
        }

        info!("ConsoleClient created for {}", base_url);

        Ok(Self {
            http_client,
            base_url,
            access_key: config.access_key.clone(),
            list_limit: config.list_limit,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn list_limit(&self) -> u32 {
        self.list_limit
    }

    /// Resolve an API path such as `api/grants` against the server URL
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConsoleError::config(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// URL of one item in a collection. `id` is percent-encoded as a single path segment.
    pub(crate) fn item_endpoint(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|_| ConsoleError::config(format!("Invalid endpoint {}", collection)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| ConsoleError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        debug!("API returned {}: {}", status, message);
        Err(ConsoleError::from_status(status.as_u16(), message))
    }

    /// Send a request and decode the JSON response
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ConsoleError::parse(e.to_string()))
    }

    /// Send a request whose response body is irrelevant
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await?;
        Ok(())
    }
}
