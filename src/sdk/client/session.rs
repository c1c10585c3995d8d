//! Session endpoints

use super::client::ConsoleClient;
use crate::sdk::api::SessionApi;
use crate::sdk::types::Session;
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
impl SessionApi for ConsoleClient {
    async fn fetch_session(&self) -> Result<Session> {
        let url = self.endpoint("api/users/self")?;
        debug!("Fetching session from {}", url);
        self.send_json(self.http_client.get(url)).await
    }

    async fn logout(&self) -> Result<()> {
        let url = self.endpoint("api/logout")?;
        debug!("Logging out via {}", url);
        self.send_empty(self.http_client.post(url)).await
    }
}
