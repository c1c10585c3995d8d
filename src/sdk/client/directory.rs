//! User and group listing

use super::client::ConsoleClient;
use crate::sdk::api::DirectoryApi;
use crate::sdk::types::{Group, ListResponse, User};
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
impl DirectoryApi for ConsoleClient {
    async fn list_users(&self) -> Result<Vec<User>> {
        let url = self.endpoint("api/users")?;
        let request = self
            .http_client
            .get(url)
            .query(&[("limit", self.list_limit)]);

        let response: ListResponse<User> = self.send_json(request).await?;
        debug!("Listed {} users", response.items.len());
        Ok(response.items)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let url = self.endpoint("api/groups")?;
        let request = self
            .http_client
            .get(url)
            .query(&[("limit", self.list_limit)]);

        let response: ListResponse<Group> = self.send_json(request).await?;
        debug!("Listed {} groups", response.items.len());
        Ok(response.items)
    }
}
