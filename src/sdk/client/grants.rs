//! Grant endpoints

use super::client::ConsoleClient;
use crate::sdk::api::GrantApi;
use crate::sdk::types::{CreateGrantRequest, Grant, GrantQuery, Id, ListResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::{debug, info};

#[async_trait]
impl GrantApi for ConsoleClient {
    async fn list_grants(&self, query: GrantQuery) -> Result<Vec<Grant>> {
        let query = match query.limit {
            Some(_) => query,
            None => query.limit(self.list_limit),
        };

        let url = self.endpoint("api/grants")?;
        let request = self.http_client.get(url).query(&query.to_pairs());

        let response: ListResponse<Grant> = self.send_json(request).await?;
        debug!(
            "Listed {} grants for resource {:?}",
            response.items.len(),
            query.resource
        );
        Ok(response.items)
    }

    async fn create_grant(&self, request: CreateGrantRequest) -> Result<Grant> {
        let url = self.endpoint("api/grants")?;
        let grant: Grant = self
            .send_json(self.http_client.post(url).json(&request))
            .await?;

        info!(
            grant = %grant.id,
            subject = %grant.subject,
            privilege = %grant.privilege,
            resource = %grant.resource,
            "Created grant"
        );
        Ok(grant)
    }

    async fn delete_grant(&self, id: Id) -> Result<()> {
        let url = self.item_endpoint("api/grants", &id)?;
        self.send_empty(self.http_client.delete(url)).await?;

        info!(grant = %id, "Deleted grant");
        Ok(())
    }
}
