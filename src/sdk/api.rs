//! API seams used by the gate and the grant editor
//!
//! `ConsoleClient` implements all three traits; tests substitute mocks.

use crate::sdk::types::{CreateGrantRequest, Grant, GrantQuery, Group, Id, Session, User};
use crate::utils::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Identity of the current viewer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// `GET /api/users/self`
    async fn fetch_session(&self) -> Result<Session>;

    /// `POST /api/logout`
    async fn logout(&self) -> Result<()>;
}

/// Users and groups that can be the subject of a grant
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn list_groups(&self) -> Result<Vec<Group>>;
}

/// Grant collection. There is no update verb.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GrantApi: Send + Sync {
    async fn list_grants(&self, query: GrantQuery) -> Result<Vec<Grant>>;

    /// Returns the grant with its server-assigned id
    async fn create_grant(&self, request: CreateGrantRequest) -> Result<Grant>;

    async fn delete_grant(&self, id: Id) -> Result<()>;
}
