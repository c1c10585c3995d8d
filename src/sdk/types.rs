//! Wire types for the access-management API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier
pub type Id = String;

/// A user as returned by `/api/users` and `/api/users/self`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub name: String,
    /// Identity providers this user has signed in through
    #[serde(default)]
    pub provider_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// The authenticated viewer's identity
pub type Session = User;

/// A group as returned by `/api/groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    User,
    Group,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKind::User => f.pad("User"),
            SubjectKind::Group => f.pad("Group"),
        }
    }
}

/// Who a grant is for. Exactly one of user or group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GrantSubject {
    User(Id),
    Group(Id),
}

impl GrantSubject {
    pub fn id(&self) -> &str {
        match self {
            GrantSubject::User(id) | GrantSubject::Group(id) => id,
        }
    }

    pub fn kind(&self) -> SubjectKind {
        match self {
            GrantSubject::User(_) => SubjectKind::User,
            GrantSubject::Group(_) => SubjectKind::Group,
        }
    }

    fn from_parts(user: Option<Id>, group: Option<Id>) -> Result<Self, String> {
        let user = user.filter(|id| !id.is_empty());
        let group = group.filter(|id| !id.is_empty());
        match (user, group) {
            (Some(user), None) => Ok(GrantSubject::User(user)),
            (None, Some(group)) => Ok(GrantSubject::Group(group)),
            (Some(_), Some(_)) => Err("grant has both a user and a group".to_string()),
            (None, None) => Err("grant has neither a user nor a group".to_string()),
        }
    }

    fn into_parts(self) -> (Option<Id>, Option<Id>) {
        match self {
            GrantSubject::User(id) => (Some(id), None),
            GrantSubject::Group(id) => (None, Some(id)),
        }
    }
}

impl fmt::Display for GrantSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantSubject::User(id) => write!(f, "user:{}", id),
            GrantSubject::Group(id) => write!(f, "group:{}", id),
        }
    }
}

/// "subject has privilege on resource"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GrantWire", into = "GrantWire")]
pub struct Grant {
    pub id: Id,
    pub subject: GrantSubject,
    pub resource: String,
    pub privilege: String,
    pub created: Option<DateTime<Utc>>,
    pub created_by: Option<Id>,
}

impl Grant {
    /// Same subject, privilege and resource, ignoring id and metadata
    pub fn same_assignment(&self, subject: &GrantSubject, privilege: &str, resource: &str) -> bool {
        &self.subject == subject && self.privilege == privilege && self.resource == resource
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantWire {
    id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<Id>,
    resource: String,
    privilege: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<Id>,
}

impl TryFrom<GrantWire> for Grant {
    type Error = String;

    fn try_from(wire: GrantWire) -> Result<Self, Self::Error> {
        let subject = GrantSubject::from_parts(wire.user, wire.group)
            .map_err(|e| format!("grant {}: {}", wire.id, e))?;
        Ok(Grant {
            id: wire.id,
            subject,
            resource: wire.resource,
            privilege: wire.privilege,
            created: wire.created,
            created_by: wire.created_by,
        })
    }
}

impl From<Grant> for GrantWire {
    fn from(grant: Grant) -> Self {
        let (user, group) = grant.subject.into_parts();
        GrantWire {
            id: grant.id,
            user,
            group,
            resource: grant.resource,
            privilege: grant.privilege,
            created: grant.created,
            created_by: grant.created_by,
        }
    }
}

/// Body of `POST /api/grants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGrantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Id>,
    pub privilege: String,
    pub resource: String,
}

impl CreateGrantRequest {
    pub fn new(
        subject: GrantSubject,
        privilege: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        let (user, group) = subject.into_parts();
        Self {
            user,
            group,
            privilege: privilege.into(),
            resource: resource.into(),
        }
    }

    /// The same grant with a different privilege
    pub fn from_grant(grant: &Grant, privilege: impl Into<String>) -> Self {
        Self::new(grant.subject.clone(), privilege, grant.resource.clone())
    }
}

/// Filters for `GET /api/grants`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantQuery {
    pub resource: Option<String>,
    pub user: Option<Id>,
    pub group: Option<Id>,
    pub privilege: Option<String>,
    pub show_inherited: bool,
    pub limit: Option<u32>,
}

impl GrantQuery {
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Default::default()
        }
    }

    pub fn user(mut self, user: impl Into<Id>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn group(mut self, group: impl Into<Id>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn privilege(mut self, privilege: impl Into<String>) -> Self {
        self.privilege = Some(privilege.into());
        self
    }

    pub fn show_inherited(mut self, show: bool) -> Self {
        self.show_inherited = show;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in a fixed order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(resource) = &self.resource {
            pairs.push(("resource", resource.clone()));
        }
        if let Some(user) = &self.user {
            pairs.push(("user", user.clone()));
        }
        if let Some(group) = &self.group {
            pairs.push(("group", group.clone()));
        }
        if let Some(privilege) = &self.privilege {
            pairs.push(("privilege", privilege.clone()));
        }
        if self.show_inherited {
            pairs.push(("showInherited", "1".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}
