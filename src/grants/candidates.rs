//! Candidate subjects for a new grant

use crate::sdk::api::DirectoryApi;
use crate::sdk::types::{GrantSubject, Group, Id, SubjectKind, User};
use crate::utils::error::Result;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A user or group offered in the subject picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: Id,
    pub name: String,
    pub kind: SubjectKind,
}

impl Candidate {
    pub fn subject(&self) -> GrantSubject {
        match self.kind {
            SubjectKind::User => GrantSubject::User(self.id.clone()),
            SubjectKind::Group => GrantSubject::Group(self.id.clone()),
        }
    }
}

impl From<&User> for Candidate {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            kind: SubjectKind::User,
        }
    }
}

impl From<&Group> for Candidate {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            kind: SubjectKind::Group,
        }
    }
}

/// Users then groups whose name contains `query` (case-insensitive), minus `excluded` ids.
/// Insertion order is kept; there is no ranking.
pub fn filter_candidates(
    users: &[User],
    groups: &[Group],
    query: &str,
    excluded: &HashSet<&str>,
) -> Vec<Candidate> {
    let query = query.to_lowercase();

    users
        .iter()
        .map(Candidate::from)
        .chain(groups.iter().map(Candidate::from))
        .filter(|c| c.name.to_lowercase().contains(&query))
        .filter(|c| !excluded.contains(c.id.as_str()))
        .collect()
}

/// Users and groups fetched from the API, refreshed on demand
#[derive(Debug, Clone, Default)]
pub struct CandidateDirectory {
    users: Vec<User>,
    groups: Vec<Group>,
}

impl CandidateDirectory {
    pub fn new(users: Vec<User>, groups: Vec<Group>) -> Self {
        Self { users, groups }
    }

    /// Re-fetch both collections.
    ///
    /// A collection whose fetch fails keeps its previous contents; the first error is returned.
    pub async fn refresh<D>(&mut self, api: &D) -> Result<()>
    where
        D: DirectoryApi + ?Sized,
    {
        let (users, groups) = tokio::join!(api.list_users(), api.list_groups());
        let mut first_error = None;

        match users {
            Ok(users) => self.users = users,
            Err(e) => {
                warn!("Failed to refresh users: {}", e);
                first_error = Some(e);
            }
        }

        match groups {
            Ok(groups) => self.groups = groups,
            Err(e) => {
                warn!("Failed to refresh groups: {}", e);
                first_error = first_error.or(Some(e));
            }
        }

        debug!(
            "Directory holds {} users and {} groups",
            self.users.len(),
            self.groups.len()
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn filter(&self, query: &str, excluded: &HashSet<&str>) -> Vec<Candidate> {
        filter_candidates(&self.users, &self.groups, query, excluded)
    }

    /// Display name for a grant subject
    pub fn display_name(&self, subject: &GrantSubject) -> Option<&str> {
        match subject {
            GrantSubject::User(id) => self
                .users
                .iter()
                .find(|u| &u.id == id)
                .map(|u| u.name.as_str()),
            GrantSubject::Group(id) => self
                .groups
                .iter()
                .find(|g| &g.id == id)
                .map(|g| g.name.as_str()),
        }
    }

    /// Exact, case-insensitive name lookup; users are preferred over groups
    pub fn find_by_name(&self, name: &str) -> Option<Candidate> {
        let name = name.to_lowercase();
        self.users
            .iter()
            .find(|u| u.name.to_lowercase() == name)
            .map(Candidate::from)
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|g| g.name.to_lowercase() == name)
                    .map(Candidate::from)
            })
    }
}
