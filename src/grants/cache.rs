//! Local mirror of one resource's grants
//!
//! The cache only changes through `GrantEvent`s, each applied after the server confirmed the
//! corresponding call. Every event is keyed by grant id.

use crate::sdk::types::{Grant, GrantSubject, Id};
use std::collections::HashSet;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantEvent {
    /// Fresh listing of the resource's own grants
    Loaded(Vec<Grant>),
    /// Fresh listing of grants inherited from the parent resource
    InheritedLoaded(Vec<Grant>),
    Added(Grant),
    Removed(Id),
    Replaced { old: Id, new: Grant },
}

#[derive(Debug, Clone, Default)]
pub struct GrantCache {
    grants: Vec<Grant>,
    inherited: Vec<Grant>,
}

impl GrantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: GrantEvent) {
        trace!("Applying {:?}", event);
        match event {
            GrantEvent::Loaded(grants) => self.grants = grants,
            GrantEvent::InheritedLoaded(grants) => self.inherited = grants,
            GrantEvent::Added(grant) => self.insert(grant),
            GrantEvent::Removed(id) => self.grants.retain(|g| g.id != id),
            GrantEvent::Replaced { old, new } => {
                self.grants.retain(|g| g.id != old);
                self.insert(new);
            }
        }
    }

    fn insert(&mut self, grant: Grant) {
        if !self.contains(&grant.id) {
            self.grants.push(grant);
        }
    }

    /// Grants defined on the resource itself
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Read-only grants from the parent resource
    pub fn inherited(&self) -> &[Grant] {
        &self.inherited
    }

    pub fn get(&self, id: &str) -> Option<&Grant> {
        self.grants.iter().find(|g| g.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_inherited(&self, id: &str) -> bool {
        self.inherited.iter().any(|g| g.id == id)
    }

    pub fn find_assignment(
        &self,
        subject: &GrantSubject,
        privilege: &str,
        resource: &str,
    ) -> Option<&Grant> {
        self.grants
            .iter()
            .find(|g| g.same_assignment(subject, privilege, resource))
    }

    /// Ids of every subject holding a grant on the resource
    pub fn subject_ids(&self) -> HashSet<&str> {
        self.grants.iter().map(|g| g.subject.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.inherited.is_empty()
    }
}
