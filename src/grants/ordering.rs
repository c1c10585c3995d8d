//! Display ordering for grants

use crate::sdk::types::{Grant, GrantSubject};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Privileges from most to least powerful
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivilegePrecedence(Vec<String>);

impl PrivilegePrecedence {
    pub fn new<I, S>(privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(privileges.into_iter().map(Into::into).collect())
    }

    pub fn privileges(&self) -> &[String] {
        &self.0
    }

    /// Position in the precedence list; unknown privileges rank after every known one
    pub fn rank(&self, privilege: &str) -> usize {
        self.0
            .iter()
            .position(|p| p == privilege)
            .unwrap_or(self.0.len())
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b))
    }

    /// Sort privileges in place, most powerful first
    pub fn sort(&self, privileges: &mut [String]) {
        privileges.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for PrivilegePrecedence {
    fn default() -> Self {
        Self::new(["admin", "edit", "view"])
    }
}

/// Sort grants by privilege precedence, then users before groups, then subject name, then id.
///
/// `name_of` resolves a subject's display name; unresolved subjects sort by id.
pub fn sort_grants<'a, F>(grants: &mut [Grant], precedence: &PrivilegePrecedence, name_of: F)
where
    F: Fn(&GrantSubject) -> Option<&'a str>,
{
    grants.sort_by(|a, b| {
        precedence
            .compare(&a.privilege, &b.privilege)
            .then_with(|| a.subject.kind().cmp(&b.subject.kind()))
            .then_with(|| {
                let a_name = name_of(&a.subject).unwrap_or(a.subject.id());
                let b_name = name_of(&b.subject).unwrap_or(b.subject.id());
                a_name.cmp(b_name)
            })
            .then_with(|| a.id.cmp(&b.id))
    });
}
