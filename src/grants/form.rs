//! Input state of the add-grant form

use super::candidates::Candidate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantForm {
    allowed: Vec<String>,
    query: String,
    selected: Option<Candidate>,
    privilege: Option<String>,
}

impl GrantForm {
    /// An empty `allowed` set accepts any privilege and has no default
    pub fn new(allowed: Vec<String>) -> Self {
        let privilege = allowed.first().cloned();
        Self {
            allowed,
            query: String::new(),
            selected: None,
            privilege,
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Replace the allowed privileges; the selected privilege falls back to the new default
    pub fn set_allowed(&mut self, allowed: Vec<String>) {
        self.privilege = allowed.first().cloned();
        self.allowed = allowed;
    }

    pub fn allows(&self, privilege: &str) -> bool {
        if self.allowed.is_empty() {
            !privilege.is_empty()
        } else {
            self.allowed.iter().any(|p| p == privilege)
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, candidate: Candidate) {
        self.selected = Some(candidate);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn privilege(&self) -> Option<&str> {
        self.privilege.as_deref()
    }

    /// Returns false and leaves the form untouched when the privilege is not allowed
    pub fn set_privilege(&mut self, privilege: &str) -> bool {
        if !self.allows(privilege) {
            return false;
        }
        self.privilege = Some(privilege.to_string());
        true
    }

    /// The submit control is disabled until a subject and a privilege are chosen
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && self.privilege.is_some()
    }

    /// Back to the initial state after a successful submit
    pub fn reset(&mut self) {
        self.query.clear();
        self.selected = None;
        self.privilege = self.allowed.first().cloned();
    }
}
