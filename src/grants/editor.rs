//! Grant editor
//!
//! Adds, removes and re-privileges grants on one resource. The local cache is updated only
//! after the server confirms each call, so a rejected request never shows up as a grant.

use super::cache::{GrantCache, GrantEvent};
use super::candidates::{Candidate, CandidateDirectory};
use super::form::GrantForm;
use super::ordering::{PrivilegePrecedence, sort_grants};
use super::resource::parent_resource;
use crate::sdk::api::GrantApi;
use crate::sdk::types::{CreateGrantRequest, Grant, GrantQuery, GrantSubject, Id};
use crate::utils::error::{ConsoleError, Result};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why an action did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No subject picked in the form
    NothingSelected,
    PrivilegeNotAllowed,
    /// The same subject, privilege and resource already exist
    Duplicate,
    /// New privilege equals the current one
    Unchanged,
    /// Unknown id, or a grant inherited from the parent resource
    NotEditable,
    /// The same action is still waiting for the server
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Created(Grant),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Id),
    Skipped(SkipReason),
}

#[derive(Debug)]
pub enum PrivilegeChange {
    /// Both the create and the delete succeeded
    Replaced { old: Id, new: Grant },
    /// The new grant exists but the old one could not be deleted. Until
    /// `GrantEditor::retry_cleanup` succeeds the subject holds both grants.
    Partial {
        created: Grant,
        stale: Id,
        error: ConsoleError,
    },
    Skipped(SkipReason),
}

/// One row of the grant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRow {
    pub id: Id,
    pub subject: GrantSubject,
    /// Resolved display name, or the subject id when unknown
    pub subject_name: String,
    pub privilege: String,
    pub resource: String,
    pub inherited: bool,
}

/// Marks an action key busy until dropped
struct InFlight<'a> {
    keys: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.keys.lock().remove(&self.key);
    }
}

pub struct GrantEditor<A: GrantApi + ?Sized> {
    api: Arc<A>,
    resource: String,
    precedence: PrivilegePrecedence,
    cache: Mutex<GrantCache>,
    form: Mutex<GrantForm>,
    in_flight: Mutex<HashSet<String>>,
    /// Old grants left behind by a half-finished privilege change
    stale: Mutex<Vec<Id>>,
}

impl<A: GrantApi + ?Sized> GrantEditor<A> {
    /// `allowed` lists the privileges this resource kind supports, default first
    pub fn new(
        api: Arc<A>,
        resource: impl Into<String>,
        allowed: Vec<String>,
        precedence: PrivilegePrecedence,
    ) -> Self {
        Self {
            api,
            resource: resource.into(),
            precedence,
            cache: Mutex::new(GrantCache::new()),
            form: Mutex::new(GrantForm::new(allowed)),
            in_flight: Mutex::new(HashSet::new()),
            stale: Mutex::new(Vec::new()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Snapshot of the resource's own grants
    pub fn grants(&self) -> Vec<Grant> {
        self.cache.lock().grants().to_vec()
    }

    /// Snapshot of grants inherited from the parent resource
    pub fn inherited(&self) -> Vec<Grant> {
        self.cache.lock().inherited().to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Ids of old grants a privilege change failed to delete
    pub fn pending_cleanup(&self) -> Vec<Id> {
        self.stale.lock().clone()
    }

    /// Run `f` against the form state
    pub fn with_form<R>(&self, f: impl FnOnce(&mut GrantForm) -> R) -> R {
        f(&mut self.form.lock())
    }

    fn begin(&self, key: String) -> Option<InFlight<'_>> {
        if self.in_flight.lock().insert(key.clone()) {
            Some(InFlight {
                keys: &self.in_flight,
                key,
            })
        } else {
            None
        }
    }

    /// Reload the resource's grants and, for child resources, the parent's grants
    pub async fn refresh(&self) -> Result<()> {
        let grants = self
            .api
            .list_grants(GrantQuery::for_resource(self.resource.clone()))
            .await?;

        let inherited = match parent_resource(&self.resource) {
            Some(parent) => self.api.list_grants(GrantQuery::for_resource(parent)).await?,
            None => Vec::new(),
        };

        debug!(
            "Loaded {} grants and {} inherited grants for {}",
            grants.len(),
            inherited.len(),
            self.resource
        );

        let mut cache = self.cache.lock();
        cache.apply(GrantEvent::Loaded(grants));
        cache.apply(GrantEvent::InheritedLoaded(inherited));
        Ok(())
    }

    /// Candidates for the subject picker: the form's query, minus subjects that already hold
    /// a grant here and the one currently selected
    pub fn candidates(&self, directory: &CandidateDirectory) -> Vec<Candidate> {
        let cache = self.cache.lock();
        let form = self.form.lock();

        let mut excluded = cache.subject_ids();
        if let Some(selected) = form.selected() {
            excluded.insert(selected.id.as_str());
        }

        directory.filter(form.query(), &excluded)
    }

    /// Submit the form. On success the form is reset.
    pub async fn submit(&self) -> Result<AddOutcome> {
        let pending = self.with_form(|form| {
            let subject = form.selected()?.subject();
            let privilege = form.privilege()?.to_string();
            Some((subject, privilege))
        });

        let Some((subject, privilege)) = pending else {
            return Ok(AddOutcome::Skipped(SkipReason::NothingSelected));
        };

        let outcome = self.add(subject, &privilege).await?;
        if matches!(outcome, AddOutcome::Created(_)) {
            self.form.lock().reset();
        }
        Ok(outcome)
    }

    /// Grant `privilege` on this resource to `subject`
    pub async fn add(&self, subject: GrantSubject, privilege: &str) -> Result<AddOutcome> {
        if !self.form.lock().allows(privilege) {
            return Ok(AddOutcome::Skipped(SkipReason::PrivilegeNotAllowed));
        }

        // Checked while holding the slot so a create that just finished is visible
        let Some(_busy) = self.begin(format!("add:{}", subject)) else {
            return Ok(AddOutcome::Skipped(SkipReason::InFlight));
        };

        let duplicate = self
            .cache
            .lock()
            .find_assignment(&subject, privilege, &self.resource)
            .is_some();
        if duplicate {
            debug!("{} already has {} on {}", subject, privilege, self.resource);
            return Ok(AddOutcome::Skipped(SkipReason::Duplicate));
        }

        let request = CreateGrantRequest::new(subject, privilege, self.resource.clone());
        let grant = self.api.create_grant(request).await.map_err(|e| {
            warn!("Failed to create grant on {}: {}", self.resource, e);
            e
        })?;

        info!("Granted {} on {} as {}", grant.subject, grant.resource, grant.id);
        self.cache.lock().apply(GrantEvent::Added(grant.clone()));
        Ok(AddOutcome::Created(grant))
    }

    /// Delete one of this resource's own grants
    pub async fn remove(&self, id: &str) -> Result<RemoveOutcome> {
        let Some(_busy) = self.begin(id.to_string()) else {
            return Ok(RemoveOutcome::Skipped(SkipReason::InFlight));
        };

        if !self.cache.lock().contains(id) {
            return Ok(RemoveOutcome::Skipped(SkipReason::NotEditable));
        }

        self.api.delete_grant(id.to_string()).await.map_err(|e| {
            warn!("Failed to delete grant {}: {}", id, e);
            e
        })?;

        info!("Removed grant {} from {}", id, self.resource);
        self.cache.lock().apply(GrantEvent::Removed(id.to_string()));
        Ok(RemoveOutcome::Removed(id.to_string()))
    }

    /// Move a grant to another privilege.
    ///
    /// There is no update call: the new grant is created first and the old one deleted after.
    pub async fn change_privilege(&self, id: &str, privilege: &str) -> Result<PrivilegeChange> {
        let Some(_busy) = self.begin(id.to_string()) else {
            return Ok(PrivilegeChange::Skipped(SkipReason::InFlight));
        };

        let current = self.cache.lock().get(id).cloned();
        let Some(current) = current else {
            return Ok(PrivilegeChange::Skipped(SkipReason::NotEditable));
        };

        if current.privilege == privilege {
            return Ok(PrivilegeChange::Skipped(SkipReason::Unchanged));
        }
        if !self.form.lock().allows(privilege) {
            return Ok(PrivilegeChange::Skipped(SkipReason::PrivilegeNotAllowed));
        }

        let duplicate = self
            .cache
            .lock()
            .find_assignment(&current.subject, privilege, &current.resource)
            .is_some();
        if duplicate {
            return Ok(PrivilegeChange::Skipped(SkipReason::Duplicate));
        }

        let created = self
            .api
            .create_grant(CreateGrantRequest::from_grant(&current, privilege))
            .await
            .map_err(|e| {
                warn!("Failed to create replacement for grant {}: {}", current.id, e);
                e
            })?;

        match self.api.delete_grant(current.id.clone()).await {
            Ok(()) => {
                info!(
                    "Changed {} on {} from {} to {}",
                    current.subject, self.resource, current.privilege, privilege
                );
                self.cache.lock().apply(GrantEvent::Replaced {
                    old: current.id.clone(),
                    new: created.clone(),
                });
                Ok(PrivilegeChange::Replaced {
                    old: current.id,
                    new: created,
                })
            }
            Err(error) => {
                warn!(
                    "Created grant {} but could not delete {}; {} now holds both: {}",
                    created.id, current.id, current.subject, error
                );
                self.cache.lock().apply(GrantEvent::Added(created.clone()));
                self.stale.lock().push(current.id.clone());
                Ok(PrivilegeChange::Partial {
                    created,
                    stale: current.id,
                    error,
                })
            }
        }
    }

    /// Retry deleting grants left behind by partial privilege changes.
    ///
    /// Returns how many were cleaned up, or the last error if any delete failed again.
    pub async fn retry_cleanup(&self) -> Result<usize> {
        let pending = self.pending_cleanup();
        let mut cleaned = 0;
        let mut last_error = None;

        for id in pending {
            match self.api.delete_grant(id.clone()).await {
                Ok(()) => {
                    self.cache.lock().apply(GrantEvent::Removed(id.clone()));
                    self.stale.lock().retain(|s| s != &id);
                    cleaned += 1;
                }
                Err(e) => {
                    warn!("Cleanup of grant {} failed again: {}", id, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(cleaned),
        }
    }

    /// Display rows: own grants first, then inherited ones, each in display order
    pub fn rows(&self, directory: &CandidateDirectory) -> Vec<GrantRow> {
        let (mut own, mut inherited) = {
            let cache = self.cache.lock();
            (cache.grants().to_vec(), cache.inherited().to_vec())
        };

        let name_of = |subject: &GrantSubject| directory.display_name(subject);
        sort_grants(&mut own, &self.precedence, name_of);
        sort_grants(&mut inherited, &self.precedence, name_of);

        let row = |grant: Grant, inherited: bool| GrantRow {
            subject_name: directory
                .display_name(&grant.subject)
                .unwrap_or(grant.subject.id())
                .to_string(),
            id: grant.id,
            subject: grant.subject,
            privilege: grant.privilege,
            resource: grant.resource,
            inherited,
        };

        own.into_iter()
            .map(|g| row(g, false))
            .chain(inherited.into_iter().map(|g| row(g, true)))
            .collect()
    }
}
