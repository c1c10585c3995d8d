//! Application-level session store
//!
//! Starts in `Loading`, is populated by `refresh` (app start, after login) and is cleared by
//! `logout`. Clones share the same state, so one store can be handed to every view.

use super::types::{SessionState, Viewer};
use crate::sdk::api::{GrantApi, SessionApi};
use crate::sdk::types::{GrantQuery, Session};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which grant makes a viewer an administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRule {
    /// The resource representing the whole system
    pub resource: String,
    pub privilege: String,
}

impl Default for AdminRule {
    fn default() -> Self {
        Self {
            resource: "infra".to_string(),
            privilege: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    admin_rule: AdminRule,
}

impl SessionStore {
    pub fn new(admin_rule: AdminRule) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Loading)),
            admin_rule,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.state.read().viewer().cloned()
    }

    /// Mark the session unresolved, e.g. while a login completes
    pub fn begin_loading(&self) {
        *self.state.write() = SessionState::Loading;
    }

    /// Fetch the session and the viewer's admin status.
    ///
    /// Any failure to fetch the session is treated as anonymous and never surfaced.
    pub async fn refresh<A>(&self, api: &A) -> SessionState
    where
        A: SessionApi + GrantApi + ?Sized,
    {
        let next = match api.fetch_session().await {
            Ok(session) => {
                let is_admin = self.check_admin(api, &session).await;
                info!(
                    "Session resolved for {} (admin: {})",
                    session.name, is_admin
                );
                SessionState::Authenticated(Viewer::new(session, is_admin))
            }
            Err(e) => {
                debug!("No session, continuing anonymously: {}", e);
                SessionState::Anonymous
            }
        };

        *self.state.write() = next.clone();
        next
    }

    async fn check_admin<A>(&self, api: &A, session: &Session) -> bool
    where
        A: GrantApi + ?Sized,
    {
        let query = GrantQuery::for_resource(self.admin_rule.resource.clone())
            .user(session.id.clone())
            .privilege(self.admin_rule.privilege.clone())
            .show_inherited(true);

        match api.list_grants(query).await {
            Ok(grants) => grants.iter().any(|g| {
                g.resource == self.admin_rule.resource && g.privilege == self.admin_rule.privilege
            }),
            Err(e) => {
                warn!("Admin lookup failed for {}, assuming non-admin: {}", session.id, e);
                false
            }
        }
    }

    /// Forget the session
    pub fn clear(&self) {
        *self.state.write() = SessionState::Anonymous;
    }

    /// End the session server-side and clear it locally.
    ///
    /// The local session is cleared even when the API call fails.
    pub async fn logout<A>(&self, api: &A)
    where
        A: SessionApi + ?Sized,
    {
        if let Err(e) = api.logout().await {
            warn!("Logout request failed: {}", e);
        }
        self.clear();
        info!("Session cleared");
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(AdminRule::default())
    }
}
