//! Session/role gate
//!
//! `decide` is a pure function from (session, path, manifest) to a `GateState`.
//! `Gate` applies that decision, issuing the redirect through a `Navigator`.

use super::types::{GateState, NavigationManifest, SessionState};
use tracing::{debug, info};

/// Client-side navigation
pub trait Navigator: Send + Sync {
    /// Replace the current location; back-navigation must not return to it
    fn replace(&self, target: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn replace(&self, target: &str) {
        self(target)
    }
}

/// Decide whether `path` may render for the given session.
///
/// Anonymous viewers are sent to the login route before any privilege check, so an
/// anonymous visit to an admin route lands on login rather than the default route.
pub fn decide(session: &SessionState, path: &str, manifest: &NavigationManifest) -> GateState {
    let viewer = match session {
        SessionState::Loading => return GateState::Loading,
        SessionState::Anonymous => None,
        SessionState::Authenticated(viewer) => Some(viewer),
    };

    let entry = manifest.route_for(path);
    if entry.is_some_and(|e| e.public) {
        return GateState::Authorized;
    }

    let Some(viewer) = viewer else {
        return GateState::Redirecting(manifest.login_route.clone());
    };

    match entry {
        Some(entry) if !viewer.may_view(entry, &manifest.local_provider) => {
            GateState::Redirecting(manifest.default_route.clone())
        }
        _ => GateState::Authorized,
    }
}

/// Applies gate decisions on every route change
pub struct Gate<N: Navigator> {
    manifest: NavigationManifest,
    navigator: N,
    /// (path, target) of the redirect already issued
    last_redirect: Option<(String, String)>,
}

impl<N: Navigator> Gate<N> {
    pub fn new(manifest: NavigationManifest, navigator: N) -> Self {
        Self {
            manifest,
            navigator,
            last_redirect: None,
        }
    }

    pub fn manifest(&self) -> &NavigationManifest {
        &self.manifest
    }

    /// Evaluate `path` against the current session and navigate if needed.
    ///
    /// Returns the decision; children render only for `GateState::Authorized`.
    pub fn evaluate(&mut self, path: &str, session: &SessionState) -> GateState {
        let state = decide(session, path, &self.manifest);

        match &state {
            GateState::Redirecting(target) => {
                let issued = self
                    .last_redirect
                    .as_ref()
                    .is_some_and(|(p, t)| p == path && t == target);

                if !issued {
                    info!("Redirecting {} to {}", path, target);
                    self.navigator.replace(target);
                    self.last_redirect = Some((path.to_string(), target.clone()));
                }
            }
            GateState::Loading => debug!("Session unresolved, holding render of {}", path),
            GateState::Authorized => self.last_redirect = None,
        }

        state
    }
}
