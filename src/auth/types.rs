//! Gate type definitions

use crate::sdk::types::Session;
use serde::{Deserialize, Serialize};

/// One entry of the navigation manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route prefix, e.g. `/users`
    pub path: String,
    /// Only administrators may view this route
    #[serde(default)]
    pub requires_admin: bool,
    /// Viewable without a session (login, signup)
    #[serde(default)]
    pub public: bool,
    /// Non-admins signed in through the local identity provider may view it too
    #[serde(default)]
    pub local_users_allowed: bool,
}

impl RouteEntry {
    /// Protected route open to any signed-in viewer
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_admin: false,
            public: false,
            local_users_allowed: false,
        }
    }

    pub fn admin(path: impl Into<String>) -> Self {
        Self {
            requires_admin: true,
            ..Self::new(path)
        }
    }

    pub fn public(path: impl Into<String>) -> Self {
        Self {
            public: true,
            ..Self::new(path)
        }
    }

    pub fn with_local_users(mut self) -> Self {
        self.local_users_allowed = true;
        self
    }

    fn prefix(&self) -> &str {
        match self.path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        }
    }

    /// Segment-aware prefix match: `/users` matches `/users` and `/users/42`, not `/usersx`.
    /// The root entry only matches `/` itself.
    pub fn matches(&self, path: &str) -> bool {
        let path = strip_query(path);
        let prefix = self.prefix();

        if prefix == "/" {
            return path == "/";
        }

        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Drop any query string or fragment from a route path
pub(crate) fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Static description of the console's routes and redirect targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationManifest {
    /// Where anonymous viewers are sent
    #[serde(default = "default_login_route")]
    pub login_route: String,
    /// Where viewers lacking privilege are sent
    #[serde(default = "default_default_route")]
    pub default_route: String,
    /// Identity provider whose users count as local accounts
    #[serde(default = "default_local_provider")]
    pub local_provider: String,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteEntry>,
}

impl Default for NavigationManifest {
    fn default() -> Self {
        Self {
            login_route: default_login_route(),
            default_route: default_default_route(),
            local_provider: default_local_provider(),
            routes: default_routes(),
        }
    }
}

impl NavigationManifest {
    /// The most specific entry covering `path`, if any
    pub fn route_for(&self, path: &str) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .filter(|entry| entry.matches(path))
            .max_by_key(|entry| entry.prefix().len())
    }

    /// Routes a viewer may see, in manifest order. Used to build menus.
    pub fn visible_routes<'a>(&'a self, viewer: &'a Viewer) -> impl Iterator<Item = &'a RouteEntry> {
        self.routes
            .iter()
            .filter(move |entry| !entry.public && viewer.may_view(entry, &self.local_provider))
    }
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_default_route() -> String {
    "/".to_string()
}

fn default_local_provider() -> String {
    "infra".to_string()
}

fn default_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::public("/login"),
        RouteEntry::public("/signup"),
        RouteEntry::new("/destinations"),
        RouteEntry::admin("/providers"),
        RouteEntry::admin("/groups"),
        RouteEntry::admin("/users"),
        RouteEntry::admin("/settings"),
        RouteEntry::admin("/account").with_local_users(),
    ]
}

/// A resolved, signed-in viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub session: Session,
    /// Holds the admin privilege on the whole-system resource
    pub is_admin: bool,
}

impl Viewer {
    pub fn new(session: Session, is_admin: bool) -> Self {
        Self { session, is_admin }
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn name(&self) -> &str {
        &self.session.name
    }

    pub fn signed_in_with(&self, provider: &str) -> bool {
        self.session.provider_names.iter().any(|p| p == provider)
    }

    /// Whether this viewer satisfies the route's privilege requirement
    pub fn may_view(&self, entry: &RouteEntry, local_provider: &str) -> bool {
        if !entry.requires_admin || self.is_admin {
            return true;
        }
        entry.local_users_allowed && self.signed_in_with(local_provider)
    }
}

/// What the console knows about the current viewer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not resolved yet
    #[default]
    Loading,
    /// No session, or the session could not be fetched
    Anonymous,
    Authenticated(Viewer),
}

impl SessionState {
    pub fn viewer(&self) -> Option<&Viewer> {
        match self {
            SessionState::Authenticated(viewer) => Some(viewer),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// Outcome of gating one route render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Session unresolved: render nothing, navigate nowhere
    Loading,
    /// Render nothing and replace the current location with the target
    Redirecting(String),
    /// Render the route
    Authorized,
}

impl GateState {
    pub fn should_render(&self) -> bool {
        matches!(self, GateState::Authorized)
    }
}
