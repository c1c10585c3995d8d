//! Configuration validation

use super::models::{AccessConfig, ApiConfig};
use crate::auth::NavigationManifest;
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// The API server must be an absolute http(s) URL with a host
pub fn validate_server_url(server: &str) -> Result<(), String> {
    let url = Url::parse(server).map_err(|e| format!("Invalid server URL {}: {}", server, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "Server URL must use http:// or https://, got: {}",
                scheme
            ));
        }
    }

    if url.host_str().is_none() {
        return Err(format!("Server URL has no host: {}", server));
    }

    Ok(())
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating API configuration");

        validate_server_url(&self.server)?;

        if self.timeout == 0 {
            return Err("API timeout must be greater than 0".to_string());
        }

        if self.list_limit == 0 {
            return Err("List limit must be greater than 0".to_string());
        }

        if let Some(key) = &self.access_key {
            if key.trim().is_empty() {
                return Err("Access key cannot be blank".to_string());
            }
        }

        if self.skip_tls_verify {
            warn!("skip_tls_verify is enabled; server certificates will not be checked");
        }

        Ok(())
    }
}

impl Validate for NavigationManifest {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating navigation manifest");

        for route in [&self.login_route, &self.default_route] {
            if !route.starts_with('/') {
                return Err(format!("Route must be absolute: {}", route));
            }
        }

        let mut paths = HashSet::new();
        for entry in &self.routes {
            if !entry.path.starts_with('/') {
                return Err(format!("Route must be absolute: {}", entry.path));
            }
            if !paths.insert(entry.path.as_str()) {
                return Err(format!("Duplicate route: {}", entry.path));
            }
            if entry.public && entry.requires_admin {
                return Err(format!(
                    "Route {} cannot be both public and admin-only",
                    entry.path
                ));
            }
        }

        // Redirect targets must be reachable by the viewers sent there
        if !self
            .route_for(&self.login_route)
            .is_some_and(|entry| entry.public)
        {
            return Err(format!("Login route {} must be public", self.login_route));
        }

        if self
            .route_for(&self.default_route)
            .is_some_and(|entry| entry.requires_admin)
        {
            return Err(format!(
                "Default route {} cannot require admin",
                self.default_route
            ));
        }

        if self.local_provider.is_empty() {
            return Err("Local provider name cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for AccessConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating access configuration");

        if self.admin_resource.is_empty() {
            return Err("Admin resource cannot be empty".to_string());
        }

        if self.admin_privilege.is_empty() {
            return Err("Admin privilege cannot be empty".to_string());
        }

        let precedence = self.privilege_precedence.privileges();
        if precedence.is_empty() {
            return Err("Privilege precedence cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for privilege in precedence {
            if !seen.insert(privilege.as_str()) {
                return Err(format!("Duplicate privilege in precedence: {}", privilege));
            }
        }

        let mut allowed = HashSet::new();
        for privilege in &self.allowed_privileges {
            if privilege.is_empty() {
                return Err("Allowed privileges cannot contain an empty name".to_string());
            }
            if !allowed.insert(privilege.as_str()) {
                return Err(format!("Duplicate allowed privilege: {}", privilege));
            }
        }

        Ok(())
    }
}
