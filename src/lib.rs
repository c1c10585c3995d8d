//! # infra-console
//!
//! Console logic for an access-management API: a session/role gate that decides whether a
//! console route may render for the current viewer, and a grant editor that attaches and
//! detaches `{user|group} × {privilege}` grants on a resource.
//!
//! ## Features
//!
//! - **Session gate**: pure redirect decisions over a configurable navigation manifest
//! - **Grant editor**: duplicate-safe add, remove and privilege change with a local cache that
//!   only follows confirmed server responses
//! - **Typed SDK**: a `reqwest` client behind async traits that tests replace with mocks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infra_console::{ConsoleClient, ConsoleConfig, GrantEditor, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConsoleConfig::from_file("config/console.yaml").await?;
//!     let client = Arc::new(ConsoleClient::new(&config.api)?);
//!
//!     let store = SessionStore::new(config.admin_rule());
//!     let state = store.refresh(client.as_ref()).await;
//!     println!("signed in: {}", state.viewer().is_some());
//!
//!     let editor = GrantEditor::new(
//!         client,
//!         "kubernetes.production",
//!         vec!["view".to_string(), "edit".to_string()],
//!         config.access.privilege_precedence.clone(),
//!     );
//!     editor.refresh().await?;
//!     println!("{} grants", editor.grants().len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod grants;
pub mod sdk;
pub mod utils;

// Re-export main types
pub use auth::{Gate, GateState, NavigationManifest, SessionState, SessionStore, decide};
pub use cli::Cli;
pub use config::ConsoleConfig;
pub use grants::{GrantEditor, GrantForm, PrivilegePrecedence};
pub use sdk::ConsoleClient;
pub use utils::error::{ConsoleError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Console build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch
    pub build_time: &'static str,
    /// Short git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

/// Version, build timestamp and git hash baked in by `build.rs`
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert_eq!(info.version, VERSION);
        assert!(!info.git_hash.is_empty());
        assert!(cli::LONG_VERSION.starts_with(VERSION));
    }

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "infra-console");
    }
}
