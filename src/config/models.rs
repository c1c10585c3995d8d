//! Configuration data models

use crate::auth::AdminRule;
use crate::grants::PrivilegePrecedence;
use crate::utils::logging::LogLevel;
use serde::{Deserialize, Serialize};

/// Default API server
pub fn default_server() -> String {
    "http://localhost:80".to_string()
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Page size for user, group and grant listings
pub fn default_list_limit() -> u32 {
    1000
}

fn default_admin_resource() -> String {
    "infra".to_string()
}

fn default_admin_privilege() -> String {
    "admin".to_string()
}

/// Connection to the access-management API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_server")]
    pub server: String,
    /// Sent as a bearer token when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    #[serde(default)]
    pub skip_tls_verify: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            access_key: None,
            timeout: default_timeout(),
            list_limit: default_list_limit(),
            skip_tls_verify: false,
        }
    }
}

/// Who counts as an administrator and how privileges are offered and ordered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Resource whose grant makes a viewer an administrator
    #[serde(default = "default_admin_resource")]
    pub admin_resource: String,
    #[serde(default = "default_admin_privilege")]
    pub admin_privilege: String,
    /// Privileges offered when adding a grant, default first. Empty accepts any privilege.
    #[serde(default)]
    pub allowed_privileges: Vec<String>,
    #[serde(default)]
    pub privilege_precedence: PrivilegePrecedence,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_resource: default_admin_resource(),
            admin_privilege: default_admin_privilege(),
            allowed_privileges: Vec::new(),
            privilege_precedence: PrivilegePrecedence::default(),
        }
    }
}

impl AccessConfig {
    pub fn admin_rule(&self) -> AdminRule {
        AdminRule {
            resource: self.admin_resource.clone(),
            privilege: self.admin_privilege.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}
