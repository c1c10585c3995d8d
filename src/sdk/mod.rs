//! Access-management API SDK
//!
//! Typed wire models, the async traits the console logic depends on, and the
//! reqwest-backed `ConsoleClient` that implements them.

pub mod api;
pub mod client;
pub mod types;

// Re-exports for convenience
pub use api::{DirectoryApi, GrantApi, SessionApi};
pub use client::ConsoleClient;
pub use types::*;
