//! Session and role gating
//!
//! This module decides, for every protected route render, whether the viewer is signed in and
//! privileged enough, and where to send them otherwise.

mod gate;
mod session_store;
mod types;

// Re-export public types and structs
pub use gate::{Gate, Navigator, decide};
pub use session_store::{AdminRule, SessionStore};
pub use types::{GateState, NavigationManifest, RouteEntry, SessionState, Viewer};
