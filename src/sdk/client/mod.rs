//! API client module
//!
//! `ConsoleClient` speaks to the access-management REST API and implements the
//! session, directory and grant seams from `sdk::api`.

mod client;
mod directory;
mod grants;
mod session;


pub use client::ConsoleClient;
