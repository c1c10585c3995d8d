//! Integration tests for infra-console
//!
//! These tests run the real HTTP client against a mock API server.

pub mod client_tests;
pub mod editor_tests;
pub mod session_tests;
