//! Utility modules for the console
//!
//! - **error**: the shared error type and `Result` alias
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{ConsoleError, Result};
pub use logging::{LogLevel, init_logging};
