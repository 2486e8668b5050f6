//! NEAR Shell: command line tool for NEAR accounts and contracts.

pub mod commands;
pub mod config;
pub mod errors;
pub mod login;

// Re-export commonly used types
pub use config::{ConfigOverrides, ShellConfig};
pub use errors::{CommandError, LoginError};
pub use login::{LoginFlow, LoginOutcome};
