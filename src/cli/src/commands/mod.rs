//! Command handlers for NEAR Shell.

pub mod clean;
pub mod delete;
pub mod deploy;
pub mod keys;
pub mod login;
pub mod send;
pub mod stake;
pub mod state;
pub mod view;

use crate::config::ShellConfig;
use crate::errors::CommandError;
use serde::Serialize;

/// Prints a node response the way every command shows results.
pub fn print_response<T: Serialize>(response: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

/// The account a command acts on when none is given on the command line.
pub(crate) fn default_account(config: &ShellConfig) -> Result<&str, CommandError> {
    config
        .account_id
        .as_deref()
        .or(config.master_account.as_deref())
        .ok_or(CommandError::MissingArgument("--account-id"))
}
