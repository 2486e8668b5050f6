//! Error types for NEAR Shell commands.

use shell_client::ClientError;
use shell_core::CoreError;
use thiserror::Error;

/// Failures inside `near login`.
///
/// Apart from `InvalidWalletUrl`, every variant is reported on the console
/// where it happens and the flow moves on to its next fallback.
#[derive(Error, Debug)]
pub enum LoginError {
    /// No local port could be bound for the wallet callback.
    #[error("No callback port available: {0}")]
    ListenerUnavailable(String),

    /// The wallet callback did not arrive in time or could not be read.
    #[error("{0}")]
    PayloadCaptureFailed(String),

    /// The default browser could not be started.
    #[error("{0}")]
    BrowserLaunchFailed(String),

    /// The account did not authorize the key, or the node could not be asked.
    #[error("{0}")]
    VerificationFailed(#[from] ClientError),

    /// The terminal closed before an account id was entered.
    #[error("No account id entered: {0}")]
    PromptAborted(String),

    /// The configured wallet URL cannot be used to build a login URL.
    #[error("Invalid wallet URL '{url}': {reason}")]
    InvalidWalletUrl {
        /// The configured wallet URL
        url: String,
        /// Why it could not be parsed
        reason: String,
    },
}

/// Errors returned by command handlers.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Error from the connection layer.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Error when a key, account id or amount argument is malformed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the login flow that stops it before it starts.
    #[error(transparent)]
    Login(#[from] LoginError),

    /// Error when a local file operation fails.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON arguments or a config file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error when the configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when a command needs an argument that was not given.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}
