//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error when a key string or key bytes cannot be decoded.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Error when a key type other than ed25519 is requested.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Error when a signature does not match the message and key.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Error when an account id breaks the naming rules.
    #[error("Invalid account id '{account_id}': {reason}")]
    InvalidAccountId {
        /// The rejected account id
        account_id: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Error when an amount string cannot be parsed.
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount {
        /// The rejected amount
        amount: String,
        /// Why it was rejected
        reason: &'static str,
    },
}
