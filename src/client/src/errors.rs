//! Error types for the connection layer.

use shell_core::CoreError;
use thiserror::Error;

/// Errors that can occur while talking to a node or touching the key store.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Error when the HTTP request to the node fails.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Error when the node answers with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Message from the node, including any error data
        message: String,
    },

    /// Error when the node answers with something that is not a usable response.
    #[error("Invalid response from node: {0}")]
    InvalidResponse(String),

    /// Error when JSON serialization or deserialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error when a key store file operation fails.
    #[error("Key store error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when a key, account id or amount is malformed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error when no signing key is stored for an account.
    #[error("No key found for account {account_id} on network {network_id}")]
    MissingKey {
        /// The account that needed to sign
        account_id: String,
        /// The network the key store was searched for
        network_id: String,
    },

    /// Error when an account has not added the expected access key.
    #[error("The account {account_id} has not authorized the expected key {public_key}")]
    KeyNotAuthorized {
        /// The account that was checked
        account_id: String,
        /// The key that was expected among its access keys
        public_key: String,
    },

    /// Error when a transaction cannot be encoded.
    #[error("Transaction error: {0}")]
    Transaction(String),
}
