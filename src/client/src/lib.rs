//! Connection layer for NEAR Shell.
//!
//! Everything that talks to a node lives here: the JSON-RPC client, the
//! `Connection`/`Account` pair the command handlers drive, signed
//! transactions, and the file-backed key store written by `near login`.

pub mod account;
pub mod connection;
pub mod errors;
pub mod keystore;
pub mod rpc;
pub mod transaction;
pub mod views;

// Re-export commonly used types
pub use account::Account;
pub use connection::{connect, Connection, ConnectionConfig};
pub use errors::ClientError;
pub use keystore::{load_key_file, FileKeyStore};
pub use rpc::JsonRpcClient;
pub use views::{AccessKeyInfo, AccountView};
