//! Connection setup.

use crate::account::Account;
use crate::errors::ClientError;
use crate::keystore::{load_key_file, FileKeyStore};
use crate::rpc::JsonRpcClient;
use serde::{Deserialize, Serialize};
use shell_core::KeyPair;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything needed to reach a network and sign for accounts on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Network id used to group keys in the key store
    pub network_id: String,
    /// JSON-RPC endpoint of a node
    pub node_url: String,
    /// Root directory of the file key store
    pub key_store_dir: PathBuf,
    /// Optional single key file (e.g. a local validator key)
    pub key_path: Option<PathBuf>,
}

/// A connection to one network.
#[derive(Debug, Clone)]
pub struct Connection {
    pub(crate) network_id: String,
    pub(crate) rpc: JsonRpcClient,
    pub(crate) key_store: FileKeyStore,
    /// Key loaded from `key_path`, with the account it belongs to
    pub(crate) extra_key: Option<Arc<(String, KeyPair)>>,
}

/// Connects to the network described by `config`.
///
/// No request is made here; a missing `key_path` file is only logged since
/// read-only commands work without it.
pub async fn connect(config: &ConnectionConfig) -> Result<Connection, ClientError> {
    let extra_key = match &config.key_path {
        Some(path) => match load_key_file(path) {
            Ok(entry) => {
                debug!("Loaded key for {} from {}", entry.0, path.display());
                Some(Arc::new(entry))
            }
            Err(ClientError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!("Key file {} not found, ignoring", path.display());
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    Ok(Connection {
        network_id: config.network_id.clone(),
        rpc: JsonRpcClient::new(config.node_url.clone()),
        key_store: FileKeyStore::new(&config.key_store_dir),
        extra_key,
    })
}

impl Connection {
    /// Gets the network id.
    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// Gets the RPC client.
    pub fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }

    /// Gets the key store.
    pub fn key_store(&self) -> &FileKeyStore {
        &self.key_store
    }

    /// Gets a handle on an account. No request is made until an operation runs.
    pub fn account(&self, account_id: &str) -> Account {
        Account::new(account_id, self.clone())
    }

    /// Finds the signing key for an account: the key store first, then the
    /// `key_path` file when it belongs to that account.
    pub fn signer_key(&self, account_id: &str) -> Result<Option<KeyPair>, ClientError> {
        if let Some(key_pair) = self.key_store.get_key(&self.network_id, account_id)? {
            return Ok(Some(key_pair));
        }
        Ok(self
            .extra_key
            .as_ref()
            .filter(|entry| entry.0 == account_id)
            .map(|entry| entry.1.clone()))
    }
}
