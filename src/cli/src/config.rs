//! Configuration for NEAR Shell.
//!
//! A `ShellConfig` is built once in `main` and passed to every command. It
//! starts from a per-environment preset and is then layered with an optional
//! JSON file, environment variables and command line flags, in that order.

use crate::errors::CommandError;
use serde::{Deserialize, Serialize};
use shell_client::ConnectionConfig;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Environment used when neither `--env` nor `NEAR_ENV` is set.
pub const DEFAULT_ENV: &str = "development";

/// Seconds to wait for the wallet to redirect back during `near login`.
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 300;

/// Configuration for NEAR Shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Network id keys are stored under
    pub network_id: String,
    /// JSON-RPC endpoint of a node
    pub node_url: String,
    /// Hosted wallet; `None` on networks where login is not needed
    pub wallet_url: Option<String>,
    /// Contract helper service
    pub helper_url: Option<String>,
    /// Root of the file key store
    pub key_store_dir: PathBuf,
    /// Optional single key file, e.g. a local validator key
    pub key_path: Option<PathBuf>,
    /// Account used when a command has no better candidate
    pub master_account: Option<String>,
    /// Account commands act on by default
    pub account_id: Option<String>,
    /// How long `near login` waits for the wallet callback
    pub login_timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            network_id: "default".to_string(),
            node_url: "https://rpc.nearprotocol.com".to_string(),
            wallet_url: Some("https://wallet.nearprotocol.com".to_string()),
            helper_url: Some("https://near-contract-helper.onrender.com".to_string()),
            key_store_dir: PathBuf::from("neardev"),
            key_path: None,
            master_account: None,
            account_id: None,
            login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
        }
    }
}

impl ShellConfig {
    /// Gets the preset for an environment name.
    pub fn for_environment(env: &str) -> Result<Self, CommandError> {
        let base = Self::default();
        let config = match env {
            "production" | "development" => base,
            "staging" => Self {
                network_id: "staging".to_string(),
                node_url: "https://staging-rpc.nearprotocol.com/".to_string(),
                wallet_url: Some("https://near-wallet-staging.onrender.com".to_string()),
                helper_url: Some("https://near-contract-helper-staging.onrender.com".to_string()),
                ..base
            },
            "local" => Self {
                network_id: "local".to_string(),
                node_url: "http://localhost:3030".to_string(),
                wallet_url: Some("http://localhost:4000/wallet".to_string()),
                helper_url: None,
                key_path: dirs::home_dir().map(|home| home.join(".near").join("validator_key.json")),
                ..base
            },
            "test" => Self {
                network_id: "local".to_string(),
                node_url: "http://localhost:3030".to_string(),
                wallet_url: None,
                helper_url: None,
                master_account: Some("test.near".to_string()),
                ..base
            },
            "test-remote" | "ci" => Self {
                network_id: "shared-test".to_string(),
                node_url: "http://shared-test.nearprotocol.com:3030".to_string(),
                wallet_url: None,
                helper_url: None,
                master_account: Some("test.near".to_string()),
                ..base
            },
            other => {
                return Err(CommandError::Config(format!(
                    "Unknown environment '{}'. Use production, development, staging, local, test, test-remote or ci",
                    other
                )))
            }
        };
        Ok(config)
    }

    /// Applies a layer of overrides; unset fields keep their current value.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            network_id,
            node_url,
            wallet_url,
            helper_url,
            key_store_dir,
            key_path,
            master_account,
            account_id,
            login_timeout_secs,
        } = overrides;

        if let Some(network_id) = network_id {
            self.network_id = network_id;
        }
        if let Some(node_url) = node_url {
            self.node_url = node_url;
        }
        // An empty wallet URL turns login off, like the test presets
        if let Some(wallet_url) = wallet_url {
            self.wallet_url = Some(wallet_url).filter(|url| !url.is_empty());
        }
        if helper_url.is_some() {
            self.helper_url = helper_url;
        }
        if let Some(key_store_dir) = key_store_dir {
            self.key_store_dir = key_store_dir;
        }
        if key_path.is_some() {
            self.key_path = key_path;
        }
        if master_account.is_some() {
            self.master_account = master_account;
        }
        if account_id.is_some() {
            self.account_id = account_id;
        }
        if let Some(secs) = login_timeout_secs {
            self.login_timeout_secs = secs;
        }
    }

    /// Builds the connection settings for `shell-client`.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            network_id: self.network_id.clone(),
            node_url: self.node_url.clone(),
            key_store_dir: self.key_store_dir.clone(),
            key_path: self.key_path.clone(),
        }
    }
}

/// A partial configuration, as read from a file, the environment or flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub network_id: Option<String>,
    pub node_url: Option<String>,
    pub wallet_url: Option<String>,
    pub helper_url: Option<String>,
    pub key_store_dir: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub master_account: Option<String>,
    pub account_id: Option<String>,
    pub login_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Loads overrides from a JSON file with camelCase keys.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CommandError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let overrides = serde_json::from_str(&contents)?;
        Ok(overrides)
    }

    /// Reads `NEAR_*` overrides through `lookup` (normally `std::env::var`).
    pub fn from_env<F>(lookup: F) -> Result<Self, CommandError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let login_timeout_secs = match lookup("NEAR_LOGIN_TIMEOUT") {
            Some(secs) => Some(secs.parse().map_err(|_| {
                CommandError::Config(format!("NEAR_LOGIN_TIMEOUT must be a number of seconds, got '{}'", secs))
            })?),
            None => None,
        };

        Ok(Self {
            network_id: lookup("NEAR_NETWORK_ID"),
            node_url: lookup("NEAR_NODE_URL"),
            wallet_url: lookup("NEAR_WALLET_URL"),
            helper_url: lookup("NEAR_HELPER_URL"),
            key_store_dir: lookup("NEAR_KEY_STORE").map(PathBuf::from),
            key_path: lookup("NEAR_KEY_PATH").map(PathBuf::from),
            master_account: lookup("NEAR_MASTER_ACCOUNT"),
            account_id: lookup("NEAR_ACCOUNT_ID"),
            login_timeout_secs,
        })
    }
}
