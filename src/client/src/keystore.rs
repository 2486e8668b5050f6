//! Unencrypted file system key store.
//!
//! Keys live at `<dir>/<network_id>/<account_id>.json`, one account per file.

use crate::errors::ClientError;
use serde::{Deserialize, Serialize};
use shell_core::KeyPair;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk form of a stored key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeyFile {
    account_id: String,
    public_key: String,
    /// Validator key files call this `secret_key`
    #[serde(alias = "secret_key")]
    private_key: String,
}

impl KeyFile {
    fn into_key_pair(self) -> Result<(String, KeyPair), ClientError> {
        let key_pair: KeyPair = self.private_key.parse()?;
        Ok((self.account_id, key_pair))
    }
}

/// A directory of key files, grouped by network.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    /// Creates a key store rooted at `dir`. Nothing is created until a key is saved.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Gets the root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Gets the file a key for `account_id` is stored in.
    pub fn key_path(&self, network_id: &str, account_id: &str) -> PathBuf {
        self.dir.join(network_id).join(format!("{}.json", account_id))
    }

    /// Saves a key for an account, replacing any existing one.
    pub fn set_key(&self, network_id: &str, account_id: &str, key_pair: &KeyPair) -> Result<(), ClientError> {
        let key_file = KeyFile {
            account_id: account_id.to_string(),
            public_key: key_pair.public_key().to_string(),
            private_key: key_pair.secret_key_string(),
        };
        let contents = serde_json::to_string_pretty(&key_file)?;

        let path = self.key_path(network_id, account_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = create_private(&path)?;
        file.write_all(contents.as_bytes())?;
        debug!("Stored key for {} at {}", account_id, path.display());

        Ok(())
    }

    /// Loads the key for an account, if one is stored.
    pub fn get_key(&self, network_id: &str, account_id: &str) -> Result<Option<KeyPair>, ClientError> {
        let path = self.key_path(network_id, account_id);
        match load_key_file(&path) {
            Ok((_, key_pair)) => Ok(Some(key_pair)),
            Err(ClientError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lists the accounts with a stored key on a network, sorted by name.
    pub fn accounts(&self, network_id: &str) -> Result<Vec<String>, ClientError> {
        let network_dir = self.dir.join(network_id);
        let entries = match fs::read_dir(&network_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut accounts = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    accounts.push(stem.to_string());
                }
            }
        }
        accounts.sort();
        Ok(accounts)
    }
}

/// Opens `path` for writing, readable by the owner only.
fn create_private(path: &Path) -> Result<File, ClientError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;

    // The mode above only applies to new files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    Ok(file)
}

/// Loads a single key file, returning the account id it declares and its key.
pub fn load_key_file<P: AsRef<Path>>(path: P) -> Result<(String, KeyPair), ClientError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let key_file: KeyFile = serde_json::from_str(&contents)?;
    key_file.into_key_pair()
}
