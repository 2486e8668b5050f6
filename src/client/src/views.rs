//! Typed views of node query results.

use serde::{Deserialize, Serialize};
use shell_core::{Balance, PublicKey};

/// Result of a `view_account` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    /// Liquid balance in yoctoNEAR, as a decimal string
    pub amount: String,
    /// Staked balance in yoctoNEAR, as a decimal string
    #[serde(default)]
    pub locked: String,
    /// Hash of the deployed contract code
    #[serde(default)]
    pub code_hash: String,
    /// Bytes of state the account uses
    #[serde(default)]
    pub storage_usage: u64,
    /// Height of the block the view was taken at
    #[serde(default)]
    pub block_height: u64,
    /// Hash of the block the view was taken at
    #[serde(default)]
    pub block_hash: String,
}

impl AccountView {
    /// Parses the liquid balance.
    pub fn amount_yocto(&self) -> Option<Balance> {
        self.amount.parse().ok()
    }
}

/// Access key details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessKeyView {
    /// Nonce of the last transaction signed with the key
    pub nonce: u64,
    /// `"FullAccess"` or a function call permission object
    pub permission: serde_json::Value,
}

/// One entry of a `view_access_key_list` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessKeyInfo {
    /// The access key
    pub public_key: PublicKey,
    /// What the key may do
    pub access_key: AccessKeyView,
}
