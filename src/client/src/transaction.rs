//! Signed transactions in the node's borsh wire format.

use crate::errors::ClientError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use shell_core::{Balance, KeyPair, PublicKey};

/// Borsh form of a public key: key type tag followed by the raw bytes.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct WirePublicKey {
    key_type: u8,
    data: [u8; 32],
}

impl From<&PublicKey> for WirePublicKey {
    fn from(key: &PublicKey) -> Self {
        Self {
            key_type: key.key_type().wire_tag(),
            data: *key.as_bytes(),
        }
    }
}

/// Borsh form of a signature.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct WireSignature {
    key_type: u8,
    data: [u8; 64],
}

/// Permission attached to a new access key.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub enum AccessKeyPermission {
    /// Key may only call the listed methods of one contract
    FunctionCall {
        /// Gas allowance in yoctoNEAR, unlimited when `None`
        allowance: Option<Balance>,
        /// Contract the key may call
        receiver_id: String,
        /// Callable methods, any method when empty
        method_names: Vec<String>,
    },
    /// Key may sign any transaction
    FullAccess,
}

/// A new access key.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct AccessKey {
    /// Starting nonce
    pub nonce: u64,
    /// What the key may do
    pub permission: AccessKeyPermission,
}

/// Transaction actions, in wire tag order.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateAccount,
    DeployContract {
        code: Vec<u8>,
    },
    FunctionCall {
        method_name: String,
        args: Vec<u8>,
        gas: u64,
        deposit: Balance,
    },
    Transfer {
        deposit: Balance,
    },
    Stake {
        stake: Balance,
        public_key: WirePublicKey,
    },
    AddKey {
        public_key: WirePublicKey,
        access_key: AccessKey,
    },
    DeleteKey {
        public_key: WirePublicKey,
    },
    DeleteAccount {
        beneficiary_id: String,
    },
}

/// An unsigned transaction.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: WirePublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    /// Builds a transaction from `signer_id` using `signer_key` as its access key.
    pub fn new(
        signer_id: &str,
        signer_key: &PublicKey,
        nonce: u64,
        receiver_id: &str,
        block_hash: [u8; 32],
        actions: Vec<Action>,
    ) -> Self {
        Self {
            signer_id: signer_id.to_string(),
            public_key: signer_key.into(),
            nonce,
            receiver_id: receiver_id.to_string(),
            block_hash,
            actions,
        }
    }

    /// Gets the sha256 digest of the borsh encoding; this is what gets signed.
    pub fn hash(&self) -> Result<[u8; 32], ClientError> {
        let bytes = borsh::to_vec(self).map_err(|e| ClientError::Transaction(e.to_string()))?;
        Ok(Sha256::digest(&bytes).into())
    }

    /// Signs the transaction.
    pub fn sign(self, key_pair: &KeyPair) -> Result<SignedTransaction, ClientError> {
        let hash = self.hash()?;
        let signature = key_pair.sign(&hash)?;
        Ok(SignedTransaction {
            transaction: self,
            signature: WireSignature {
                key_type: key_pair.public_key().key_type().wire_tag(),
                data: signature.to_bytes(),
            },
        })
    }
}

/// A transaction together with its signature.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: WireSignature,
}

impl SignedTransaction {
    /// Encodes the signed transaction for `broadcast_tx_commit`.
    pub fn to_base64(&self) -> Result<String, ClientError> {
        let bytes = borsh::to_vec(self).map_err(|e| ClientError::Transaction(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }
}

/// Decodes a base58 block hash as returned by the `block` RPC method.
pub fn decode_block_hash(hash: &str) -> Result<[u8; 32], ClientError> {
    let bytes = bs58::decode(hash)
        .into_vec()
        .map_err(|e| ClientError::InvalidResponse(format!("bad block hash {}: {}", hash, e)))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| ClientError::InvalidResponse(format!("block hash {} is {} bytes", hash, bytes.len())))
}
