//! Account operations.

use crate::connection::Connection;
use crate::errors::ClientError;
use crate::transaction::{decode_block_hash, Action, Transaction};
use crate::views::{AccessKeyInfo, AccessKeyView, AccountView};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use shell_core::{validate_account_id, Balance, KeyPair, PublicKey};
use tracing::{debug, info};

/// A handle on one account of a connection.
#[derive(Debug, Clone)]
pub struct Account {
    account_id: String,
    connection: Connection,
}

impl Account {
    pub(crate) fn new(account_id: &str, connection: Connection) -> Self {
        Self {
            account_id: account_id.to_string(),
            connection,
        }
    }

    /// Gets the account id.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Gets the account's balance and storage details.
    pub async fn state(&self) -> Result<AccountView, ClientError> {
        let result = self
            .connection
            .rpc
            .query(json!({
                "request_type": "view_account",
                "finality": "final",
                "account_id": self.account_id,
            }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Lists the account's access keys.
    pub async fn get_access_keys(&self) -> Result<Vec<AccessKeyInfo>, ClientError> {
        let result = self
            .connection
            .rpc
            .query(json!({
                "request_type": "view_access_key_list",
                "finality": "final",
                "account_id": self.account_id,
            }))
            .await?;
        let keys = result
            .get("keys")
            .cloned()
            .ok_or_else(|| ClientError::InvalidResponse("access key list without keys".to_string()))?;
        Ok(serde_json::from_value(keys)?)
    }

    /// Calls a read-only contract method.
    ///
    /// The returned bytes are parsed as JSON when possible, otherwise returned
    /// as a string; an empty result is `null`.
    pub async fn view_function(&self, contract_id: &str, method_name: &str, args: &Value) -> Result<Value, ClientError> {
        let args = serde_json::to_vec(args)?;
        let result = self
            .connection
            .rpc
            .query(json!({
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract_id,
                "method_name": method_name,
                "args_base64": STANDARD.encode(args),
            }))
            .await?;

        if let Some(logs) = result.get("logs").and_then(Value::as_array) {
            for log in logs {
                debug!("{}.{} log: {}", contract_id, method_name, log);
            }
        }

        let bytes: Vec<u8> = serde_json::from_value(
            result
                .get("result")
                .cloned()
                .ok_or_else(|| ClientError::InvalidResponse("call_function without result".to_string()))?,
        )?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
    }

    /// Deploys contract code to this account.
    pub async fn deploy_contract(&self, code: Vec<u8>) -> Result<Value, ClientError> {
        self.sign_and_send(&self.account_id, vec![Action::DeployContract { code }])
            .await
    }

    /// Transfers `amount` yoctoNEAR to `receiver_id`.
    pub async fn send_money(&self, receiver_id: &str, amount: Balance) -> Result<Value, ClientError> {
        validate_account_id(receiver_id)?;
        self.sign_and_send(receiver_id, vec![Action::Transfer { deposit: amount }])
            .await
    }

    /// Stakes `amount` yoctoNEAR with `public_key` as the validator key.
    pub async fn stake(&self, public_key: &PublicKey, amount: Balance) -> Result<Value, ClientError> {
        self.sign_and_send(
            &self.account_id,
            vec![Action::Stake {
                stake: amount,
                public_key: public_key.into(),
            }],
        )
        .await
    }

    /// Deletes this account, sending its remaining balance to `beneficiary_id`.
    pub async fn delete_account(&self, beneficiary_id: &str) -> Result<Value, ClientError> {
        validate_account_id(beneficiary_id)?;
        self.sign_and_send(
            &self.account_id,
            vec![Action::DeleteAccount {
                beneficiary_id: beneficiary_id.to_string(),
            }],
        )
        .await
    }

    /// Confirms the wallet added `key_pair` to this account and, if so, stores
    /// it in the connection's key store so later commands can sign with it.
    pub async fn authorize_key(&self, key_pair: &KeyPair) -> Result<(), ClientError> {
        validate_account_id(&self.account_id)?;

        let public_key = key_pair.public_key();
        let keys = self.get_access_keys().await?;
        if !keys.iter().any(|key| key.public_key == public_key) {
            return Err(ClientError::KeyNotAuthorized {
                account_id: self.account_id.clone(),
                public_key: public_key.to_string(),
            });
        }

        self.connection
            .key_store
            .set_key(&self.connection.network_id, &self.account_id, key_pair)?;
        info!("Stored authorized key {} for {}", public_key, self.account_id);
        Ok(())
    }

    async fn access_key(&self, public_key: &PublicKey) -> Result<AccessKeyView, ClientError> {
        let result = self
            .connection
            .rpc
            .query(json!({
                "request_type": "view_access_key",
                "finality": "final",
                "account_id": self.account_id,
                "public_key": public_key.to_string(),
            }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Signs a transaction with this account's stored key and waits for it
    /// to execute.
    async fn sign_and_send(&self, receiver_id: &str, actions: Vec<Action>) -> Result<Value, ClientError> {
        // The account id becomes a key store path
        validate_account_id(&self.account_id)?;
        let key_pair = self
            .connection
            .signer_key(&self.account_id)?
            .ok_or_else(|| ClientError::MissingKey {
                account_id: self.account_id.clone(),
                network_id: self.connection.network_id.clone(),
            })?;
        let public_key = key_pair.public_key();

        let access_key = self.access_key(&public_key).await?;
        let block_hash = decode_block_hash(&self.connection.rpc.final_block_hash().await?)?;

        let transaction = Transaction::new(
            &self.account_id,
            &public_key,
            access_key.nonce + 1,
            receiver_id,
            block_hash,
            actions,
        );
        let tx_hash = bs58::encode(transaction.hash()?).into_string();
        let signed = transaction.sign(&key_pair)?;

        info!("Sending transaction {} from {} to {}", tx_hash, self.account_id, receiver_id);
        let outcome = self.connection.rpc.broadcast_tx_commit(signed.to_base64()?).await?;

        if let Some(failure) = outcome.pointer("/status/Failure") {
            return Err(ClientError::Transaction(format!(
                "transaction {} failed: {}",
                tx_hash, failure
            )));
        }
        Ok(outcome)
    }
}
