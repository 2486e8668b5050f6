//! Checking that the wallet authorized the login key.

use crate::config::ShellConfig;
use crate::errors::LoginError;
use async_trait::async_trait;
use colored::Colorize;
use shell_client::connect;
use shell_core::KeyPair;
use tracing::info;

/// Confirms a key pair was authorized for an account.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, account_id: &str, key_pair: &KeyPair, config: &ShellConfig) -> Result<(), LoginError>;
}

/// Verifies against the configured node and stores the key on success.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeVerifier;

#[async_trait]
impl Verifier for NodeVerifier {
    async fn verify(&self, account_id: &str, key_pair: &KeyPair, config: &ShellConfig) -> Result<(), LoginError> {
        info!("Verifying {} on {}", account_id, config.node_url);
        let connection = connect(&config.connection()).await?;
        connection.account(account_id).authorize_key(key_pair).await?;

        println!(
            "{} as [ {} ] with public key [ {} ] successfully",
            "Logged in".green(),
            account_id.bold(),
            key_pair.public_key()
        );
        Ok(())
    }
}
