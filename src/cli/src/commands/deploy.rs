//! `near deploy`: deploy a contract to the configured account.

use super::default_account;
use crate::config::ShellConfig;
use crate::errors::CommandError;
use shell_client::connect;
use std::path::Path;
use tracing::info;

/// Deploys the code in `wasm_file`.
pub async fn run<P: AsRef<Path>>(config: &ShellConfig, wasm_file: P) -> Result<(), CommandError> {
    let wasm_file = wasm_file.as_ref();
    let account_id = default_account(config)?;
    println!(
        "Starting deployment. Account id: {}, node: {}, helper: {}, file: {}",
        account_id,
        config.node_url,
        config.helper_url.as_deref().unwrap_or("none"),
        wasm_file.display()
    );

    let code = tokio::fs::read(wasm_file).await?;
    info!("Deploying {} bytes to {}", code.len(), account_id);

    let near = connect(&config.connection()).await?;
    near.account(account_id).deploy_contract(code).await?;
    Ok(())
}
