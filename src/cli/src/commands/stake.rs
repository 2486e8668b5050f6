//! `near stake`: stake NEAR with a validator key.

use super::print_response;
use crate::config::ShellConfig;
use crate::errors::CommandError;
use serde_json::Value;
use shell_client::connect;
use shell_core::{parse_near_amount, PublicKey};

pub async fn run(config: &ShellConfig, account_id: &str, staking_key: &str, amount: &str) -> Result<Value, CommandError> {
    let yocto = parse_near_amount(amount)?;
    println!(
        "Staking {} ({}) on {} with public key = {}.",
        amount, yocto, account_id, staking_key
    );
    let staking_key: PublicKey = staking_key.parse()?;

    let near = connect(&config.connection()).await?;
    let outcome = near.account(account_id).stake(&staking_key, yocto).await?;
    print_response(&outcome)?;
    Ok(outcome)
}
