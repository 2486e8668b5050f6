//! `near send`: transfer NEAR between accounts.

use super::print_response;
use crate::config::ShellConfig;
use crate::errors::CommandError;
use serde_json::Value;
use shell_client::connect;
use shell_core::parse_near_amount;

/// Sends `amount` (in NEAR) from `sender` to `receiver`.
pub async fn run(config: &ShellConfig, sender: &str, receiver: &str, amount: &str) -> Result<Value, CommandError> {
    println!("Sending {} NEAR to {} from {}", amount, receiver, sender);
    let yocto = parse_near_amount(amount)?;

    let near = connect(&config.connection()).await?;
    let outcome = near.account(sender).send_money(receiver, yocto).await?;
    print_response(&outcome)?;
    Ok(outcome)
}
