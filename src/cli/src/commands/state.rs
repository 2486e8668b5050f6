//! `near state`: show an account's state.

use super::print_response;
use crate::config::ShellConfig;
use crate::errors::CommandError;
use serde_json::Value;
use shell_client::connect;
use shell_core::format_near_amount;

/// Prints the account view with the balance also formatted in NEAR.
pub async fn run(config: &ShellConfig, account_id: &str) -> Result<Value, CommandError> {
    let near = connect(&config.connection()).await?;
    let state = near.account(account_id).state().await?;

    let mut view = serde_json::to_value(&state)?;
    if let (Some(amount), Value::Object(fields)) = (state.amount_yocto(), &mut view) {
        fields.insert("formattedAmount".to_string(), Value::String(format_near_amount(amount)));
    }

    println!("Account {}", account_id);
    print_response(&view)?;
    Ok(view)
}
