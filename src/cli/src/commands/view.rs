//! `near view`: call a contract's view method.

use super::print_response;
use crate::config::ShellConfig;
use crate::errors::CommandError;
use serde_json::Value;
use shell_client::connect;

/// Account used for view calls when no account is configured.
const FALLBACK_VIEW_ACCOUNT: &str = "register.near";

/// Calls `contract.method(args)` and prints the result.
pub async fn run(config: &ShellConfig, contract: &str, method: &str, args: Option<&str>) -> Result<Value, CommandError> {
    println!("View call: {}.{}({})", contract, method, args.unwrap_or(""));
    let args: Value = serde_json::from_str(args.unwrap_or("{}"))?;

    // Read-only calls still go through an account
    let account_id = config
        .account_id
        .as_deref()
        .or(config.master_account.as_deref())
        .unwrap_or(FALLBACK_VIEW_ACCOUNT);

    let near = connect(&config.connection()).await?;
    let result = near.account(account_id).view_function(contract, method, &args).await?;
    print_response(&result)?;
    Ok(result)
}
