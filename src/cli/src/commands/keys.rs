//! `near keys`: list an account's access keys.

use super::print_response;
use crate::config::ShellConfig;
use crate::errors::CommandError;
use shell_client::{connect, AccessKeyInfo};

pub async fn run(config: &ShellConfig, account_id: &str) -> Result<Vec<AccessKeyInfo>, CommandError> {
    let near = connect(&config.connection()).await?;
    let access_keys = near.account(account_id).get_access_keys().await?;

    println!("Keys for account {}", account_id);
    print_response(&access_keys)?;
    Ok(access_keys)
}
