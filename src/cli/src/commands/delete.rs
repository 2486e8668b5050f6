//! `near delete`: delete an account and send its balance to a beneficiary.

use crate::config::ShellConfig;
use crate::errors::CommandError;
use shell_client::connect;

pub async fn run(config: &ShellConfig, account_id: &str, beneficiary_id: &str) -> Result<(), CommandError> {
    println!(
        "Deleting account. Account id: {}, node: {}, helper: {}, beneficiary: {}",
        account_id,
        config.node_url,
        config.helper_url.as_deref().unwrap_or("none"),
        beneficiary_id
    );

    let near = connect(&config.connection()).await?;
    near.account(account_id).delete_account(beneficiary_id).await?;
    println!("Account {} for network \"{}\" was deleted.", account_id, config.network_id);
    Ok(())
}
