//! `near login` with the real listener, browser, node and terminal.

use crate::config::ShellConfig;
use crate::errors::CommandError;
use crate::login::browser::SystemBrowser;
use crate::login::callback::LocalCallbackListener;
use crate::login::prompt::StdTerminal;
use crate::login::verify::NodeVerifier;
use crate::login::{LoginFlow, LoginOutcome, RandomKeys};
use std::time::Duration;
use tracing::info;

pub async fn run(config: &ShellConfig) -> Result<LoginOutcome, CommandError> {
    let flow = LoginFlow::new(
        LocalCallbackListener::with_timeout(Duration::from_secs(config.login_timeout_secs)),
        SystemBrowser,
        NodeVerifier,
        StdTerminal,
        RandomKeys,
    );

    let outcome = flow.login(config).await?;
    info!("Login finished: {:?}", outcome);
    Ok(outcome)
}
