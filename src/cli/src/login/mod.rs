//! `near login`: authorize a fresh key for an account through the wallet.
//!
//! The flow generates a key pair, sends the user to the wallet's login page
//! and then learns which account authorized the key. It first tries to catch
//! the wallet's redirect on a local port; only if that produces no account id
//! does it ask in the terminal. Exactly one of the two answers is verified.

pub mod browser;
pub mod callback;
pub mod prompt;
pub mod verify;

use crate::config::ShellConfig;
use crate::errors::LoginError;
use browser::BrowserLauncher;
use callback::{CallbackEndpoint, CallbackListener};
use colored::Colorize;
use prompt::{LineReader, Terminal};
use reqwest::Url;
use shell_core::{KeyPair, KeyType};
use tracing::debug;
use verify::Verifier;

/// Title the wallet shows on its authorization page.
pub const LOGIN_TITLE: &str = "NEAR Shell";

const ACCOUNT_ID_KEY: &str = "account_id";

const NOT_NEEDED_MESSAGE: &str =
    "Log in is not needed on this environment. Please use appropriate master account for shell operations.";

/// Makes the key pair a login attempt asks the wallet to authorize.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, key_type: KeyType) -> KeyPair;
}

/// Fresh random keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeys;

impl KeyGenerator for RandomKeys {
    fn generate(&self, key_type: KeyType) -> KeyPair {
        KeyPair::from_random(key_type)
    }
}

/// Where the verified account id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSource {
    /// The wallet's redirect to the local callback endpoint
    Callback,
    /// Typed in at the terminal prompt
    Terminal,
}

/// How a login attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The environment has no wallet
    NotApplicable,
    /// The key is authorized for the account and was stored
    Verified { account_id: String, source: AccountSource },
    /// Verification of the account id failed
    VerifyFailed { account_id: String, source: AccountSource },
    /// The terminal closed before an account id was entered
    Aborted,
}

/// Builds `{wallet_url}/login/?title=..&public_key=..`.
pub fn build_login_url(wallet_url: &str, public_key: &str) -> Result<Url, LoginError> {
    let mut url = Url::parse(&format!("{}/login/", wallet_url.trim_end_matches('/'))).map_err(|e| {
        LoginError::InvalidWalletUrl {
            url: wallet_url.to_string(),
            reason: e.to_string(),
        }
    })?;
    url.query_pairs_mut()
        .append_pair("title", LOGIN_TITLE)
        .append_pair("public_key", public_key);
    Ok(url)
}

/// The login orchestrator.
pub struct LoginFlow<L, B, V, T, K> {
    listener: L,
    browser: B,
    verifier: V,
    terminal: T,
    keys: K,
}

impl<L, B, V, T, K> LoginFlow<L, B, V, T, K>
where
    L: CallbackListener,
    B: BrowserLauncher,
    V: Verifier,
    T: Terminal,
    K: KeyGenerator,
{
    pub fn new(listener: L, browser: B, verifier: V, terminal: T, keys: K) -> Self {
        Self {
            listener,
            browser,
            verifier,
            terminal,
            keys,
        }
    }

    /// Runs one login attempt.
    ///
    /// Only an unusable wallet URL is returned as an error; every other
    /// failure is reported on the console and reflected in the outcome.
    pub async fn login(&self, config: &ShellConfig) -> Result<LoginOutcome, LoginError> {
        let wallet_url = match config.wallet_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => {
                println!("{}", NOT_NEEDED_MESSAGE);
                return Ok(LoginOutcome::NotApplicable);
            }
        };

        let key_pair = self.keys.generate(KeyType::Ed25519);
        let mut url = build_login_url(wallet_url, &key_pair.public_key().to_string())?;

        println!(
            "\n{} on at least one of your accounts.",
            format!("Please authorize {}", LOGIN_TITLE).bold().yellow()
        );
        println!(
            "\n{}",
            format!("If your browser doesn't automatically open, please visit this URL\n{}", url).dimmed()
        );

        match self.capture_account_id(&mut url).await {
            Some(account_id) => Ok(self.verify(account_id, &key_pair, config, AccountSource::Callback).await),
            None => Ok(self.prompt_and_verify(&key_pair, config).await),
        }
    }

    /// Tries to learn the account id from the wallet's redirect.
    async fn capture_account_id(&self, url: &mut Url) -> Option<String> {
        let endpoint = match self.listener.acquire_endpoint().await {
            Ok(endpoint) => endpoint,
            Err(e) => {
                // Not worth alarming the user; the terminal prompt still works
                debug!("Callback listener unavailable: {}", e);
                return None;
            }
        };

        url.query_pairs_mut().append_pair("success_url", &endpoint.url());
        if let Err(e) = self.browser.open(url.as_str()) {
            eprintln!("Failed to open the URL [ {} ] {}", url, e);
        }

        match self.listener.await_payload(endpoint, &[ACCOUNT_ID_KEY]).await {
            Ok(mut payload) => {
                let account_id = payload.remove(ACCOUNT_ID_KEY).filter(|id| !id.is_empty());
                if account_id.is_none() {
                    debug!("Callback arrived without an account id");
                }
                account_id
            }
            Err(e) => {
                eprintln!("{} {}", "Failed to capture payload.".red(), e);
                None
            }
        }
    }

    /// Asks for the account id in the terminal and verifies the answer.
    /// The reader is dropped before this returns, whatever the outcome.
    async fn prompt_and_verify(&self, key_pair: &KeyPair, config: &ShellConfig) -> LoginOutcome {
        let mut reader = match self.terminal.open().await {
            Ok(reader) => reader,
            Err(e) => {
                eprintln!("{}", e);
                return LoginOutcome::Aborted;
            }
        };

        let question = format!(
            "Please authorize at least one account at the URL above.\n\n\
             Which account did you authorize for use with {}?  {} ",
            LOGIN_TITLE,
            "Enter it here:".bold()
        );
        let outcome = match reader.question(&question).await {
            Ok(answer) => {
                self.verify(answer.trim().to_string(), key_pair, config, AccountSource::Terminal)
                    .await
            }
            Err(e) => {
                eprintln!("{}", e);
                LoginOutcome::Aborted
            }
        };

        drop(reader);
        outcome
    }

    async fn verify(
        &self,
        account_id: String,
        key_pair: &KeyPair,
        config: &ShellConfig,
        source: AccountSource,
    ) -> LoginOutcome {
        match self.verifier.verify(&account_id, key_pair, config).await {
            Ok(()) => LoginOutcome::Verified { account_id, source },
            Err(e) => {
                eprintln!("{} {}", "Failed to verify accountId.".red(), e);
                LoginOutcome::VerifyFailed { account_id, source }
            }
        }
    }
}
