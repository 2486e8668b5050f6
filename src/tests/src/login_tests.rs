//! `near login` end to end: real callback listener, simulated wallet, fake node.

use crate::fake_node::FakeNode;
use async_trait::async_trait;
use reqwest::Url;
use serial_test::serial;
use shell_cli::login::browser::BrowserLauncher;
use shell_cli::login::callback::LocalCallbackListener;
use shell_cli::login::prompt::{LineReader, Terminal};
use shell_cli::login::verify::NodeVerifier;
use shell_cli::login::{AccountSource, KeyGenerator, LoginFlow, LoginOutcome};
use shell_cli::{LoginError, ShellConfig};
use shell_client::FileKeyStore;
use shell_core::{KeyPair, KeyType};
use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

/// Plays the wallet: once the user "approves", it redirects the browser to
/// `success_url` with the account id.
struct WalletBrowser {
    account_id: Option<&'static str>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl BrowserLauncher for WalletBrowser {
    fn open(&self, url: &str) -> Result<(), LoginError> {
        self.opened.lock().unwrap().push(url.to_string());
        let account_id = match self.account_id {
            Some(account_id) => account_id,
            None => return Err(LoginError::BrowserLaunchFailed("no browser here".to_string())),
        };

        let url = Url::parse(url).unwrap();
        let success_url = url
            .query_pairs()
            .find(|(key, _)| key == "success_url")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        let mut redirect = Url::parse(&success_url).unwrap();
        redirect.query_pairs_mut().append_pair("account_id", account_id);

        tokio::spawn(async move {
            let response = reqwest::get(redirect).await.unwrap();
            assert!(response.status().is_success());
        });
        Ok(())
    }
}

/// A terminal with one scripted answer.
struct ScriptedTerminal {
    answer: &'static str,
    opened: Arc<Mutex<usize>>,
}

struct ScriptedReader {
    answer: &'static str,
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    type Reader = ScriptedReader;

    async fn open(&self) -> Result<ScriptedReader, LoginError> {
        *self.opened.lock().unwrap() += 1;
        Ok(ScriptedReader { answer: self.answer })
    }
}

#[async_trait]
impl LineReader for ScriptedReader {
    async fn question(&mut self, _prompt: &str) -> Result<String, LoginError> {
        Ok(self.answer.to_string())
    }
}

/// Hands out one known key so the node can be told about it up front.
struct FixedKey(KeyPair);

impl KeyGenerator for FixedKey {
    fn generate(&self, _key_type: KeyType) -> KeyPair {
        self.0.clone()
    }
}

fn loopback() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

#[tokio::test]
#[serial]
async fn test_login_captures_account_from_wallet_redirect() {
    let node = FakeNode::start();
    let key = KeyPair::from_random(KeyType::Ed25519);
    node.add_account("alice.near", 1);
    node.add_key("alice.near", &key.public_key(), 0);

    let dir = tempdir().unwrap();
    let config = ShellConfig {
        node_url: node.url(),
        key_store_dir: dir.path().to_path_buf(),
        wallet_url: Some("https://wallet.example".to_string()),
        ..ShellConfig::for_environment("test").unwrap()
    };

    let opened = Arc::new(Mutex::new(Vec::new()));
    let prompts = Arc::new(Mutex::new(0));
    let flow = LoginFlow::new(
        LocalCallbackListener::new(loopback(), 3000..=4000, Duration::from_secs(10)),
        WalletBrowser {
            account_id: Some("alice.near"),
            opened: opened.clone(),
        },
        NodeVerifier,
        ScriptedTerminal {
            answer: "bob.near",
            opened: prompts.clone(),
        },
        FixedKey(key.clone()),
    );

    let outcome = flow.login(&config).await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::Verified {
            account_id: "alice.near".to_string(),
            source: AccountSource::Callback,
        }
    );
    assert_eq!(*prompts.lock().unwrap(), 0);

    let opened = opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("https://wallet.example/login/?title=NEAR+Shell&public_key=ed25519%3A"));
    assert!(opened[0].contains("&success_url=http%3A%2F%2F127.0.0.1%3A"));

    let stored = FileKeyStore::new(dir.path())
        .get_key("local", "alice.near")
        .unwrap()
        .unwrap();
    assert_eq!(stored.public_key(), key.public_key());
}

#[tokio::test]
#[serial]
async fn test_login_falls_back_to_prompt_after_timeout() {
    let node = FakeNode::start();
    let key = KeyPair::from_random(KeyType::Ed25519);
    node.add_account("bob.near", 1);
    node.add_key("bob.near", &key.public_key(), 0);

    let dir = tempdir().unwrap();
    let config = ShellConfig {
        node_url: node.url(),
        key_store_dir: dir.path().to_path_buf(),
        wallet_url: Some("https://wallet.example".to_string()),
        ..ShellConfig::for_environment("test").unwrap()
    };

    let prompts = Arc::new(Mutex::new(0));
    let flow = LoginFlow::new(
        LocalCallbackListener::new(loopback(), 3000..=4000, Duration::from_millis(200)),
        WalletBrowser {
            account_id: None,
            opened: Arc::default(),
        },
        NodeVerifier,
        ScriptedTerminal {
            answer: "bob.near",
            opened: prompts.clone(),
        },
        FixedKey(key.clone()),
    );

    let outcome = flow.login(&config).await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::Verified {
            account_id: "bob.near".to_string(),
            source: AccountSource::Terminal,
        }
    );
    assert_eq!(*prompts.lock().unwrap(), 1);
    assert!(FileKeyStore::new(dir.path())
        .get_key("local", "bob.near")
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_login_not_needed_without_wallet() {
    let config = ShellConfig::for_environment("ci").unwrap();
    let outcome = shell_cli::commands::login::run(&config).await.unwrap();
    assert_eq!(outcome, LoginOutcome::NotApplicable);
}

#[tokio::test]
async fn test_login_reports_unverified_account() {
    let node = FakeNode::start();
    node.add_account("alice.near", 1);

    let dir = tempdir().unwrap();
    let config = ShellConfig {
        node_url: node.url(),
        key_store_dir: dir.path().to_path_buf(),
        wallet_url: Some("https://wallet.example".to_string()),
        ..ShellConfig::for_environment("test").unwrap()
    };

    // An empty port range, so no endpoint can be bound
    let ports = RangeInclusive::new(1, 0);
    let flow = LoginFlow::new(
        LocalCallbackListener::new(loopback(), ports, Duration::from_secs(1)),
        WalletBrowser {
            account_id: None,
            opened: Arc::default(),
        },
        NodeVerifier,
        ScriptedTerminal {
            answer: "alice.near",
            opened: Arc::default(),
        },
        FixedKey(KeyPair::from_random(KeyType::Ed25519)),
    );

    let outcome = flow.login(&config).await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::VerifyFailed {
            account_id: "alice.near".to_string(),
            source: AccountSource::Terminal,
        }
    );
    assert!(FileKeyStore::new(dir.path())
        .get_key("local", "alice.near")
        .unwrap()
        .is_none());
}
