//! NEAR Shell command line tool.

use anyhow::Result;
use colored::Colorize;
use shell_cli::commands::{clean, delete, deploy, keys, login, send, stake, state, view};
use shell_cli::config::{ConfigOverrides, ShellConfig, DEFAULT_ENV};
use shell_cli::LoginOutcome;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for NEAR Shell.
#[derive(Debug, StructOpt)]
#[structopt(name = "near", about = "Command line tool for NEAR accounts and contracts")]
struct Opt {
    /// Environment preset (production, development, staging, local, test, test-remote, ci)
    #[structopt(long, global = true)]
    env: Option<String>,

    /// Path to a JSON configuration file
    #[structopt(short, long, global = true, parse(from_os_str))]
    config: Option<PathBuf>,

    /// NEAR node URL
    #[structopt(long, global = true)]
    node_url: Option<String>,

    /// Wallet URL; empty disables login
    #[structopt(long, global = true)]
    wallet_url: Option<String>,

    /// Contract helper URL
    #[structopt(long, global = true)]
    helper_url: Option<String>,

    /// Network id keys are stored under
    #[structopt(long, global = true)]
    network_id: Option<String>,

    /// Directory of the key store
    #[structopt(long, global = true, parse(from_os_str))]
    key_store: Option<PathBuf>,

    /// Path to a single key file
    #[structopt(long, global = true, parse(from_os_str))]
    key_path: Option<PathBuf>,

    /// Master account used when no other account is given
    #[structopt(long, global = true)]
    master_account: Option<String>,

    /// Account to act on
    #[structopt(long, global = true)]
    account_id: Option<String>,

    /// Seconds to wait for the wallet during login
    #[structopt(long, global = true)]
    login_timeout: Option<u64>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

impl Opt {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            network_id: self.network_id.clone(),
            node_url: self.node_url.clone(),
            wallet_url: self.wallet_url.clone(),
            helper_url: self.helper_url.clone(),
            key_store_dir: self.key_store.clone(),
            key_path: self.key_path.clone(),
            master_account: self.master_account.clone(),
            account_id: self.account_id.clone(),
            login_timeout_secs: self.login_timeout,
        }
    }
}

/// Subcommands for NEAR Shell.
#[derive(Debug, StructOpt)]
enum Command {
    /// Remove the contract build output
    #[structopt(name = "clean")]
    Clean {
        /// Build output directory
        #[structopt(long, default_value = "./out", parse(from_os_str))]
        out_dir: PathBuf,
    },

    /// Deploy a contract to the configured account
    #[structopt(name = "deploy")]
    Deploy {
        /// Compiled contract
        #[structopt(long, default_value = "./out/main.wasm", parse(from_os_str))]
        wasm_file: PathBuf,
    },

    /// Call a contract's view method
    #[structopt(name = "view")]
    View {
        /// Contract account
        contract: String,

        /// Method name
        method: String,

        /// Arguments as JSON
        args: Option<String>,
    },

    /// Show an account's state
    #[structopt(name = "state")]
    State {
        /// Account id
        account_id: String,
    },

    /// Delete an account and transfer its balance
    #[structopt(name = "delete")]
    Delete {
        /// Account to delete
        account_id: String,

        /// Account that receives the remaining balance
        beneficiary: String,
    },

    /// List an account's access keys
    #[structopt(name = "keys")]
    Keys {
        /// Account id
        account_id: String,
    },

    /// Send NEAR to another account
    #[structopt(name = "send")]
    Send {
        /// Sending account
        sender: String,

        /// Receiving account
        receiver: String,

        /// Amount in NEAR
        amount: String,
    },

    /// Stake NEAR with a validator key
    #[structopt(name = "stake")]
    Stake {
        /// Staking account
        account_id: String,

        /// Validator public key
        staking_key: String,

        /// Amount in NEAR
        amount: String,
    },

    /// Authorize NEAR Shell for an account through the wallet
    #[structopt(name = "login")]
    Login,
}

/// Builds the configuration: preset, then file, then environment, then flags.
fn load_config(opt: &Opt) -> Result<ShellConfig> {
    let env = opt
        .env
        .clone()
        .or_else(|| std::env::var("NEAR_ENV").ok())
        .unwrap_or_else(|| DEFAULT_ENV.to_string());
    let mut config = ShellConfig::for_environment(&env)?;

    if let Some(path) = &opt.config {
        config.apply(ConfigOverrides::from_file(path)?);
    }
    config.apply(ConfigOverrides::from_env(|key| std::env::var(key).ok())?);
    config.apply(opt.overrides());

    debug!("Using {} configuration: {:?}", env, config);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();
    let config = load_config(&opt)?;

    // Run the appropriate command
    let result = match opt.cmd {
        Command::Clean { out_dir } => clean::run(&out_dir).await,
        Command::Deploy { wasm_file } => deploy::run(&config, &wasm_file).await,
        Command::View { contract, method, args } => {
            view::run(&config, &contract, &method, args.as_deref()).await.map(|_| ())
        }
        Command::State { account_id } => state::run(&config, &account_id).await.map(|_| ()),
        Command::Delete { account_id, beneficiary } => delete::run(&config, &account_id, &beneficiary).await,
        Command::Keys { account_id } => keys::run(&config, &account_id).await.map(|_| ()),
        Command::Send { sender, receiver, amount } => {
            send::run(&config, &sender, &receiver, &amount).await.map(|_| ())
        }
        Command::Stake { account_id, staking_key, amount } => {
            stake::run(&config, &account_id, &staking_key, &amount).await.map(|_| ())
        }
        Command::Login => login::run(&config).await.map(|outcome| {
            if let LoginOutcome::Verified { .. } = outcome {
                println!("{}", "Login complete.".green());
            }
        }),
    };

    if let Err(e) = result {
        error!("Command failed: {:?}", e);
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }

    Ok(())
}
