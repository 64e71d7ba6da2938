//! GeoWallet CLI
//!
//! A thin Solana wallet for the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geo_wallet::commands;
use geo_wallet::rpc::MAINNET_RPC_URL;

#[derive(Parser)]
#[command(name = "geo-wallet")]
#[command(about = "GeoWallet - manage your Solana accounts from the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom accounts file path
    #[arg(short, long, global = true)]
    wallet: Option<String>,

    /// Custom RPC endpoint URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    New {
        /// Display name for the account
        #[arg(long)]
        name: Option<String>,
    },

    /// Import an account from a base-58 secret key
    Import {
        /// Display name for the account
        #[arg(long)]
        name: Option<String>,
    },

    /// List stored accounts
    List,

    /// Show an account's receive address
    Address {
        /// Account name or address (defaults to the selected account)
        #[arg(long)]
        account: Option<String>,
    },

    /// Check an account's balance
    Balance {
        /// Account name or address (defaults to the selected account)
        #[arg(long)]
        account: Option<String>,

        /// Keep watching, refreshing every few seconds
        #[arg(long)]
        watch: bool,
    },

    /// Send SOL to an address
    Send {
        /// Recipient address
        recipient: String,

        /// Amount to send in SOL
        amount: f64,

        /// Account name or address to send from (defaults to the selected
        /// account)
        #[arg(long)]
        account: Option<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show an account's secret key and recovery phrase
    Reveal {
        /// Account name or address (defaults to the selected account)
        #[arg(long)]
        account: Option<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete an account from the wallet
    Delete {
        /// Account name or address
        account: String,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Request an airdrop (not available on Mainnet)
    Airdrop {
        /// Amount to request in SOL
        #[arg(default_value_t = 1.0)]
        amount: f64,

        /// Account name or address (defaults to the selected account)
        #[arg(long)]
        account: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Determine accounts file path
    let accounts_path = cli.wallet.map(std::path::PathBuf::from).unwrap_or_else(|| {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".geo-wallet")
            .join("accounts.json")
    });

    // Determine RPC endpoint
    let rpc_url = cli.url.unwrap_or_else(|| MAINNET_RPC_URL.to_string());

    match cli.command {
        Commands::New { name } => commands::new::run(&accounts_path, name).await,
        Commands::Import { name } => commands::import::run(&accounts_path, name).await,
        Commands::List => commands::list::run(&accounts_path).await,
        Commands::Address { account } => commands::address::run(&accounts_path, account).await,
        Commands::Balance { account, watch } => {
            commands::balance::run(&accounts_path, &rpc_url, account, watch).await
        }
        Commands::Send {
            recipient,
            amount,
            account,
            yes,
        } => commands::send::run(&accounts_path, &rpc_url, &recipient, amount, account, yes).await,
        Commands::Reveal { account, yes } => {
            commands::reveal::run(&accounts_path, account, yes).await
        }
        Commands::Delete { account, yes } => {
            commands::delete::run(&accounts_path, &account, yes).await
        }
        Commands::Airdrop { amount, account } => {
            commands::airdrop::run(&accounts_path, &rpc_url, amount, account).await
        }
    }
}
