use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use solana_wallet_distributor::commands::prompt::{select, TermReader};
use solana_wallet_distributor::commands::{distribute, manage_wallets, scan, DistributeArgs};
use solana_wallet_distributor::config::{Config, Network, DEFAULT_WALLETS_PATH};
use solana_wallet_distributor::models::{DistributionPolicy, FeePayerPolicy, SendMode};

#[derive(Parser, Debug)]
#[command(
    name = "solana-wallet-distributor",
    version,
    about = "Scan a Solana wallet and distribute SOL or SPL tokens to child wallets or airdrop addresses",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Network to use. Asked for when omitted.
    #[arg(long, global = true, value_enum)]
    network: Option<Network>,

    /// Path to the JSON file holding child wallets.
    #[arg(long, global = true, default_value = DEFAULT_WALLETS_PATH)]
    wallets_path: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the main wallet's SOL and token balances
    Scan,
    /// Distribute SOL or a token. Missing options are asked for interactively.
    Distribute {
        /// Send to child wallets or airdrop to given addresses
        #[arg(long, value_enum)]
        send_mode: Option<SendMode>,
        /// SOL, a token symbol, or a mint address
        #[arg(short, long)]
        token: Option<String>,
        /// Total amount to distribute
        #[arg(short, long)]
        amount: Option<f64>,
        /// Number of recipients
        #[arg(short, long)]
        count: Option<usize>,
        /// How to split the total
        #[arg(long, value_enum)]
        distribution: Option<DistributionPolicy>,
        /// Who pays transaction fees
        #[arg(long, value_enum)]
        fee_payer: Option<FeePayerPolicy>,
        /// Airdrop recipient address (repeatable)
        #[arg(long = "recipient")]
        recipients: Vec<String>,
        /// Do not ask for confirmation before sending
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage child wallets
    Wallets {
        /// Create new child wallets
        #[arg(long)]
        create: Option<usize>,
        /// List all wallets
        #[arg(long)]
        list: bool,
    },
}

fn choose_network(network: Option<Network>) -> Result<Network> {
    match network {
        Some(network) => Ok(network),
        None => {
            let mut reader = TermReader::new();
            let index = select(&mut reader, "Select the network:", &Network::ALL).context("Failed to read network choice")?;
            Ok(Network::ALL[index])
        }
    }
}

fn load_config(network: Option<Network>, wallets_path: PathBuf) -> Result<Config> {
    let network = choose_network(network)?;
    Config::from_env(network, wallets_path).context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Using child wallets file: {}", cli.wallets_path.display());

    match cli.command {
        Some(Commands::Scan) => {
            let config = load_config(cli.network, cli.wallets_path)?;
            scan(&config).await.context("Failed to scan wallet")?;
        }
        Some(Commands::Distribute {
            send_mode,
            token,
            amount,
            count,
            distribution,
            fee_payer,
            recipients,
            yes,
        }) => {
            let config = load_config(cli.network, cli.wallets_path)?;
            let args = DistributeArgs {
                send_mode,
                token,
                amount,
                count,
                distribution,
                fee_payer,
                recipients,
                yes,
            };
            distribute(&config, args).await.context("Failed to distribute funds")?;
        }
        Some(Commands::Wallets { create, list }) => {
            manage_wallets(&cli.wallets_path, create, list).context("Failed to manage wallets")?;
        }
        None => {
            let config = load_config(cli.network, cli.wallets_path)?;
            distribute(&config, DistributeArgs::default())
                .await
                .context("Failed to distribute funds")?;
        }
    }

    Ok(())
}
