use crate::client::{MetadataResolver, NetworkClient, OnChainMetadataResolver, SolanaRpcClient};
use crate::config::Config;
use crate::errors::{DistributorError, Result};
use crate::key_utils::load_main_keypair;
use crate::models::{TokenHolding, TokenMetadata};
use crate::utils::{format_token_amount, lamports_to_sol, SOL_DECIMALS};
use console::Style;
use log::{debug, warn};
use prettytable::{row, Table};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;
use std::str::FromStr;

/// Balances of the main wallet at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletScan {
    pub sol_lamports: u64,
    pub tokens: Vec<TokenHolding>,
}

impl WalletScan {
    pub fn sol_balance(&self) -> f64 {
        lamports_to_sol(self.sol_lamports)
    }
}

/// Reads the SOL balance and every non-empty token account of `owner`.
///
/// Metadata problems never fail the scan: the holding is listed as Unknown.
pub async fn scan_balances<C, M>(client: &C, resolver: &M, owner: &Pubkey) -> Result<WalletScan>
where
    C: NetworkClient + ?Sized,
    M: MetadataResolver + ?Sized,
{
    let sol_lamports = client.get_balance(owner).await?;
    let accounts = client.get_token_accounts(owner).await?;

    let mut tokens = Vec::new();
    for account in accounts.iter().filter(|a| !a.parsed || a.amount > 0) {
        if !account.parsed {
            tokens.push(TokenHolding::from_parts(account, TokenMetadata::unknown()));
            continue;
        }
        let metadata = match Pubkey::from_str(&account.mint) {
            Ok(mint) => match resolver.lookup(&mint).await {
                Ok(metadata) => metadata,
                Err(DistributorError::MetadataNotFound(_)) => {
                    debug!("No metadata registered for mint {}", account.mint);
                    TokenMetadata::unknown()
                }
                Err(e) => {
                    warn!("Error fetching metadata for mint {}: {}", account.mint, e);
                    TokenMetadata::unknown()
                }
            },
            Err(e) => {
                warn!("Token account reports malformed mint {}: {}", account.mint, e);
                TokenMetadata::unknown()
            }
        };
        tokens.push(TokenHolding::from_parts(account, metadata));
    }

    Ok(WalletScan { sol_lamports, tokens })
}

/// Prints the main wallet's balances.
pub async fn scan(config: &Config) -> Result<()> {
    let owner = load_main_keypair(&config.main_wallet_private_key)?.pubkey();
    let commitment = config.get_commitment_config()?;
    let client = SolanaRpcClient::new(config.rpc_url.clone(), commitment, config.confirm_timeout);
    let resolver = OnChainMetadataResolver::new(client.rpc_client(), commitment);

    println!("\n{}", Style::new().cyan().apply_to(format!("Scanning wallet on {}...", config.network)).bold());
    let result = scan_balances(&client, &resolver, &owner).await?;
    print_balances(&owner, &result);
    Ok(())
}

pub fn balance_table(scan: &WalletScan) -> Table {
    let mut table = Table::new();
    table.set_titles(row![b => "Token", "Symbol", "Balance", "Decimals", "Mint Address"]);
    table.add_row(row![
        "Solana",
        "SOL",
        format_token_amount(scan.sol_lamports, SOL_DECIMALS),
        SOL_DECIMALS,
        "Native"
    ]);
    for token in &scan.tokens {
        table.add_row(row![token.name, token.symbol, token.balance, token.decimals, token.mint_address]);
    }
    table
}

pub fn print_balances(owner: &Pubkey, scan: &WalletScan) {
    let info_style = Style::new().cyan();
    println!("\n{} {}", info_style.apply_to("Main wallet:").bold(), owner);
    balance_table(scan).printstd();
    if scan.tokens.is_empty() {
        println!("{}", Style::new().yellow().apply_to("No SPL tokens found in this wallet."));
    }
}
