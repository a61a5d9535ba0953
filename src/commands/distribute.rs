use crate::client::{MetadataResolver, NetworkClient, OnChainMetadataResolver, SolanaRpcClient};
use crate::commands::prompt::{input, select, LineReader, TermReader};
use crate::commands::scan::{print_balances, scan_balances, WalletScan};
use crate::config::Config;
use crate::distribution::{allocate, execute_batch, print_summary, print_transaction_details, summarize};
use crate::errors::{DistributorError, Result};
use crate::key_utils::load_main_keypair;
use crate::models::{
    ChildWallet, DistributionPolicy, DistributionRequest, FeePayerPolicy, SendMode, TransactionOutcome,
    TransferAsset, TransferStatus,
};
use crate::models::distribution::NATIVE_SYMBOL;
use crate::wallet::WalletRegistry;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use std::str::FromStr;

/// Values given on the command line. Anything left as `None` is asked for.
#[derive(Debug, Clone, Default)]
pub struct DistributeArgs {
    pub send_mode: Option<SendMode>,
    /// `SOL`, a token symbol, or a mint address.
    pub token: Option<String>,
    pub amount: Option<f64>,
    pub count: Option<usize>,
    pub distribution: Option<DistributionPolicy>,
    pub fee_payer: Option<FeePayerPolicy>,
    /// Airdrop addresses. Implies `--send-mode airdrop`.
    pub recipients: Vec<String>,
    /// Skip the final confirmation.
    pub yes: bool,
}

/// Everything needed to run a batch, once the operator has answered.
#[derive(Debug, Clone)]
pub struct DistributionPlan {
    pub send_mode: SendMode,
    pub request: DistributionRequest,
}

/// Scans the main wallet, then walks the operator through a distribution.
pub async fn distribute(config: &Config, args: DistributeArgs) -> Result<()> {
    let main_keypair = load_main_keypair(&config.main_wallet_private_key)?;
    let commitment = config.get_commitment_config()?;
    let client = SolanaRpcClient::new(config.rpc_url.clone(), commitment, config.confirm_timeout);
    let resolver = OnChainMetadataResolver::new(client.rpc_client(), commitment);
    let mut reader = TermReader::new();

    run_distribution(config, &args, &main_keypair, &client, &resolver, &mut reader).await
}

pub async fn run_distribution<C, M, R>(
    config: &Config,
    args: &DistributeArgs,
    main_keypair: &Keypair,
    client: &C,
    resolver: &M,
    reader: &mut R,
) -> Result<()>
where
    C: NetworkClient + ?Sized,
    M: MetadataResolver + ?Sized,
    R: LineReader + ?Sized,
{
    let owner = main_keypair.pubkey();
    println!("\n{}", Style::new().cyan().apply_to(format!("Scanning wallet on {}...", config.network)).bold());
    let scan = scan_balances(client, resolver, &owner).await?;
    print_balances(&owner, &scan);

    let plan = match plan_distribution(reader, args, &scan)? {
        Some(plan) => plan,
        None => {
            println!("{}", Style::new().yellow().apply_to("Distribution cancelled."));
            return Ok(());
        }
    };

    if plan.request.recipient_count == 0 {
        println!("{}", Style::new().yellow().apply_to("No recipients requested; nothing to send."));
        return Ok(());
    }

    let recipients = match plan.send_mode {
        SendMode::ChildWallets => {
            let mut registry = WalletRegistry::load(&config.wallets_path)?;
            let created = registry.ensure_count(plan.request.recipient_count)?;
            if created > 0 {
                println!(
                    "{} {} new child wallet(s) saved to {}",
                    Style::new().green().apply_to("Created"),
                    created,
                    registry.path().display()
                );
            }
            registry.recipients(plan.request.recipient_count)
        }
        SendMode::Airdrop => collect_airdrop_recipients(reader, &args.recipients, plan.request.recipient_count)?,
    };

    let amounts = allocate(
        plan.request.total_amount,
        recipients.len(),
        plan.request.distribution,
        &mut rand::thread_rng(),
    )?;

    if !args.yes && !confirm_plan(reader, &plan)? {
        println!("{}", Style::new().yellow().apply_to("Distribution cancelled."));
        return Ok(());
    }

    info!(
        "Distributing {} {} to {} recipient(s), {} split, fees: {}",
        plan.request.total_amount,
        plan.request.asset.symbol(),
        recipients.len(),
        plan.request.distribution,
        plan.request.fee_payer
    );

    let progress = ProgressBar::new(recipients.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    let outcomes = execute_batch(&recipients, &amounts, &plan.request, main_keypair, client, |_, outcome| {
        progress.println(outcome_line(outcome));
        progress.inc(1);
    })
    .await?;
    progress.finish_and_clear();

    let summary = summarize(&outcomes);
    print_summary(&summary, plan.request.fee_payer);
    print_transaction_details(&outcomes);
    Ok(())
}

fn outcome_line(outcome: &TransactionOutcome) -> String {
    match outcome.status {
        TransferStatus::Success => format!(
            "{} Sent {} {} to {} (fee {:.9} SOL)",
            Style::new().green().apply_to("✓"),
            outcome.amount,
            outcome.token,
            outcome.recipient,
            outcome.fee
        ),
        TransferStatus::Failed => format!(
            "{} Failed to send {} {} to {}: {}",
            Style::new().red().apply_to("✗"),
            outcome.amount,
            outcome.token,
            outcome.recipient,
            outcome.error.as_deref().unwrap_or_default()
        ),
    }
}

/// Fills in every request field, asking for the ones not given as arguments.
/// Returns `None` when the operator cancels.
pub fn plan_distribution<R>(reader: &mut R, args: &DistributeArgs, scan: &WalletScan) -> Result<Option<DistributionPlan>>
where
    R: LineReader + ?Sized,
{
    let send_mode = match (args.send_mode, args.recipients.is_empty()) {
        (Some(SendMode::ChildWallets), false) => {
            return Err(DistributorError::InvalidInput(
                "Recipient addresses can only be given in airdrop mode".to_string(),
            ))
        }
        (Some(mode), _) => mode,
        (None, false) => SendMode::Airdrop,
        (None, true) => {
            let choices = ["Child Wallets", "Airdrop to Public Keys", "Cancel"];
            match select(
                reader,
                "Do you want to send tokens to child wallets or airdrop to public key addresses?",
                &choices,
            )? {
                0 => SendMode::ChildWallets,
                1 => SendMode::Airdrop,
                _ => return Ok(None),
            }
        }
    };

    let asset = match &args.token {
        Some(selector) => find_asset(scan, selector)?,
        None => {
            let mut labels = vec![format!("SOL - Balance: {}", scan.sol_balance())];
            labels.extend(scan.tokens.iter().map(|t| t.choice_label()));
            match select(reader, "Select the token to send:", &labels)? {
                0 => TransferAsset::Native,
                index => TransferAsset::Token(scan.tokens[index - 1].clone()),
            }
        }
    };

    let available = match &asset {
        TransferAsset::Native => scan.sol_balance(),
        TransferAsset::Token(holding) => holding.balance,
    };
    let total_amount = match args.amount {
        Some(amount) => {
            validate_amount(&amount, available).map_err(DistributorError::InvalidInput)?;
            amount
        }
        None => input(reader, "Enter the total amount to send:", |amount: &f64| validate_amount(amount, available))?,
    };

    let recipient_count = match args.count {
        Some(count) => {
            if !args.recipients.is_empty() && count != args.recipients.len() {
                return Err(DistributorError::InvalidInput(format!(
                    "--count is {} but {} recipient address(es) were given",
                    count,
                    args.recipients.len()
                )));
            }
            count
        }
        None if !args.recipients.is_empty() => args.recipients.len(),
        None => input(reader, "Enter the number of wallets to send to:", |count: &usize| {
            if *count > 0 {
                Ok(())
            } else {
                Err("The number of wallets must be at least 1.".to_string())
            }
        })?,
    };

    let distribution = match args.distribution {
        Some(policy) => policy,
        None => {
            let choices = [DistributionPolicy::Even, DistributionPolicy::Random];
            choices[select(reader, "How do you want to distribute the tokens?", &choices)?]
        }
    };

    let fee_payer = match args.fee_payer {
        Some(policy) => policy,
        None => {
            let choices = [FeePayerPolicy::MainWallet, FeePayerPolicy::RecipientWallet];
            choices[select(reader, "Who should pay the transaction fees?", &choices)?]
        }
    };

    Ok(Some(DistributionPlan {
        send_mode,
        request: DistributionRequest {
            asset,
            total_amount,
            recipient_count,
            distribution,
            fee_payer,
        },
    }))
}

fn validate_amount(amount: &f64, available: f64) -> std::result::Result<(), String> {
    if !amount.is_finite() || *amount <= 0.0 {
        return Err("The amount must be a positive number.".to_string());
    }
    if *amount > available {
        return Err(format!("The amount exceeds the available balance of {}.", available));
    }
    Ok(())
}

/// Matches `SOL`, a held token's symbol (case-insensitive) or its mint address.
fn find_asset(scan: &WalletScan, selector: &str) -> Result<TransferAsset> {
    if selector.eq_ignore_ascii_case(NATIVE_SYMBOL) {
        return Ok(TransferAsset::Native);
    }
    scan.tokens
        .iter()
        .find(|t| t.mint_address == selector)
        .or_else(|| scan.tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(selector)))
        .map(|t| TransferAsset::Token(t.clone()))
        .ok_or_else(|| DistributorError::Token(format!("Token '{}' is not held by the main wallet", selector)))
}

/// Externally supplied recipients. They carry no secret key.
fn collect_airdrop_recipients<R>(reader: &mut R, given: &[String], count: usize) -> Result<Vec<ChildWallet>>
where
    R: LineReader + ?Sized,
{
    if !given.is_empty() {
        return Ok(given.iter().map(|address| ChildWallet::external(address.trim())).collect());
    }
    let mut recipients = Vec::with_capacity(count);
    for i in 0..count {
        let address: String = input(reader, &format!("Enter public key for wallet {}:", i + 1), |value: &String| {
            Pubkey::from_str(value.trim())
                .map(|_| ())
                .map_err(|e| format!("Invalid public key: {}", e))
        })?;
        recipients.push(ChildWallet::external(address.trim()));
    }
    Ok(recipients)
}

fn confirm_plan<R>(reader: &mut R, plan: &DistributionPlan) -> Result<bool>
where
    R: LineReader + ?Sized,
{
    let request = &plan.request;
    reader.show(&format!(
        "About to send {} {} to {} recipient(s) ({}), {} split, fees paid by {}.",
        request.total_amount,
        request.asset.symbol(),
        request.recipient_count,
        plan.send_mode,
        request.distribution,
        request.fee_payer
    ))?;
    Ok(select(reader, "Proceed?", &["Yes", "No"])? == 0)
}
