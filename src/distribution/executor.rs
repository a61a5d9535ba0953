use crate::client::NetworkClient;
use crate::distribution::classify::classify;
use crate::errors::{DistributorError, Result};
use crate::models::outcome::NO_SIGNATURE;
use crate::models::{
    AppliedFeePayer, ChildWallet, DistributionRequest, FeePayerPolicy, TokenHolding, TransactionOutcome,
    TransferAsset, TransferStatus,
};
use crate::utils::{lamports_to_sol, to_base_units, SOL_DECIMALS};
use crate::wallet::signing_keypair;
use log::{error, info, warn};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::{get_associated_token_address, instruction::create_associated_token_account_idempotent};
use std::str::FromStr;

/// Sends one transfer per recipient, in order, and returns one outcome per recipient.
///
/// A failed transfer is recorded and the batch moves on; nothing is retried.
/// `on_outcome` is called with the recipient index as soon as each outcome exists.
pub async fn execute_batch<C, F>(
    recipients: &[ChildWallet],
    amounts: &[f64],
    request: &DistributionRequest,
    sender: &Keypair,
    client: &C,
    mut on_outcome: F,
) -> Result<Vec<TransactionOutcome>>
where
    C: NetworkClient + ?Sized,
    F: FnMut(usize, &TransactionOutcome),
{
    if recipients.len() != amounts.len() {
        return Err(DistributorError::InvalidInput(format!(
            "Got {} recipients but {} amounts",
            recipients.len(),
            amounts.len()
        )));
    }

    let mut outcomes = Vec::with_capacity(recipients.len());
    for (index, (recipient, amount)) in recipients.iter().zip(amounts.iter().copied()).enumerate() {
        let outcome = execute_one(recipient, amount, request, sender, client).await;
        on_outcome(index, &outcome);
        outcomes.push(outcome);
    }

    info!(
        "Batch finished: {} succeeded, {} failed",
        outcomes.iter().filter(|o| o.is_success()).count(),
        outcomes.iter().filter(|o| !o.is_success()).count()
    );
    Ok(outcomes)
}

async fn execute_one<C>(
    recipient: &ChildWallet,
    amount: f64,
    request: &DistributionRequest,
    sender: &Keypair,
    client: &C,
) -> TransactionOutcome
where
    C: NetworkClient + ?Sized,
{
    let token = request.asset.symbol().to_string();

    let (recipient_payer, fee_payer) = match resolve_fee_payer(recipient, request.fee_payer) {
        Ok(resolved) => resolved,
        Err(e) => return failed_outcome(recipient, amount, token, AppliedFeePayer::RecipientWallet, &e),
    };
    let payer = recipient_payer.as_ref().unwrap_or(sender);

    match send_transfer(recipient, amount, &request.asset, sender, payer, client).await {
        Ok((signature, fee_lamports)) => {
            info!("[{}] Sent {} {}. Transaction signature: {}", recipient.pubkey, amount, token, signature);
            TransactionOutcome {
                recipient: recipient.pubkey.clone(),
                amount,
                token,
                fee: lamports_to_sol(fee_lamports),
                signature: signature.to_string(),
                fee_payer,
                status: TransferStatus::Success,
                error: None,
            }
        }
        Err(e) => failed_outcome(recipient, amount, token, fee_payer, &e),
    }
}

/// Picks the keypair that pays the fee.
///
/// Recipient-paid fees need the recipient's secret; without it the main wallet
/// pays and the outcome is labelled as a fallback.
fn resolve_fee_payer(
    recipient: &ChildWallet,
    policy: FeePayerPolicy,
) -> Result<(Option<Keypair>, AppliedFeePayer)> {
    match policy {
        FeePayerPolicy::MainWallet => Ok((None, AppliedFeePayer::MainWallet)),
        FeePayerPolicy::RecipientWallet => match signing_keypair(recipient)? {
            Some(keypair) => Ok((Some(keypair), AppliedFeePayer::RecipientWallet)),
            None => {
                warn!(
                    "[{}] Recipient key unknown, main wallet pays the fee instead",
                    recipient.pubkey
                );
                Ok((None, AppliedFeePayer::MainWalletFallback))
            }
        },
    }
}

async fn send_transfer<C>(
    recipient: &ChildWallet,
    amount: f64,
    asset: &TransferAsset,
    sender: &Keypair,
    payer: &Keypair,
    client: &C,
) -> Result<(Signature, u64)>
where
    C: NetworkClient + ?Sized,
{
    let destination = Pubkey::from_str(recipient.pubkey.trim()).map_err(|e| {
        DistributorError::InvalidInput(format!("Invalid recipient address '{}': {}", recipient.pubkey, e))
    })?;

    let instruction = match asset {
        TransferAsset::Native => {
            system_instruction::transfer(&sender.pubkey(), &destination, to_base_units(amount, SOL_DECIMALS))
        }
        TransferAsset::Token(holding) => token_transfer_instruction(holding, amount, sender, &destination, client).await?,
    };

    let (signature, fee) = sign_and_send(instruction, sender, payer, client).await?;
    Ok((signature, fee.unwrap_or(0)))
}

async fn token_transfer_instruction<C>(
    holding: &TokenHolding,
    amount: f64,
    sender: &Keypair,
    destination: &Pubkey,
    client: &C,
) -> Result<Instruction>
where
    C: NetworkClient + ?Sized,
{
    let mint = Pubkey::from_str(&holding.mint_address)?;
    let source_account = get_associated_token_address(&sender.pubkey(), &mint);
    let destination_account = get_associated_token_address(destination, &mint);

    if !client.account_exists(&destination_account).await? {
        info!("[{}] Creating token account {} for mint {}", destination, destination_account, mint);
        let create_ix = create_associated_token_account_idempotent(
            &sender.pubkey(),
            destination,
            &mint,
            &spl_token::id(),
        );
        sign_and_send(create_ix, sender, sender, client).await?;
    }

    let instruction = spl_token::instruction::transfer_checked(
        &spl_token::id(),
        &source_account,
        &mint,
        &destination_account,
        &sender.pubkey(),
        &[],
        to_base_units(amount, holding.decimals),
        holding.decimals,
    )?;
    Ok(instruction)
}

/// Signs with the sender (and the payer when different), estimates the fee,
/// submits and waits for confirmation.
async fn sign_and_send<C>(
    instruction: Instruction,
    sender: &Keypair,
    payer: &Keypair,
    client: &C,
) -> Result<(Signature, Option<u64>)>
where
    C: NetworkClient + ?Sized,
{
    let blockhash = client.get_latest_blockhash().await?;
    let mut transaction = Transaction::new_with_payer(&[instruction], Some(&payer.pubkey()));
    let signers: Vec<&Keypair> = if payer.pubkey() == sender.pubkey() {
        vec![sender]
    } else {
        vec![sender, payer]
    };
    transaction.try_sign(&signers[..], blockhash)?;

    let fee = client.estimate_fee(&transaction.message).await?;
    let signature = client.submit(&transaction).await?;
    client.confirm(&signature).await?;
    Ok((signature, fee))
}

fn failed_outcome(
    recipient: &ChildWallet,
    amount: f64,
    token: String,
    fee_payer: AppliedFeePayer,
    err: &DistributorError,
) -> TransactionOutcome {
    let classification = classify(err);
    if classification.insufficient_funds {
        warn!("[{}] {}", recipient.pubkey, classification.message);
    } else {
        error!("[{}] Transfer failed: {} ({})", recipient.pubkey, classification.message, err);
    }
    TransactionOutcome {
        recipient: recipient.pubkey.clone(),
        amount,
        token,
        fee: 0.0,
        signature: NO_SIGNATURE.to_string(),
        fee_payer,
        status: TransferStatus::Failed,
        error: Some(classification.message),
    }
}
