use crate::client::NetworkClient;
use crate::errors::{Result, SubmissionFailure};
use crate::models::TokenAccountBalance;
use async_trait::async_trait;
use log::{debug, info, warn};
use solana_account_decoder::UiAccountData;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
    rpc_request::{RpcError, RpcResponseErrorData, TokenAccountsFilter},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CONFIRM_POLL_INTERVAL_MS: u64 = 500;

/// [`NetworkClient`] backed by the Solana JSON-RPC API.
pub struct SolanaRpcClient {
    rpc_client: Arc<RpcClient>,
    commitment: CommitmentConfig,
    confirm_timeout: Duration,
}

impl SolanaRpcClient {
    pub fn new(rpc_url: String, commitment: CommitmentConfig, confirm_timeout: Duration) -> Self {
        info!("Connecting to RPC endpoint {}", rpc_url);
        SolanaRpcClient {
            rpc_client: Arc::new(RpcClient::new_with_commitment(rpc_url, commitment)),
            commitment,
            confirm_timeout,
        }
    }

    /// Shared handle for other collaborators talking to the same endpoint.
    pub fn rpc_client(&self) -> Arc<RpcClient> {
        self.rpc_client.clone()
    }

    async fn poll_confirmation(&self, signature: &Signature) -> Result<()> {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            match self
                .rpc_client
                .get_signature_status_with_commitment(signature, self.commitment)
                .await
            {
                Ok(Some(Ok(()))) => {
                    debug!("Transaction confirmed: {} (attempt {})", signature, attempts);
                    return Ok(());
                }
                Ok(Some(Err(tx_err))) => {
                    let failure = match map_transaction_error(&tx_err) {
                        SubmissionFailure::SimulationFailed(detail) => {
                            SubmissionFailure::Confirmation(format!("Transaction failed confirmation: {}", detail))
                        }
                        other => other,
                    };
                    return Err(failure.into());
                }
                Ok(None) => debug!("Tx status pending for {}. Attempt {}", signature, attempts),
                Err(e) => warn!("Error fetching signature status for {}: {}. Retrying...", signature, e),
            }
            tokio::time::sleep(Duration::from_millis(CONFIRM_POLL_INTERVAL_MS)).await;
        }
    }
}

#[async_trait]
impl NetworkClient for SolanaRpcClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        debug!("Getting SOL balance for address: {}", address);
        let balance = self.rpc_client.get_balance(address).await?;
        debug!("SOL balance: {} lamports", balance);
        Ok(balance)
    }

    async fn get_token_accounts(&self, owner: &Pubkey) -> Result<Vec<TokenAccountBalance>> {
        debug!("Getting token accounts for owner: {}", owner);
        let accounts = self
            .rpc_client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
            .await?;

        let balances: Vec<TokenAccountBalance> = accounts
            .iter()
            .map(|keyed| balance_from_account_data(&keyed.pubkey, &keyed.account.data))
            .collect();
        debug!("Found {} token account(s) for {}", balances.len(), owner);
        Ok(balances)
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value.is_some())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.rpc_client
            .get_latest_blockhash()
            .await
            .map_err(|e| SubmissionFailure::Network(format!("Failed to get latest blockhash: {}", e)).into())
    }

    async fn estimate_fee(&self, message: &Message) -> Result<Option<u64>> {
        match self.rpc_client.get_fee_for_message(message).await {
            Ok(fee) => Ok(Some(fee)),
            Err(e) => {
                warn!("Fee estimation failed, reporting no fee: {}", e);
                Ok(None)
            }
        }
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: false,
            preflight_commitment: Some(self.commitment.commitment),
            ..RpcSendTransactionConfig::default()
        };
        self.rpc_client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| map_client_error(&e).into())
    }

    async fn confirm(&self, signature: &Signature) -> Result<()> {
        confirm_within(self.confirm_timeout, signature, self.poll_confirmation(signature)).await
    }
}

/// Runs a confirmation wait, turning an elapsed `limit` into a
/// [`SubmissionFailure::Confirmation`].
pub async fn confirm_within<F>(limit: Duration, signature: &Signature, wait: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match tokio::time::timeout(limit, wait).await {
        Ok(result) => result,
        Err(_) => Err(SubmissionFailure::Confirmation(format!(
            "Confirmation timeout after {}s for signature: {}",
            limit.as_secs(),
            signature
        ))
        .into()),
    }
}

/// Balance of one token account, or an unreadable placeholder when the data
/// is not jsonParsed or has an unexpected layout.
pub fn balance_from_account_data(account: &str, data: &UiAccountData) -> TokenAccountBalance {
    match data {
        UiAccountData::Json(parsed) => match parse_token_account(&parsed.parsed) {
            Some(balance) => balance,
            None => {
                warn!("Token account {} has an unexpected layout, listing it as Unknown", account);
                TokenAccountBalance::unreadable()
            }
        },
        _ => {
            warn!("Token account {} is not jsonParsed, listing it as Unknown", account);
            TokenAccountBalance::unreadable()
        }
    }
}

/// Reads `{ mint, tokenAmount: { amount, decimals, uiAmount } }` from a
/// jsonParsed SPL token account.
pub fn parse_token_account(parsed: &serde_json::Value) -> Option<TokenAccountBalance> {
    let info = &parsed["info"];
    let mint = info["mint"].as_str()?.to_string();
    let token_amount = &info["tokenAmount"];
    let amount = token_amount["amount"].as_str()?.parse::<u64>().ok()?;
    let decimals = u8::try_from(token_amount["decimals"].as_u64()?).ok()?;
    let ui_amount = token_amount["uiAmount"]
        .as_f64()
        .unwrap_or_else(|| amount as f64 / 10f64.powi(decimals as i32));
    Some(TokenAccountBalance { mint, amount, decimals, ui_amount, parsed: true })
}

/// Translates a send failure into the structured [`SubmissionFailure`].
pub fn map_client_error(err: &ClientError) -> SubmissionFailure {
    match err.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            message,
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
            ..
        }) => match &result.err {
            Some(tx_err) => map_transaction_error(tx_err),
            None => SubmissionFailure::SimulationFailed(message.clone()),
        },
        ClientErrorKind::TransactionError(tx_err) => map_transaction_error(tx_err),
        _ => SubmissionFailure::Network(err.to_string()),
    }
}

fn map_transaction_error(tx_err: &TransactionError) -> SubmissionFailure {
    match tx_err {
        TransactionError::AccountNotFound | TransactionError::InsufficientFundsForFee => {
            SubmissionFailure::InsufficientFundsForFee
        }
        other => SubmissionFailure::SimulationFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DistributorError;
    use serde_json::json;
    use solana_account_decoder::parse_account_data::ParsedAccount;
    use solana_client::rpc_response::RpcSimulateTransactionResult;

    #[test]
    fn test_parse_token_account() {
        let parsed = json!({
            "info": {
                "mint": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
                "tokenAmount": { "amount": "1500000", "decimals": 5, "uiAmount": 15.0 }
            },
            "type": "account"
        });
        let balance = parse_token_account(&parsed).unwrap();
        assert_eq!(balance.mint, "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263");
        assert_eq!(balance.amount, 1_500_000);
        assert_eq!(balance.decimals, 5);
        assert_eq!(balance.ui_amount, 15.0);
    }

    #[test]
    fn test_parse_token_account_without_ui_amount() {
        let parsed = json!({
            "info": { "mint": "m", "tokenAmount": { "amount": "250", "decimals": 2, "uiAmount": null } }
        });
        assert_eq!(parse_token_account(&parsed).unwrap().ui_amount, 2.5);
        assert!(parse_token_account(&json!({ "info": {} })).is_none());
    }

    #[tokio::test]
    async fn test_confirmation_wait_is_bounded() {
        let signature = Signature::new_unique();
        let err = confirm_within(Duration::from_millis(20), &signature, std::future::pending::<Result<()>>())
            .await
            .unwrap_err();
        match err {
            DistributorError::Submission(SubmissionFailure::Confirmation(detail)) => {
                assert!(detail.contains(&signature.to_string()));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_confirmation_result_passes_through_in_time() {
        let signature = Signature::new_unique();
        assert!(confirm_within(Duration::from_secs(5), &signature, async { Ok(()) }).await.is_ok());

        let rejected = confirm_within(Duration::from_secs(5), &signature, async {
            Err(SubmissionFailure::InsufficientFundsForFee.into())
        })
        .await;
        assert!(matches!(
            rejected,
            Err(DistributorError::Submission(SubmissionFailure::InsufficientFundsForFee))
        ));
    }

    #[test]
    fn test_unreadable_account_data_becomes_placeholder() {
        let binary = UiAccountData::LegacyBinary("AAAA".to_string());
        let placeholder = balance_from_account_data("Account1111", &binary);
        assert!(!placeholder.parsed);
        assert_eq!(placeholder.mint, "Unknown");

        let odd_layout = UiAccountData::Json(ParsedAccount {
            program: "spl-token".to_string(),
            parsed: json!({ "info": { "state": "initialized" } }),
            space: 165,
        });
        assert_eq!(balance_from_account_data("Account2222", &odd_layout), TokenAccountBalance::unreadable());

        let good = UiAccountData::Json(ParsedAccount {
            program: "spl-token".to_string(),
            parsed: json!({ "info": { "mint": "m", "tokenAmount": { "amount": "5", "decimals": 0, "uiAmount": 5.0 } } }),
            space: 165,
        });
        let balance = balance_from_account_data("Account3333", &good);
        assert!(balance.parsed);
        assert_eq!(balance.amount, 5);
    }

    #[test]
    fn test_account_not_found_maps_to_insufficient_funds() {
        let err = ClientError::from(ClientErrorKind::TransactionError(TransactionError::AccountNotFound));
        assert_eq!(map_client_error(&err), SubmissionFailure::InsufficientFundsForFee);
    }

    #[test]
    fn test_preflight_failure_maps_to_simulation_failed() {
        let result: RpcSimulateTransactionResult =
            serde_json::from_value(json!({ "err": "InvalidAccountForFee", "logs": [] })).unwrap();
        let err = ClientError::from(ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code: -32002,
            message: "Transaction simulation failed".to_string(),
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
        }));
        assert!(matches!(map_client_error(&err), SubmissionFailure::SimulationFailed(_)));
    }

    #[test]
    fn test_transport_errors_map_to_network() {
        let err = ClientError::from(ClientErrorKind::Custom("connection reset".to_string()));
        assert!(matches!(map_client_error(&err), SubmissionFailure::Network(_)));
    }
}
