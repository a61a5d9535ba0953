//! Blockchain collaborators used by the scan and distribution commands.
//!
//! Commands only see the [`NetworkClient`] and [`MetadataResolver`] traits so
//! the transfer loop can be driven by an in-memory client in tests.

pub mod metadata;
pub mod rpc;

use crate::errors::Result;
use crate::models::{TokenAccountBalance, TokenMetadata};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

pub use metadata::OnChainMetadataResolver;
pub use rpc::SolanaRpcClient;

#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Balance in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    /// SPL token accounts owned by `owner`.
    async fn get_token_accounts(&self, owner: &Pubkey) -> Result<Vec<TokenAccountBalance>>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool>;

    async fn get_latest_blockhash(&self) -> Result<Hash>;

    /// Fee in lamports, `None` when the node cannot price the message.
    async fn estimate_fee(&self, message: &Message) -> Result<Option<u64>>;

    /// Submits a signed transaction. Failures surface as
    /// [`crate::errors::DistributorError::Submission`].
    async fn submit(&self, transaction: &Transaction) -> Result<Signature>;

    /// Waits until `signature` reaches the configured commitment.
    async fn confirm(&self, signature: &Signature) -> Result<()>;
}

#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Fails with [`crate::errors::DistributorError::MetadataNotFound`] when the
    /// mint has no registered metadata.
    async fn lookup(&self, mint: &Pubkey) -> Result<TokenMetadata>;
}
