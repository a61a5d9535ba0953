use crate::client::MetadataResolver;
use crate::errors::{DistributorError, Result};
use crate::models::TokenMetadata;
use async_trait::async_trait;
use borsh::BorshDeserialize;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey, pubkey::Pubkey};
use std::sync::Arc;

/// Token metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Leading fields of a metadata account. The remainder of the account is ignored.
#[derive(BorshDeserialize, Debug)]
struct MetadataPrefix {
    _key: u8,
    _update_authority: [u8; 32],
    _mint: [u8; 32],
    name: String,
    symbol: String,
}

/// Find the metadata account for a given mint
pub fn get_metadata_account(mint: &Pubkey) -> Pubkey {
    let (metadata_account, _) = Pubkey::find_program_address(
        &[b"metadata", TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    metadata_account
}

/// Decodes name and symbol, dropping the NUL padding stored on chain.
pub fn decode_metadata(data: &[u8]) -> Result<TokenMetadata> {
    let prefix = MetadataPrefix::deserialize(&mut &data[..])
        .map_err(|e| DistributorError::Metadata(format!("Failed to decode metadata account: {}", e)))?;
    Ok(TokenMetadata {
        name: prefix.name.trim_end_matches('\0').trim().to_string(),
        symbol: prefix.symbol.trim_end_matches('\0').trim().to_string(),
    })
}

/// Resolves names and symbols from the on-chain metadata PDA of each mint.
pub struct OnChainMetadataResolver {
    rpc_client: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl OnChainMetadataResolver {
    pub fn new(rpc_client: Arc<RpcClient>, commitment: CommitmentConfig) -> Self {
        OnChainMetadataResolver { rpc_client, commitment }
    }
}

#[async_trait]
impl MetadataResolver for OnChainMetadataResolver {
    async fn lookup(&self, mint: &Pubkey) -> Result<TokenMetadata> {
        let metadata_account = get_metadata_account(mint);
        debug!("Metadata account for {}: {}", mint, metadata_account);
        let account = self
            .rpc_client
            .get_account_with_commitment(&metadata_account, self.commitment)
            .await?
            .value
            .ok_or_else(|| DistributorError::MetadataNotFound(mint.to_string()))?;
        decode_metadata(&account.data)
    }
}
