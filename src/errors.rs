use thiserror::Error;
use solana_client::client_error::ClientError;
use solana_sdk::pubkey::ParsePubkeyError;
use solana_sdk::program_error::ProgramError;
use solana_sdk::signature::SignerError;

/// Failure reported by the submission layer when a transfer cannot land.
///
/// The RPC client translates raw client errors into one of these variants so the
/// classifier can match on the discriminant instead of on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    /// The fee payer has never been credited, so the fee debit was rejected.
    #[error("Attempt to debit an account but found no record of a prior credit")]
    InsufficientFundsForFee,

    #[error("Transaction simulation failed: {0}")]
    SimulationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Confirmation error: {0}")]
    Confirmation(String),
}

#[derive(Error, Debug)]
pub enum DistributorError {
    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Solana client error: {0}")]
    SolanaClient(#[from] ClientError),

    #[error("{0}")]
    Submission(#[from] SubmissionFailure),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Token metadata not found for mint {0}")]
    MetadataNotFound(String),

    #[error("Token Metadata error: {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pubkey parse error: {0}")]
    PubkeyParseError(#[from] ParsePubkeyError),

    #[error("Base64 decode error: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Solana program error: {0}")]
    SolanaProgram(#[from] ProgramError),
}

pub type Result<T> = std::result::Result<T, DistributorError>;

