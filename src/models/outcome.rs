use serde::Serialize;
use std::fmt;

pub const NO_SIGNATURE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferStatus {
    Success,
    Failed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Success => write!(f, "Success"),
            TransferStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// The fee payer actually used for a transfer.
///
/// `MainWalletFallback` records that recipient-paid fees were requested but the
/// recipient's secret was unknown, so the main wallet paid instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AppliedFeePayer {
    MainWallet,
    RecipientWallet,
    MainWalletFallback,
}

impl fmt::Display for AppliedFeePayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedFeePayer::MainWallet => write!(f, "Main Wallet"),
            AppliedFeePayer::RecipientWallet => write!(f, "Recipient Wallet"),
            AppliedFeePayer::MainWalletFallback => write!(f, "Main Wallet (fallback: recipient key unknown)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionOutcome {
    pub recipient: String,
    pub amount: f64,
    pub token: String,
    /// Fee in SOL. Zero for failed transfers.
    pub fee: f64,
    pub signature: String,
    pub fee_payer: AppliedFeePayer,
    pub status: TransferStatus,
    pub error: Option<String>,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TransferStatus::Success
    }
}
