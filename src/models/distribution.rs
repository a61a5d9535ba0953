use crate::models::token::TokenHolding;
use std::fmt;

pub const NATIVE_SYMBOL: &str = "SOL";

/// How the total amount is split across recipients.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionPolicy {
    Even,
    Random,
}

impl fmt::Display for DistributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionPolicy::Even => write!(f, "Even"),
            DistributionPolicy::Random => write!(f, "Random"),
        }
    }
}

/// Who the operator asked to pay transaction fees.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePayerPolicy {
    MainWallet,
    RecipientWallet,
}

impl fmt::Display for FeePayerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeePayerPolicy::MainWallet => write!(f, "Main Wallet"),
            FeePayerPolicy::RecipientWallet => write!(f, "Recipient Wallets"),
        }
    }
}

/// Where recipients come from.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// Child wallets from the persisted registry, generated on demand.
    ChildWallets,
    /// Addresses typed in by the operator.
    Airdrop,
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendMode::ChildWallets => write!(f, "Child Wallets"),
            SendMode::Airdrop => write!(f, "Airdrop to Public Keys"),
        }
    }
}

/// The asset being distributed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferAsset {
    Native,
    Token(TokenHolding),
}

impl TransferAsset {
    pub fn symbol(&self) -> &str {
        match self {
            TransferAsset::Native => NATIVE_SYMBOL,
            TransferAsset::Token(holding) => &holding.symbol,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRequest {
    pub asset: TransferAsset,
    pub total_amount: f64,
    pub recipient_count: usize,
    pub distribution: DistributionPolicy,
    pub fee_payer: FeePayerPolicy,
}
