use serde::{Deserialize, Serialize};

pub const UNKNOWN_TOKEN_LABEL: &str = "Unknown";

/// Raw SPL token account balance as reported by the network client.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccountBalance {
    pub mint: String,
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: f64,
    /// False when the account data could not be read. Such entries are
    /// placeholders and only exist so the scan still lists the account.
    pub parsed: bool,
}

impl TokenAccountBalance {
    /// Stand-in for a token account whose data could not be decoded.
    pub fn unreadable() -> Self {
        TokenAccountBalance {
            mint: UNKNOWN_TOKEN_LABEL.to_string(),
            amount: 0,
            decimals: 0,
            ui_amount: 0.0,
            parsed: false,
        }
    }
}

/// Name and symbol registered for a mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
}

impl TokenMetadata {
    pub fn unknown() -> Self {
        TokenMetadata {
            name: UNKNOWN_TOKEN_LABEL.to_string(),
            symbol: UNKNOWN_TOKEN_LABEL.to_string(),
        }
    }
}

/// A token held by the main wallet at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub name: String,
    pub symbol: String,
    pub mint_address: String,
    pub balance: f64,
    pub decimals: u8,
}

impl TokenHolding {
    pub fn from_parts(account: &TokenAccountBalance, metadata: TokenMetadata) -> Self {
        // Empty on-chain strings are shown as Unknown, like a missing account.
        let name = if metadata.name.is_empty() { UNKNOWN_TOKEN_LABEL.to_string() } else { metadata.name };
        let symbol = if metadata.symbol.is_empty() { UNKNOWN_TOKEN_LABEL.to_string() } else { metadata.symbol };
        TokenHolding {
            name,
            symbol,
            mint_address: account.mint.clone(),
            balance: account.ui_amount,
            decimals: account.decimals,
        }
    }

    /// Label used in the token selection prompt.
    pub fn choice_label(&self) -> String {
        format!("{} ({}) - Balance: {}", self.name, self.symbol, self.balance)
    }
}
