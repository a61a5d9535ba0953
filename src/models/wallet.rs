use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One entry of the persisted child wallet list.
///
/// Field names follow the on-disk JSON layout:
/// ```json
/// [
///   { "privateKey": "<base64>", "pubkey": "...", "solBalance": 0, "tokensBalance": {} }
/// ]
/// ```
/// `private_key` is empty for addresses supplied by the operator.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildWallet {
    #[serde(default)]
    pub private_key: String,
    pub pubkey: String,
    #[serde(default)]
    pub sol_balance: f64,
    #[serde(default)]
    pub tokens_balance: HashMap<String, f64>,
}

impl ChildWallet {
    /// An externally supplied recipient with no known secret.
    pub fn external(pubkey: impl Into<String>) -> Self {
        ChildWallet {
            private_key: String::new(),
            pubkey: pubkey.into(),
            sol_balance: 0.0,
            tokens_balance: HashMap::new(),
        }
    }

    pub fn has_secret(&self) -> bool {
        !self.private_key.trim().is_empty()
    }
}

impl fmt::Debug for ChildWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildWallet")
            .field("pubkey", &self.pubkey)
            .field("has_secret", &self.has_secret())
            .field("sol_balance", &self.sol_balance)
            .field("tokens_balance", &self.tokens_balance)
            // DO NOT include the private key here
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_camel_case_layout() {
        let raw = r#"[{"privateKey":"abc","pubkey":"Pk1","solBalance":1.5,"tokensBalance":{"BONK":10.0}}]"#;
        let wallets: Vec<ChildWallet> = serde_json::from_str(raw).unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].pubkey, "Pk1");
        assert_eq!(wallets[0].sol_balance, 1.5);
        assert_eq!(wallets[0].tokens_balance.get("BONK"), Some(&10.0));
        assert!(wallets[0].has_secret());
    }

    #[test]
    fn test_external_wallet_has_no_secret() {
        let wallet = ChildWallet::external("Pk2");
        assert!(!wallet.has_secret());
        assert!(!format!("{:?}", wallet).contains("private_key"));
    }
}
