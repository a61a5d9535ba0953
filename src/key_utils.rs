use crate::errors::{DistributorError, Result};
use crate::models::ChildWallet;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use bs58;
use log::info;
use solana_sdk::signature::{Keypair, SeedDerivable, Signer};
use std::collections::HashMap;

/// Loads the main wallet keypair from a base58 secret.
///
/// Accepts either a 64-byte keypair array `[secret, public]` or a 32-byte seed.
pub fn load_main_keypair(private_key_base58: &str) -> Result<Keypair> {
    let private_key_base58 = private_key_base58.trim();
    if private_key_base58.is_empty() {
        return Err(DistributorError::Wallet("Main wallet private key is empty.".to_string()));
    }
    let decoded_bytes = bs58::decode(private_key_base58)
        .into_vec()
        .map_err(|e| DistributorError::Wallet(format!("Failed to decode base58 main wallet key: {}", e)))?;

    match decoded_bytes.len() {
        32 => {
            let seed_array: [u8; 32] = decoded_bytes
                .try_into()
                .map_err(|_| DistributorError::Wallet("Main wallet seed is not 32 bytes long.".to_string()))?;
            Keypair::from_seed(&seed_array)
                .map_err(|e| DistributorError::Wallet(format!("Failed to create keypair from 32-byte seed: {}", e)))
        }
        64 => Keypair::from_bytes(&decoded_bytes)
            .map_err(|e| DistributorError::Wallet(format!("Failed to create keypair from 64-byte array: {}", e))),
        other => Err(DistributorError::Wallet(format!(
            "Decoded main wallet key has unexpected length: {}. Expected 32 or 64 bytes.",
            other
        ))),
    }
}

/// Decodes a child wallet secret, stored as base64 of the 64-byte keypair.
pub fn decode_child_keypair(private_key_base64: &str) -> Result<Keypair> {
    let bytes = BASE64_STANDARD.decode(private_key_base64.trim())?;
    Keypair::from_bytes(&bytes)
        .map_err(|e| DistributorError::Wallet(format!("Failed to create child keypair from bytes: {}", e)))
}

pub fn encode_child_secret(keypair: &Keypair) -> String {
    BASE64_STANDARD.encode(keypair.to_bytes())
}

/// Generates `count` fresh child wallets with zeroed cached balances.
pub fn generate_child_wallets(count: usize) -> Vec<ChildWallet> {
    let wallets: Vec<ChildWallet> = (0..count)
        .map(|_| {
            let keypair = Keypair::new();
            ChildWallet {
                private_key: encode_child_secret(&keypair),
                pubkey: keypair.pubkey().to_string(),
                sol_balance: 0.0,
                tokens_balance: HashMap::new(),
            }
        })
        .collect();
    info!("Generated {} new child wallet(s)", wallets.len());
    wallets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_keypair_from_64_bytes() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        let loaded = load_main_keypair(&encoded).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_main_keypair_from_seed_is_deterministic() {
        let seed = [7u8; 32];
        let encoded = bs58::encode(seed).into_string();
        let a = load_main_keypair(&encoded).unwrap();
        let b = load_main_keypair(&encoded).unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn test_main_keypair_rejects_bad_input() {
        assert!(load_main_keypair("").is_err());
        assert!(load_main_keypair("0OIl").is_err());
        assert!(load_main_keypair(&bs58::encode([1u8; 10]).into_string()).is_err());
    }

    #[test]
    fn test_generated_child_secret_matches_pubkey() {
        let wallets = generate_child_wallets(3);
        assert_eq!(wallets.len(), 3);
        for wallet in &wallets {
            let keypair = decode_child_keypair(&wallet.private_key).unwrap();
            assert_eq!(keypair.pubkey().to_string(), wallet.pubkey);
        }
    }
}
