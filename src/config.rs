use crate::errors::{DistributorError, Result};
use log::{debug, info};
use solana_sdk::commitment_config::CommitmentConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const MAINNET_RPC_VAR: &str = "DEFAULT_MAINNET_RPC";
pub const DEVNET_RPC_VAR: &str = "DEFAULT_DEVNET_RPC";
pub const MAIN_WALLET_KEY_VAR: &str = "MAIN_WALLET_PRIVATE_KEY";
pub const COMMITMENT_VAR: &str = "COMMITMENT";
pub const CONFIRM_TIMEOUT_VAR: &str = "CONFIRM_TIMEOUT_SECS";

pub const DEFAULT_WALLETS_PATH: &str = "./data.json";
const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Devnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Devnet];

    fn rpc_var(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_RPC_VAR,
            Network::Devnet => DEVNET_RPC_VAR,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Devnet => write!(f, "devnet"),
        }
    }
}

/// Runtime configuration, built once in `main` and handed to every command.
#[derive(Clone)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    pub commitment: String,
    pub main_wallet_private_key: String,
    pub wallets_path: PathBuf,
    pub confirm_timeout: Duration,
}

impl Config {
    /// Builds the configuration from process environment variables.
    /// `.env` is expected to have been loaded by the caller.
    pub fn from_env(network: Network, wallets_path: PathBuf) -> Result<Self> {
        Self::from_lookup(network, wallets_path, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(network: Network, wallets_path: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading configuration for {} from environment variables.", network);

        let rpc_url = lookup(network.rpc_var())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DistributorError::Environment(format!(
                "{} not found in .env file",
                network.rpc_var()
            )))?;

        let main_wallet_private_key = lookup(MAIN_WALLET_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DistributorError::Environment(format!(
                "{} not found in .env file",
                MAIN_WALLET_KEY_VAR
            )))?;

        let commitment = lookup(COMMITMENT_VAR).unwrap_or_else(|| "confirmed".to_string());

        let confirm_timeout_secs = match lookup(CONFIRM_TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                DistributorError::Config(format!("Invalid {} '{}': {}", CONFIRM_TIMEOUT_VAR, raw, e))
            })?,
            None => DEFAULT_CONFIRM_TIMEOUT_SECS,
        };

        let config = Config {
            network,
            rpc_url,
            commitment,
            main_wallet_private_key,
            wallets_path,
            confirm_timeout: Duration::from_secs(confirm_timeout_secs),
        };
        // Validate eagerly so a typo fails before any RPC traffic.
        config.get_commitment_config()?;

        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    pub fn get_commitment_config(&self) -> Result<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            _ => Err(DistributorError::Config(format!("Invalid commitment level: {}", self.commitment))),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment)
            // Never print the main wallet secret
            .field("main_wallet_private_key", &"<redacted>")
            .field("wallets_path", &self.wallets_path)
            .field("confirm_timeout", &self.confirm_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_selects_rpc_url_by_network() {
        let lookup = lookup_from(&[
            (MAINNET_RPC_VAR, "https://mainnet.example"),
            (DEVNET_RPC_VAR, "https://devnet.example"),
            (MAIN_WALLET_KEY_VAR, "secret"),
        ]);
        let config = Config::from_lookup(Network::Devnet, PathBuf::from(DEFAULT_WALLETS_PATH), &lookup).unwrap();
        assert_eq!(config.rpc_url, "https://devnet.example");
        assert_eq!(config.commitment, "confirmed");
        assert_eq!(config.confirm_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_rpc_url_is_fatal() {
        let lookup = lookup_from(&[(MAIN_WALLET_KEY_VAR, "secret")]);
        let err = Config::from_lookup(Network::Mainnet, PathBuf::from(DEFAULT_WALLETS_PATH), lookup).unwrap_err();
        assert!(err.to_string().contains(MAINNET_RPC_VAR));
    }

    #[test]
    fn test_missing_main_key_is_fatal() {
        let lookup = lookup_from(&[(MAINNET_RPC_VAR, "https://mainnet.example")]);
        let err = Config::from_lookup(Network::Mainnet, PathBuf::from(DEFAULT_WALLETS_PATH), lookup).unwrap_err();
        assert!(matches!(err, DistributorError::Environment(_)));
    }

    #[test]
    fn test_rejects_unknown_commitment() {
        let lookup = lookup_from(&[
            (MAINNET_RPC_VAR, "https://mainnet.example"),
            (MAIN_WALLET_KEY_VAR, "secret"),
            (COMMITMENT_VAR, "eventually"),
        ]);
        let err = Config::from_lookup(Network::Mainnet, PathBuf::from(DEFAULT_WALLETS_PATH), lookup).unwrap_err();
        assert!(matches!(err, DistributorError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let lookup = lookup_from(&[
            (MAINNET_RPC_VAR, "https://mainnet.example"),
            (MAIN_WALLET_KEY_VAR, "super-secret-key"),
            (CONFIRM_TIMEOUT_VAR, "15"),
        ]);
        let config = Config::from_lookup(Network::Mainnet, PathBuf::from(DEFAULT_WALLETS_PATH), lookup).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-key"));
        assert_eq!(config.confirm_timeout, Duration::from_secs(15));
    }
}
