use crate::errors::{DistributorError, Result};
use crate::key_utils::{decode_child_keypair, generate_child_wallets};
use crate::models::ChildWallet;
use log::{info, warn};
use solana_sdk::signature::Keypair;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The persisted list of child wallets.
///
/// The file is read once when the registry is opened and rewritten wholesale
/// when new wallets are appended.
#[derive(Debug)]
pub struct WalletRegistry {
    path: PathBuf,
    wallets: Vec<ChildWallet>,
}

impl WalletRegistry {
    /// Opens the registry at `path`. A missing file is an empty registry.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            warn!("Child wallet file '{}' not found, starting with an empty list.", path.display());
            return Ok(WalletRegistry { path, wallets: Vec::new() });
        }

        let file = File::open(&path)
            .map_err(|e| DistributorError::Wallet(format!("Failed to open wallets file '{}': {}", path.display(), e)))?;
        let reader = BufReader::new(file);
        let wallets: Vec<ChildWallet> = serde_json::from_reader(reader)
            .map_err(|e| DistributorError::Wallet(format!("Failed to parse wallets file '{}': {}", path.display(), e)))?;

        info!("Loaded {} child wallet(s) from {}", wallets.len(), path.display());
        Ok(WalletRegistry { path, wallets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn wallets(&self) -> &[ChildWallet] {
        &self.wallets
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Makes sure at least `count` wallets exist, generating and persisting the
    /// missing ones. Returns how many were created.
    pub fn ensure_count(&mut self, count: usize) -> Result<usize> {
        if self.wallets.len() >= count {
            return Ok(0);
        }
        let missing = count - self.wallets.len();
        self.append(generate_child_wallets(missing))?;
        Ok(missing)
    }

    /// Appends wallets and rewrites the file.
    pub fn append(&mut self, new_wallets: Vec<ChildWallet>) -> Result<()> {
        if new_wallets.is_empty() {
            return Ok(());
        }
        self.wallets.extend(new_wallets);
        self.save()
    }

    /// The first `count` wallets, in file order.
    pub fn recipients(&self, count: usize) -> Vec<ChildWallet> {
        self.wallets.iter().take(count).cloned().collect()
    }

    pub fn save(&self) -> Result<()> {
        let json_data = serde_json::to_string_pretty(&self.wallets)
            .map_err(|e| DistributorError::Wallet(format!("Failed to serialize wallets: {}", e)))?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Staged next to the target, then renamed over it.
        let mut staged = NamedTempFile::new_in(parent).map_err(|e| {
            DistributorError::Wallet(format!("Failed to stage wallets file in '{}': {}", parent.display(), e))
        })?;
        staged
            .write_all(json_data.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| DistributorError::Wallet(format!("Failed to write wallets to file '{}': {}", self.path.display(), e)))?;
        staged.persist(&self.path).map_err(|e| {
            DistributorError::Wallet(format!("Failed to replace wallets file '{}': {}", self.path.display(), e.error))
        })?;
        info!("Saved {} child wallet(s) to {}", self.wallets.len(), self.path.display());
        Ok(())
    }
}

/// Key material for a recipient, if its secret is known.
pub fn signing_keypair(wallet: &ChildWallet) -> Result<Option<Keypair>> {
    if !wallet.has_secret() {
        return Ok(None);
    }
    decode_child_keypair(&wallet.private_key)
        .map(Some)
        .map_err(|e| DistributorError::Wallet(format!("Invalid private key for child wallet {}: {}", wallet.pubkey, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_registry() {
        let dir = tempdir().unwrap();
        let registry = WalletRegistry::load(dir.path().join("data.json")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ensure_count_generates_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut registry = WalletRegistry::load(&path).unwrap();
        assert_eq!(registry.ensure_count(4).unwrap(), 4);
        assert_eq!(registry.len(), 4);

        let reloaded = WalletRegistry::load(&path).unwrap();
        assert_eq!(reloaded.wallets(), registry.wallets());
    }

    #[test]
    fn test_ensure_count_keeps_existing_wallets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut registry = WalletRegistry::load(&path).unwrap();
        registry.ensure_count(2).unwrap();
        let first = registry.wallets()[0].clone();

        let mut registry = WalletRegistry::load(&path).unwrap();
        assert_eq!(registry.ensure_count(2).unwrap(), 0);
        assert_eq!(registry.ensure_count(3).unwrap(), 1);
        assert_eq!(registry.wallets()[0], first);
        assert_eq!(registry.recipients(2).len(), 2);
        assert_eq!(WalletRegistry::load(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_save_replaces_file_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[]").unwrap();

        let mut registry = WalletRegistry::load(&path).unwrap();
        registry.ensure_count(2).unwrap();
        registry.ensure_count(3).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let on_disk: Vec<ChildWallet> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk.as_slice(), registry.wallets());

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("data.json")]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();
        assert!(WalletRegistry::load(&path).is_err());
    }

    #[test]
    fn test_signing_keypair() {
        let dir = tempdir().unwrap();
        let mut registry = WalletRegistry::load(dir.path().join("data.json")).unwrap();
        registry.ensure_count(1).unwrap();
        let wallet = &registry.wallets()[0];

        let keypair = signing_keypair(wallet).unwrap().unwrap();
        assert_eq!(keypair.pubkey().to_string(), wallet.pubkey);

        assert!(signing_keypair(&ChildWallet::external("x")).unwrap().is_none());

        let mut broken = wallet.clone();
        broken.private_key = "!!!".to_string();
        assert!(signing_keypair(&broken).is_err());
    }
}
