use crate::errors::Result;
use crate::wallet::WalletRegistry;
use console::Style;
use prettytable::{row, Table};
use std::path::Path;

/// Create and/or list child wallets in the registry file.
pub fn manage_wallets(wallets_path: &Path, create_count: Option<usize>, list: bool) -> Result<()> {
    let info_style = Style::new().cyan();
    let mut registry = WalletRegistry::load(wallets_path)?;

    if let Some(count) = create_count.filter(|c| *c > 0) {
        println!("{} {} new wallet(s)...", info_style.apply_to("Creating"), count);
        let target = registry.len() + count;
        let created = registry.ensure_count(target)?;
        println!(
            "{} Created {} new wallet(s) in {}",
            Style::new().green().apply_to("✓"),
            created,
            registry.path().display()
        );
    }

    if list {
        println!("\n{}", info_style.apply_to("Child Wallets:"));
        wallets_table(&registry).printstd();
        println!("\n{} {} child wallet(s) loaded", info_style.apply_to("ℹ️"), registry.len());
        println!(
            "{}",
            Style::new()
                .yellow()
                .apply_to(format!("⚠️ Keep {} secure. It contains your private keys!", registry.path().display()))
        );
    } else if registry.is_empty() {
        println!("{} No child wallets found.", info_style.apply_to("ℹ️"));
    } else {
        println!("{} {} child wallet(s) available.", info_style.apply_to("ℹ️"), registry.len());
        println!("Use --list to see their public keys.");
    }

    Ok(())
}

pub fn wallets_table(registry: &WalletRegistry) -> Table {
    let mut table = Table::new();
    table.set_titles(row![b => "Index", "Public Key", "SOL (cached)", "Key Stored"]);
    for (index, wallet) in registry.wallets().iter().enumerate() {
        let key_stored = if wallet.has_secret() { "yes" } else { "no" };
        table.add_row(row![index, wallet.pubkey, wallet.sol_balance, key_stored]);
    }
    table
}
