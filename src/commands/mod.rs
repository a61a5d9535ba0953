pub mod distribute;
pub mod prompt;
pub mod scan;
pub mod wallets;

pub use distribute::{distribute, DistributeArgs};
pub use scan::{print_balances, scan, scan_balances, WalletScan};
pub use wallets::manage_wallets;
