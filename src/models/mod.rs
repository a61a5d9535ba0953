pub mod wallet;
pub mod token;
pub mod distribution;
pub mod outcome;

pub use distribution::{DistributionPolicy, DistributionRequest, FeePayerPolicy, SendMode, TransferAsset};
pub use outcome::{AppliedFeePayer, TransactionOutcome, TransferStatus};
pub use token::{TokenAccountBalance, TokenHolding, TokenMetadata};
pub use wallet::ChildWallet;
