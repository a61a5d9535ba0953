//! Allocation, per-recipient execution and reporting for one distribution run.

pub mod allocation;
pub mod classify;
pub mod executor;
pub mod report;

pub use allocation::allocate;
pub use classify::{classify, classify_message, Classification};
pub use executor::execute_batch;
pub use report::{print_summary, print_transaction_details, summarize, BatchSummary};
