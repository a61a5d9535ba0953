pub mod client;
pub mod commands;
pub mod config;
pub mod distribution;
pub mod errors;
pub mod key_utils;
pub mod models;
pub mod utils;
pub mod wallet;

pub use config::{Config, Network};
pub use errors::{DistributorError, Result};
