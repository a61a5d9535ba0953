pub mod balance;

pub use balance::{format_token_amount, lamports_to_sol, to_base_units, SOL_DECIMALS};
