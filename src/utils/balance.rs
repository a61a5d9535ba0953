use solana_sdk::native_token::LAMPORTS_PER_SOL;

pub const SOL_DECIMALS: u8 = 9;

/// Converts a UI amount into base units (lamports or token base units),
/// rounding down. Products within 1e-6 of an integer snap to it so that
/// e.g. 0.3 SOL is 300_000_000 lamports rather than one less.
pub fn to_base_units(amount: f64, decimals: u8) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    let scaled = amount * 10f64.powi(decimals as i32);
    let nearest = scaled.round();
    let units = if (scaled - nearest).abs() < 1e-6 { nearest } else { scaled.floor() };
    units as u64
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Format a token amount with its decimals
pub fn format_token_amount(amount: u64, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let divisor = 10u64.pow(decimals as u32);
    let whole_part = amount / divisor;
    let fractional_part = amount % divisor;

    if fractional_part == 0 {
        return whole_part.to_string();
    }

    let fractional_str = format!("{:0width$}", fractional_part, width = decimals as usize);
    // Trim trailing zeros
    let trimmed = fractional_str.trim_end_matches('0');

    if trimmed.is_empty() {
        whole_part.to_string()
    } else {
        format!("{}.{}", whole_part, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(0.3, SOL_DECIMALS), 300_000_000);
        assert_eq!(to_base_units(1.0, SOL_DECIMALS), LAMPORTS_PER_SOL);
        assert_eq!(to_base_units(2.5, 0), 2);
        assert_eq!(to_base_units(0.123456789, 6), 123_456);
        assert_eq!(to_base_units(-1.0, 6), 0);
        assert_eq!(to_base_units(f64::NAN, 6), 0);
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount(1_500_000, 6), "1.5");
        assert_eq!(format_token_amount(2_000_000, 6), "2");
        assert_eq!(format_token_amount(42, 0), "42");
        assert_eq!(format_token_amount(5, 3), "0.005");
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(5_000), 0.000005);
    }
}
