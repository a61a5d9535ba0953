use crate::errors::{DistributorError, Result};
use crate::models::DistributionPolicy;
use rand::Rng;

/// Lower bound of a random draw, as a fraction of the even share.
pub const RANDOM_MIN_FACTOR: f64 = 0.7;
/// Upper bound of a random draw, as a fraction of the even share.
pub const RANDOM_MAX_FACTOR: f64 = 1.3;

/// Splits `total_amount` across `count` recipients.
///
/// The returned amounts always sum to `total_amount` (up to float rounding).
pub fn allocate<R: Rng + ?Sized>(
    total_amount: f64,
    count: usize,
    policy: DistributionPolicy,
    rng: &mut R,
) -> Result<Vec<f64>> {
    validate(total_amount, count)?;
    if total_amount == 0.0 {
        return Ok(vec![0.0; count]);
    }

    match policy {
        DistributionPolicy::Even => Ok(vec![total_amount / count as f64; count]),
        DistributionPolicy::Random => {
            // Same split as normalizing the draws. `factor / sum <= 1` keeps products finite.
            let factors = sample_factors(count, rng);
            Ok(normalize(&factors, total_amount))
        }
    }
}

/// `count` uniform factors in `[RANDOM_MIN_FACTOR, RANDOM_MAX_FACTOR]`.
pub fn sample_factors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    (0..count)
        .map(|_| rng.gen_range(RANDOM_MIN_FACTOR..=RANDOM_MAX_FACTOR))
        .collect()
}

/// Sampling pass of the random split: `count` uniform draws in
/// `[0.7 * total / count, 1.3 * total / count]`. These are not yet an allocation.
pub fn sample_draws<R: Rng + ?Sized>(total_amount: f64, count: usize, rng: &mut R) -> Result<Vec<f64>> {
    validate(total_amount, count)?;
    let equal_amount = total_amount / count as f64;
    if !(equal_amount * RANDOM_MAX_FACTOR).is_finite() {
        return Err(DistributorError::InvalidInput(format!(
            "Total amount {} is too large to draw from",
            total_amount
        )));
    }
    Ok(sample_factors(count, rng).into_iter().map(|factor| equal_amount * factor).collect())
}

/// Normalization pass: rescales `draws` so they sum to `total_amount`.
pub fn normalize(draws: &[f64], total_amount: f64) -> Vec<f64> {
    let drawn_total: f64 = draws.iter().sum();
    if drawn_total <= 0.0 {
        return vec![0.0; draws.len()];
    }
    draws.iter().map(|amount| total_amount * (amount / drawn_total)).collect()
}

fn validate(total_amount: f64, count: usize) -> Result<()> {
    if count == 0 {
        return Err(DistributorError::InvalidInput("Wallet count must be greater than zero".to_string()));
    }
    if !total_amount.is_finite() || total_amount < 0.0 {
        return Err(DistributorError::InvalidInput(format!(
            "Total amount must be a non-negative number, got {}",
            total_amount
        )));
    }
    Ok(())
}
