use crate::errors::{DistributorError, SubmissionFailure};

pub const INSUFFICIENT_FUNDS_MESSAGE: &str = "Insufficient funds in the child wallet to pay for the transaction fee";
pub const SIMULATION_FAILED_MESSAGE: &str = "Transaction simulation failed";
pub const SEND_ERROR_PREFIX: &str = "Error sending transaction";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Raw runtime text for a fee debit from an account that was never funded.
const NO_PRIOR_CREDIT_TEXT: &str = "no record of a prior credit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub message: String,
    pub insufficient_funds: bool,
}

impl Classification {
    fn new(message: impl Into<String>, insufficient_funds: bool) -> Self {
        Classification { message: message.into(), insufficient_funds }
    }
}

/// Maps a transfer failure to an operator-facing message.
pub fn classify(error: &DistributorError) -> Classification {
    match error {
        DistributorError::Submission(failure) => classify_submission(failure),
        other => classify_message(&other.to_string()),
    }
}

fn classify_submission(failure: &SubmissionFailure) -> Classification {
    match failure {
        SubmissionFailure::InsufficientFundsForFee => Classification::new(INSUFFICIENT_FUNDS_MESSAGE, true),
        SubmissionFailure::SimulationFailed(_) => Classification::new(SIMULATION_FAILED_MESSAGE, false),
        SubmissionFailure::Network(detail) | SubmissionFailure::Confirmation(detail) => {
            if detail.trim().is_empty() {
                Classification::new(SEND_ERROR_PREFIX, false)
            } else {
                classify_message(&format!("{}: {}", SEND_ERROR_PREFIX, detail.trim()))
            }
        }
    }
}

/// String fallback, used for errors without a structured variant and when
/// re-displaying a stored outcome. Applying it to a message produced by
/// [`classify`] gives back the same classification.
pub fn classify_message(message: &str) -> Classification {
    let message = message.trim();
    if message.is_empty() {
        return Classification::new(UNKNOWN_ERROR_MESSAGE, false);
    }
    if message == INSUFFICIENT_FUNDS_MESSAGE || message.contains(NO_PRIOR_CREDIT_TEXT) {
        return Classification::new(INSUFFICIENT_FUNDS_MESSAGE, true);
    }
    if message.starts_with(SIMULATION_FAILED_MESSAGE) {
        return Classification::new(SIMULATION_FAILED_MESSAGE, false);
    }
    Classification::new(message, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_variant() {
        let c = classify(&SubmissionFailure::InsufficientFundsForFee.into());
        assert!(c.insufficient_funds);
        assert_eq!(c.message, INSUFFICIENT_FUNDS_MESSAGE);
    }

    #[test]
    fn test_simulation_failed_variant() {
        let c = classify(&SubmissionFailure::SimulationFailed("custom program error: 0x1".to_string()).into());
        assert!(!c.insufficient_funds);
        assert_eq!(c.message, SIMULATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_network_variants_use_generic_message() {
        let c = classify(&SubmissionFailure::Network("connection refused".to_string()).into());
        assert_eq!(c.message, "Error sending transaction: connection refused");
        assert!(!c.insufficient_funds);

        let c = classify(&SubmissionFailure::Confirmation(String::new()).into());
        assert_eq!(c.message, SEND_ERROR_PREFIX);
    }

    #[test]
    fn test_other_errors_keep_their_message() {
        let c = classify(&DistributorError::InvalidInput("bad pubkey".to_string()));
        assert_eq!(c.message, "Invalid input: bad pubkey");
        assert!(!c.insufficient_funds);
    }

    #[test]
    fn test_empty_message_is_unknown() {
        assert_eq!(classify_message("").message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(classify_message("   ").message, UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_raw_runtime_text_is_recognised() {
        let c = classify_message(
            "Transaction simulation failed: Attempt to debit an account but found no record of a prior credit.",
        );
        assert!(c.insufficient_funds);
    }

    #[test]
    fn test_reclassification_is_stable() {
        let failures: Vec<DistributorError> = vec![
            SubmissionFailure::InsufficientFundsForFee.into(),
            SubmissionFailure::SimulationFailed("x".to_string()).into(),
            SubmissionFailure::Network("timeout".to_string()).into(),
            DistributorError::Wallet("broken key".to_string()),
        ];
        for failure in &failures {
            let first = classify(failure);
            let again = classify_message(&first.message);
            assert_eq!(first, again);
            assert!(!first.message.is_empty());
        }
    }
}
