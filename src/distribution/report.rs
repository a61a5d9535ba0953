use crate::distribution::classify::{classify_message, UNKNOWN_ERROR_MESSAGE};
use crate::models::{FeePayerPolicy, TransactionOutcome, TransferStatus};
use console::Style;
use prettytable::{row, Cell, Row, Table};

/// Aggregated view of a finished batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary<'a> {
    /// SOL paid in fees by successful transfers.
    pub total_fees_paid: f64,
    pub success_count: usize,
    pub failure_count: usize,
    pub rows: &'a [TransactionOutcome],
}

pub fn summarize(outcomes: &[TransactionOutcome]) -> BatchSummary<'_> {
    let mut summary = BatchSummary {
        total_fees_paid: 0.0,
        success_count: 0,
        failure_count: 0,
        rows: outcomes,
    };
    for outcome in outcomes {
        match outcome.status {
            TransferStatus::Success => {
                summary.total_fees_paid += outcome.fee;
                summary.success_count += 1;
            }
            TransferStatus::Failed => summary.failure_count += 1,
        }
    }
    summary
}

fn error_text(outcome: &TransactionOutcome) -> &str {
    outcome
        .error
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
}

/// Yellow for fee-funding problems, red for everything else.
fn failure_cell_style(outcome: &TransactionOutcome) -> &'static str {
    if classify_message(error_text(outcome)).insufficient_funds {
        "Fy"
    } else {
        "Fr"
    }
}

pub fn summary_table(summary: &BatchSummary<'_>) -> Table {
    let mut table = Table::new();
    table.set_titles(row![b => "Recipient", "Amount", "Token", "Fee (SOL)", "Fee Payer", "Status", "Signature/Error"]);

    for outcome in summary.rows {
        let (status_cell, detail_cell) = match outcome.status {
            TransferStatus::Success => (
                Cell::new(&outcome.status.to_string()).style_spec("Fg"),
                Cell::new(&outcome.signature).style_spec("Fg"),
            ),
            TransferStatus::Failed => (
                Cell::new(&outcome.status.to_string()).style_spec("Fr"),
                Cell::new(error_text(outcome)).style_spec(failure_cell_style(outcome)),
            ),
        };
        table.add_row(Row::new(vec![
            Cell::new(&outcome.recipient),
            Cell::new(&outcome.amount.to_string()),
            Cell::new(&outcome.token),
            Cell::new(&format!("{:.9}", outcome.fee)),
            Cell::new(&outcome.fee_payer.to_string()),
            status_cell,
            detail_cell,
        ]));
    }
    table
}

pub fn print_summary(summary: &BatchSummary<'_>, requested_fee_payer: FeePayerPolicy) {
    println!("\n{}", Style::new().cyan().apply_to("=== Transaction Summary ==="));
    summary_table(summary).printstd();

    println!("{}", Style::new().yellow().apply_to(format!("Total fees paid: {:.9} SOL", summary.total_fees_paid)));
    println!("{}", Style::new().green().apply_to(format!("Successful transactions: {}", summary.success_count)));
    println!("{}", Style::new().red().apply_to(format!("Failed transactions: {}", summary.failure_count)));

    let note = match requested_fee_payer {
        FeePayerPolicy::MainWallet => "Note: All fees were paid by the main wallet.",
        FeePayerPolicy::RecipientWallet => {
            "Note: Fees were paid by each recipient wallet for their respective transactions (where possible)."
        }
    };
    println!("{}", Style::new().magenta().apply_to(note));
}

pub fn print_transaction_details(outcomes: &[TransactionOutcome]) {
    let header = Style::new().cyan();
    let plain = Style::new().white();
    let orange = Style::new().color256(214);

    println!("\n{}", header.apply_to("=== Transaction Details ==="));
    for (index, outcome) in outcomes.iter().enumerate() {
        println!("\n{}", header.apply_to(format!("Transaction {}:", index + 1)));
        println!("{}", plain.apply_to(format!("Recipient: {}", outcome.recipient)));
        println!("{}", plain.apply_to(format!("Amount: {} {}", outcome.amount, outcome.token)));
        println!("{}", plain.apply_to(format!("Fee: {:.9} SOL", outcome.fee)));
        println!("{}", plain.apply_to(format!("Fee Payer: {}", outcome.fee_payer)));

        match outcome.status {
            TransferStatus::Success => {
                println!("Status: {}", Style::new().green().apply_to(outcome.status));
                println!("{}", Style::new().green().apply_to(format!("Signature: {}", outcome.signature)));
            }
            TransferStatus::Failed => {
                println!("Status: {}", Style::new().red().apply_to(outcome.status));
                let message = error_text(outcome);
                let error_style = if classify_message(message).insufficient_funds {
                    orange.clone()
                } else {
                    Style::new().red()
                };
                println!("{}", error_style.apply_to("Error:"));
                println!("{}", error_style.apply_to(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::classify::INSUFFICIENT_FUNDS_MESSAGE;
    use crate::models::AppliedFeePayer;

    fn outcome(status: TransferStatus, fee: f64, error: Option<&str>) -> TransactionOutcome {
        TransactionOutcome {
            recipient: "Recipient1111".to_string(),
            amount: 1.0,
            token: "SOL".to_string(),
            fee,
            signature: if status == TransferStatus::Success { "sig".to_string() } else { "N/A".to_string() },
            fee_payer: AppliedFeePayer::MainWallet,
            status,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_summarize_counts_and_fees() {
        let outcomes = vec![
            outcome(TransferStatus::Success, 0.000005, None),
            outcome(TransferStatus::Failed, 0.0, Some(INSUFFICIENT_FUNDS_MESSAGE)),
            outcome(TransferStatus::Success, 0.000005, None),
        ];
        let summary = summarize(&outcomes);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert!((summary.total_fees_paid - 0.00001).abs() < 1e-15);
        assert_eq!(summary.rows.len(), 3);
    }

    #[test]
    fn test_fees_of_failed_outcomes_are_ignored() {
        let outcomes = vec![outcome(TransferStatus::Failed, 0.5, Some("boom"))];
        let summary = summarize(&outcomes);
        assert_eq!(summary.total_fees_paid, 0.0);
        assert_eq!(summary.success_count, 0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.success_count + summary.failure_count, 0);
        assert_eq!(summary.total_fees_paid, 0.0);
    }

    #[test]
    fn test_summary_table_has_one_row_per_outcome() {
        let outcomes = vec![
            outcome(TransferStatus::Success, 0.000005, None),
            outcome(TransferStatus::Failed, 0.0, None),
        ];
        let summary = summarize(&outcomes);
        let table = summary_table(&summary);
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains(UNKNOWN_ERROR_MESSAGE));
        assert!(rendered.contains("0.000005000"));
    }

    #[test]
    fn test_insufficient_funds_rows_are_highlighted_differently() {
        let insufficient = outcome(TransferStatus::Failed, 0.0, Some(INSUFFICIENT_FUNDS_MESSAGE));
        let other = outcome(TransferStatus::Failed, 0.0, Some("Transaction simulation failed"));
        assert_eq!(failure_cell_style(&insufficient), "Fy");
        assert_eq!(failure_cell_style(&other), "Fr");
    }
}
