//! Error types for billing operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during billing operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    /// Payment amount must be positive.
    #[error("Payment amount must be positive")]
    NonPositiveAmount,

    /// Canceled payments are excluded from the invoice aggregates, so a
    /// payment recorded as canceled would move money it never represents.
    #[error("A payment cannot be recorded as canceled")]
    CanceledAtCreation,

    /// Payment amount exceeds the invoice's remaining amount.
    #[error("Payment of {amount} exceeds remaining amount {remaining}")]
    ExceedsRemaining {
        /// The requested payment amount.
        amount: Decimal,
        /// The invoice's remaining amount.
        remaining: Decimal,
    },

    /// A reversal would take the paid amount below zero, which means the
    /// stored aggregates no longer match the payment rows.
    #[error("Cannot reverse {amount}: only {paid} has been paid")]
    ReversalExceedsPaid {
        /// The payment amount being reversed.
        amount: Decimal,
        /// The invoice's paid amount.
        paid: Decimal,
    },
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::CanceledAtCreation => "CANCELED_AT_CREATION",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING_AMOUNT",
            Self::ReversalExceedsPaid { .. } => "REVERSAL_EXCEEDS_PAID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = BillingError::ExceedsRemaining {
            amount: dec!(60000),
            remaining: dec!(50000),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 60000 exceeds remaining amount 50000"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BillingError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
    }
}
