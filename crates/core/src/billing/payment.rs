//! Payment settlement and status derivation.
//!
//! Pure functions, no side effects - callable standalone for testing.
//! The database layer applies the results inside its own transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BillingError;

/// Derived payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoicePaymentStatus {
    /// Nothing has been paid.
    Unpaid,
    /// Some but not all of the total has been paid.
    PartiallyPaid,
    /// The full total has been paid.
    Paid,
}

/// Lifecycle state of an individual payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Recorded but not yet cleared by the bank.
    Pending,
    /// Funds confirmed.
    Cleared,
    /// Cancelled; excluded from invoice aggregates.
    Canceled,
}

/// Result of settling a payment against an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSettlement {
    /// New paid amount after the payment.
    pub paid_amount: Decimal,
    /// New remaining amount (total minus paid).
    pub remaining_amount: Decimal,
    /// Derived invoice payment status.
    pub invoice_status: InvoicePaymentStatus,
    /// Final state for the payment row. A requested `Pending` is promoted
    /// to `Cleared` when the payment completes the invoice.
    pub payment_state: PaymentState,
}

/// Invoice aggregates after a payment has been reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReversedAggregates {
    /// Paid amount after removing the payment.
    pub paid_amount: Decimal,
    /// Remaining amount after removing the payment.
    pub remaining_amount: Decimal,
    /// Payment status re-derived from the post-reversal totals.
    pub invoice_status: InvoicePaymentStatus,
}

/// Derives an invoice's payment status from its aggregates.
#[must_use]
pub fn payment_status(total: Decimal, paid: Decimal) -> InvoicePaymentStatus {
    if total - paid <= Decimal::ZERO {
        InvoicePaymentStatus::Paid
    } else if paid > Decimal::ZERO {
        InvoicePaymentStatus::PartiallyPaid
    } else {
        InvoicePaymentStatus::Unpaid
    }
}

/// Validates a payment amount against the remaining balance.
///
/// # Errors
///
/// Returns `BillingError::NonPositiveAmount` for amounts `<= 0` and
/// `BillingError::ExceedsRemaining` for amounts above the remaining balance.
pub fn validate_payment_amount(amount: Decimal, remaining: Decimal) -> Result<(), BillingError> {
    if amount <= Decimal::ZERO {
        return Err(BillingError::NonPositiveAmount);
    }
    if amount > remaining {
        return Err(BillingError::ExceedsRemaining { amount, remaining });
    }
    Ok(())
}

/// Settles a payment against an invoice's aggregates.
///
/// Computes the new paid/remaining amounts, derives the invoice status,
/// and decides the payment's final state: a payment requested as `Pending`
/// is auto-promoted to `Cleared` when it settles the invoice in full.
///
/// # Errors
///
/// Returns a `BillingError` when the amount fails validation or the
/// requested state is `Canceled`; the caller must abort its transaction
/// so no partial write is visible.
pub fn settle_payment(
    total: Decimal,
    paid: Decimal,
    amount: Decimal,
    requested_state: PaymentState,
) -> Result<PaymentSettlement, BillingError> {
    // A canceled payment is excluded from the aggregates; settling one
    // would count money that no active payment row backs.
    if requested_state == PaymentState::Canceled {
        return Err(BillingError::CanceledAtCreation);
    }
    validate_payment_amount(amount, total - paid)?;

    let paid_amount = paid + amount;
    let remaining_amount = total - paid_amount;
    let invoice_status = payment_status(total, paid_amount);

    let payment_state = match (invoice_status, requested_state) {
        (InvoicePaymentStatus::Paid, PaymentState::Pending) => PaymentState::Cleared,
        (_, state) => state,
    };

    Ok(PaymentSettlement {
        paid_amount,
        remaining_amount,
        invoice_status,
        payment_state,
    })
}

/// Reverses a payment, re-deriving the invoice aggregates as if the
/// payment had never happened.
///
/// The status is always re-derived from the post-reversal totals, never
/// reset to a cached prior value - other payments may have interleaved.
///
/// # Errors
///
/// Returns `BillingError::ReversalExceedsPaid` when the stored paid amount
/// is smaller than the payment being removed.
pub fn reverse_payment(
    total: Decimal,
    paid: Decimal,
    amount: Decimal,
) -> Result<ReversedAggregates, BillingError> {
    if amount > paid {
        return Err(BillingError::ReversalExceedsPaid { amount, paid });
    }

    let paid_amount = paid - amount;
    let remaining_amount = total - paid_amount;

    Ok(ReversedAggregates {
        paid_amount,
        remaining_amount,
        invoice_status: payment_status(total, paid_amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_status_derivation() {
        assert_eq!(
            payment_status(dec!(100), dec!(100)),
            InvoicePaymentStatus::Paid
        );
        assert_eq!(
            payment_status(dec!(100), dec!(40)),
            InvoicePaymentStatus::PartiallyPaid
        );
        assert_eq!(
            payment_status(dec!(100), dec!(0)),
            InvoicePaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_overpayment_rejected() {
        let result = settle_payment(dec!(50000), dec!(0), dec!(60000), PaymentState::Pending);
        assert_eq!(
            result,
            Err(BillingError::ExceedsRemaining {
                amount: dec!(60000),
                remaining: dec!(50000),
            })
        );
    }

    #[test]
    fn test_exact_full_payment_auto_clears() {
        let settlement =
            settle_payment(dec!(50000), dec!(0), dec!(50000), PaymentState::Pending).unwrap();
        assert_eq!(settlement.paid_amount, dec!(50000));
        assert_eq!(settlement.remaining_amount, dec!(0));
        assert_eq!(settlement.invoice_status, InvoicePaymentStatus::Paid);
        assert_eq!(settlement.payment_state, PaymentState::Cleared);
    }

    #[test]
    fn test_partial_payment_stays_pending() {
        let settlement =
            settle_payment(dec!(50000), dec!(0), dec!(20000), PaymentState::Pending).unwrap();
        assert_eq!(settlement.remaining_amount, dec!(30000));
        assert_eq!(
            settlement.invoice_status,
            InvoicePaymentStatus::PartiallyPaid
        );
        assert_eq!(settlement.payment_state, PaymentState::Pending);
    }

    #[test]
    fn test_cleared_request_stays_cleared() {
        let settlement =
            settle_payment(dec!(50000), dec!(30000), dec!(10000), PaymentState::Cleared).unwrap();
        assert_eq!(settlement.payment_state, PaymentState::Cleared);
    }

    #[test]
    fn test_canceled_state_rejected_at_creation() {
        let result = settle_payment(dec!(100), dec!(0), dec!(40), PaymentState::Canceled);
        assert_eq!(result, Err(BillingError::CanceledAtCreation));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert_eq!(
            settle_payment(dec!(100), dec!(0), dec!(0), PaymentState::Pending),
            Err(BillingError::NonPositiveAmount)
        );
        assert_eq!(
            settle_payment(dec!(100), dec!(0), dec!(-5), PaymentState::Pending),
            Err(BillingError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_reverse_payment_restores_aggregates() {
        let reversed = reverse_payment(dec!(100), dec!(100), dec!(60)).unwrap();
        assert_eq!(reversed.paid_amount, dec!(40));
        assert_eq!(reversed.remaining_amount, dec!(60));
        assert_eq!(reversed.invoice_status, InvoicePaymentStatus::PartiallyPaid);
    }

    #[test]
    fn test_reverse_last_payment_back_to_unpaid() {
        let reversed = reverse_payment(dec!(100), dec!(40), dec!(40)).unwrap();
        assert_eq!(reversed.paid_amount, dec!(0));
        assert_eq!(reversed.invoice_status, InvoicePaymentStatus::Unpaid);
    }

    #[test]
    fn test_reverse_more_than_paid_rejected() {
        assert_eq!(
            reverse_payment(dec!(100), dec!(30), dec!(40)),
            Err(BillingError::ReversalExceedsPaid {
                amount: dec!(40),
                paid: dec!(30),
            })
        );
    }

    // ========================================================================
    // Property: remaining amount invariant
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000).prop_map(|n| Decimal::new(n, 2))
    }

    /// (total, paid_before, amount) with paid_before <= total and
    /// amount <= total - paid_before, generated dependently so cases are
    /// valid by construction instead of rejected by assumptions.
    fn settleable_strategy() -> impl Strategy<Value = (Decimal, Decimal, Decimal)> {
        (2i64..10_000_000)
            .prop_flat_map(|total| (Just(total), 0..total))
            .prop_flat_map(|(total, paid)| (Just(total), Just(paid), 1..=total - paid))
            .prop_map(|(total, paid, amount)| {
                (
                    Decimal::new(total, 2),
                    Decimal::new(paid, 2),
                    Decimal::new(amount, 2),
                )
            })
    }

    proptest! {
        /// **Property: remaining == total - paid after every settlement**
        #[test]
        fn prop_settlement_preserves_invariant(
            total in amount_strategy(),
            amounts in prop::collection::vec(amount_strategy(), 1..10),
        ) {
            let mut paid = Decimal::ZERO;

            for amount in amounts {
                match settle_payment(total, paid, amount, PaymentState::Pending) {
                    Ok(s) => {
                        prop_assert_eq!(s.remaining_amount, total - s.paid_amount);
                        paid = s.paid_amount;
                    }
                    Err(e) => {
                        // Only over-limit amounts can fail here.
                        let over_limit = matches!(e, BillingError::ExceedsRemaining { .. });
                        prop_assert!(over_limit, "unexpected settlement error: {e}");
                    }
                }
            }
        }

        /// **Property: settle then reverse is the identity on aggregates**
        #[test]
        fn prop_settle_reverse_roundtrip(
            (total, paid_before, amount) in settleable_strategy(),
        ) {
            let settled =
                settle_payment(total, paid_before, amount, PaymentState::Pending).unwrap();
            let reversed = reverse_payment(total, settled.paid_amount, amount).unwrap();

            prop_assert_eq!(reversed.paid_amount, paid_before);
            prop_assert_eq!(reversed.remaining_amount, total - paid_before);
            prop_assert_eq!(reversed.invoice_status, payment_status(total, paid_before));
        }

        /// **Property: a settled invoice is paid iff remaining is zero**
        #[test]
        fn prop_paid_iff_remaining_zero(
            total in amount_strategy(),
            paid in amount_strategy(),
        ) {
            prop_assume!(paid <= total);
            let status = payment_status(total, paid);
            if total == paid {
                prop_assert_eq!(status, InvoicePaymentStatus::Paid);
            } else {
                prop_assert_ne!(status, InvoicePaymentStatus::Paid);
            }
        }
    }
}
