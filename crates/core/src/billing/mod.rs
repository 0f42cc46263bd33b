//! Invoice payment aggregates and status derivation.
//!
//! The invoice's `remaining_amount` is never trusted from storage on its
//! own: every mutation recomputes it as `total - paid`, and the payment
//! status is derived purely from those aggregates.

pub mod error;
pub mod payment;

pub use error::BillingError;
pub use payment::{
    InvoicePaymentStatus, PaymentSettlement, PaymentState, ReversedAggregates, payment_status,
    reverse_payment, settle_payment, validate_payment_amount,
};
