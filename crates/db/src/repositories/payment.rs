//! Payment repository.
//!
//! Both orchestrators lock the invoice row first, so concurrent payments
//! against the same invoice serialize and the aggregates never lose an
//! update. All writes happen on one transaction; any validation failure
//! rolls the whole mutation back.

use chrono::Utc;
use gudang_core::billing::{self, BillingError, InvoicePaymentStatus, PaymentState as CoreState};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged,
};
use uuid::Uuid;

use crate::entities::{
    invoices, payments,
    sea_orm_active_enums::{InvoiceStatus, PaymentState},
};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Payments are only accepted against sent invoices.
    #[error("Invoice has not been sent")]
    InvoiceNotSent,

    /// Domain rejection (non-positive amount, overpayment, over-reversal).
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Invoice being paid.
    pub invoice_id: Uuid,
    /// Amount, 0 < amount <= remaining.
    pub amount: Decimal,
    /// Requested state; pending is promoted to cleared on full payment.
    pub state: CoreState,
    /// Opaque link to a proof document.
    pub proof_url: Option<String>,
    /// User recording the payment.
    pub created_by: Uuid,
}

/// Payment repository wrapping each mutation in one database transaction.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment and updates the invoice aggregates.
    ///
    /// When the payment settles the invoice in full, this payment and any
    /// sibling pending payments are promoted to cleared, so a fully paid
    /// invoice never holds pending payments.
    ///
    /// # Errors
    ///
    /// Returns an error when the invoice is missing or unsent, the amount
    /// fails validation, or a database operation fails. Nothing is
    /// persisted on error.
    pub async fn create_payment(
        &self,
        input: CreatePaymentInput,
    ) -> Result<payments::Model, PaymentError> {
        let txn = self.db.begin().await?;

        let invoice = lock_invoice(&txn, input.invoice_id).await?;
        if invoice.status != InvoiceStatus::Sent {
            return Err(PaymentError::InvoiceNotSent);
        }

        let settlement = billing::settle_payment(
            invoice.total_amount,
            invoice.paid_amount,
            input.amount,
            input.state,
        )?;

        let now = Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice.id),
            amount: Set(input.amount),
            status: Set(settlement.payment_state.into()),
            proof_url: Set(input.proof_url),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let payment = payment.insert(&txn).await?;

        let update = invoices::ActiveModel {
            id: Unchanged(invoice.id),
            paid_amount: Set(settlement.paid_amount),
            remaining_amount: Set(settlement.remaining_amount),
            payment_status: Set(settlement.invoice_status.into()),
            updated_at: Set(now),
            ..Default::default()
        };
        update.update(&txn).await?;

        if settlement.invoice_status == InvoicePaymentStatus::Paid {
            promote_pending_payments(&txn, invoice.id).await?;
        }

        txn.commit().await?;

        tracing::info!(
            payment_id = %payment.id,
            invoice_id = %invoice.id,
            amount = %payment.amount,
            status = ?payment.status,
            "payment recorded"
        );

        Ok(payment)
    }

    /// Deletes a payment, reversing the invoice aggregates.
    ///
    /// The payment status is re-derived from the post-reversal totals;
    /// a cached prior status is never restored. Canceled payments were
    /// never counted, so deleting one touches no aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error when the payment or its invoice is missing, the
    /// reversal would exceed the paid amount, or a database operation
    /// fails.
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<(), PaymentError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;

        let invoice = lock_invoice(&txn, payment.invoice_id).await?;

        if payment.status != PaymentState::Canceled {
            let reversed = billing::reverse_payment(
                invoice.total_amount,
                invoice.paid_amount,
                payment.amount,
            )?;

            let update = invoices::ActiveModel {
                id: Unchanged(invoice.id),
                paid_amount: Set(reversed.paid_amount),
                remaining_amount: Set(reversed.remaining_amount),
                payment_status: Set(reversed.invoice_status.into()),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            };
            update.update(&txn).await?;
        }

        let amount = payment.amount;
        payment.delete(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            payment_id = %payment_id,
            invoice_id = %invoice.id,
            %amount,
            "payment deleted, aggregates reversed"
        );

        Ok(())
    }

    /// Lists the payments of an invoice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvoiceNotFound` when the invoice is missing.
    pub async fn list_by_invoice(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::InvoiceNotFound(invoice_id))?;

        Ok(payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

/// Reads an invoice under an exclusive row lock.
async fn lock_invoice(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<invoices::Model, PaymentError> {
    invoices::Entity::find_by_id(invoice_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(PaymentError::InvoiceNotFound(invoice_id))
}

/// Promotes all pending payments of a fully paid invoice to cleared.
async fn promote_pending_payments(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<(), DbErr> {
    let pending = payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .filter(payments::Column::Status.eq(PaymentState::Pending))
        .all(txn)
        .await?;

    for payment in pending {
        let update = payments::ActiveModel {
            id: Unchanged(payment.id),
            status: Set(PaymentState::Cleared),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        update.update(txn).await?;
    }

    Ok(())
}
