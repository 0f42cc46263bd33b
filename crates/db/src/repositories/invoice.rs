//! Invoice repository.
//!
//! The invoice total is fixed at creation from the item subtotals. The
//! payment aggregates (`paid_amount`, `remaining_amount`, `payment_status`)
//! are owned by the payment repository and never touched here after creation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait, Unchanged,
};
use uuid::Uuid;

use crate::entities::{
    invoice_items, invoices,
    sea_orm_active_enums::{InvoiceKind, InvoiceStatus, PaymentStatus},
};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Invoice number already in use.
    #[error("Invoice number already in use: {0}")]
    DuplicateNumber(String),

    /// An invoice needs at least one item.
    #[error("Invoice has no items")]
    NoItems,

    /// Item quantity must be positive.
    #[error("Item quantity must be positive")]
    NonPositiveQuantity,

    /// Item unit price must not be negative.
    #[error("Item unit price must not be negative")]
    NegativeUnitPrice,

    /// Only draft invoices can be sent.
    #[error("Invoice is already sent")]
    AlreadySent,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for a single invoice line.
#[derive(Debug, Clone)]
pub struct CreateInvoiceItemInput {
    /// Product billed, absent for service lines.
    pub product_id: Option<Uuid>,
    /// Line description.
    pub description: String,
    /// Quantity billed.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Unique invoice number.
    pub number: String,
    /// Customer display name.
    pub customer_name: String,
    /// Product or service invoice.
    pub invoice_kind: InvoiceKind,
    /// Invoice lines, at least one.
    pub items: Vec<CreateInvoiceItemInput>,
    /// User creating the invoice.
    pub created_by: Uuid,
}

/// Invoice with its items.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Invoice lines.
    pub items: Vec<invoice_items::Model>,
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft invoice with its items.
    ///
    /// The total is the sum of the item subtotals; `remaining_amount`
    /// starts equal to the total.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate number, empty or invalid items, or
    /// a database failure.
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceWithItems, InvoiceError> {
        if input.items.is_empty() {
            return Err(InvoiceError::NoItems);
        }
        for item in &input.items {
            if item.quantity <= 0 {
                return Err(InvoiceError::NonPositiveQuantity);
            }
            if item.unit_price < Decimal::ZERO {
                return Err(InvoiceError::NegativeUnitPrice);
            }
        }

        let total: Decimal = input
            .items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();

        let number = input.number.clone();
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let invoice_id = Uuid::new_v4();

        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            number: Set(input.number),
            customer_name: Set(input.customer_name),
            invoice_kind: Set(input.invoice_kind),
            status: Set(InvoiceStatus::Draft),
            total_amount: Set(total),
            paid_amount: Set(Decimal::ZERO),
            remaining_amount: Set(total),
            payment_status: Set(PaymentStatus::Unpaid),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        // The UNIQUE constraint arbitrates duplicates, including concurrent
        // ones a pre-check could not see.
        let invoice = match invoice.insert(&txn).await {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(InvoiceError::DuplicateNumber(number));
            }
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::with_capacity(input.items.len());
        for item_input in input.items {
            let subtotal = item_input.unit_price * Decimal::from(item_input.quantity);
            let item = invoice_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                product_id: Set(item_input.product_id),
                description: Set(item_input.description),
                quantity: Set(item_input.quantity),
                unit_price: Set(item_input.unit_price),
                subtotal: Set(subtotal),
                created_at: Set(now),
            };
            items.push(item.insert(&txn).await?);
        }

        txn.commit().await?;

        tracing::info!(invoice_id = %invoice.id, number = %invoice.number, %total, "invoice created");

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Marks a draft invoice as sent.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::AlreadySent` when the invoice is not a draft.
    pub async fn send_invoice(&self, id: Uuid) -> Result<invoices::Model, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        if invoice.status != InvoiceStatus::Draft {
            return Err(InvoiceError::AlreadySent);
        }

        let update = invoices::ActiveModel {
            id: Unchanged(id),
            status: Set(InvoiceStatus::Sent),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(update.update(&self.db).await?)
    }

    /// Gets an invoice by ID with its items.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` when no invoice has the ID.
    pub async fn get_invoice(&self, id: Uuid) -> Result<InvoiceWithItems, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(id))
            .all(&self.db)
            .await?;

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Lists all invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_invoices(&self) -> Result<Vec<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find()
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
