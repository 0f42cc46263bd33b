//! Delivery repository.
//!
//! Creating a delivery deducts stock (one sales_out movement per item);
//! cancelling or returning one restores it (one return_in movement per
//! item), guarded by `stock_restored_at` so a retried restoration is a
//! no-op. Everything runs on a single transaction, so an insufficient
//! stock on the last item rolls back the deductions of all earlier items.

use chrono::Utc;
use gudang_core::delivery::{DeliveryError as CoreDeliveryError, DeliveryStatus as CoreStatus};
use gudang_core::stock::{MovementKind, StockDelta, StockError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged,
};
use uuid::Uuid;

use crate::entities::{
    deliveries, delivery_items, invoices, products,
    sea_orm_active_enums::{DeliveryStatus, InvoiceKind, InvoiceStatus, PaymentStatus},
};
use crate::repositories::stock::{apply_movement, MovementContext, StockApplyError};

/// Error types for delivery operations.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Delivery not found.
    #[error("Delivery not found: {0}")]
    NotFound(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Only product invoices can be delivered.
    #[error("Service invoices cannot be delivered")]
    NotProductInvoice,

    /// The invoice has not been sent.
    #[error("Invoice has not been sent")]
    InvoiceNotSent,

    /// The invoice is not fully paid.
    #[error("Invoice is not fully paid")]
    InvoiceNotPaid,

    /// The invoice already has a delivery that is not cancelled or returned.
    #[error("Invoice already has an active delivery: {0}")]
    ActiveDeliveryExists(Uuid),

    /// A delivery needs at least one item.
    #[error("Delivery has no items")]
    NoItems,

    /// Delivered goods cannot be deleted.
    #[error("Cannot delete a delivered delivery")]
    CannotDeleteDelivered,

    /// Invalid status transition.
    #[error(transparent)]
    Transition(#[from] CoreDeliveryError),

    /// Stock rejection (insufficient stock, zero quantity).
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StockApplyError> for DeliveryError {
    fn from(err: StockApplyError) -> Self {
        match err {
            StockApplyError::ProductNotFound(id) => Self::ProductNotFound(id),
            StockApplyError::Stock(e) => Self::Stock(e),
            StockApplyError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for a single delivery line.
#[derive(Debug, Clone)]
pub struct CreateDeliveryItemInput {
    /// Product shipped.
    pub product_id: Uuid,
    /// Quantity shipped, positive.
    pub quantity: u32,
}

/// Input for creating a delivery.
#[derive(Debug, Clone)]
pub struct CreateDeliveryInput {
    /// Invoice being fulfilled.
    pub invoice_id: Uuid,
    /// Items shipped, at least one.
    pub items: Vec<CreateDeliveryItemInput>,
    /// User creating the delivery.
    pub created_by: Uuid,
}

/// Delivery with its items.
#[derive(Debug, Clone)]
pub struct DeliveryWithItems {
    /// Delivery header.
    pub delivery: deliveries::Model,
    /// Delivery lines.
    pub items: Vec<delivery_items::Model>,
}

/// Delivery repository wrapping each mutation in one database transaction.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    db: DatabaseConnection,
}

impl DeliveryRepository {
    /// Creates a new delivery repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a delivery and deducts stock for every item.
    ///
    /// Preconditions: the invoice exists, bills products, has been sent,
    /// is fully paid, and has no active delivery.
    ///
    /// # Errors
    ///
    /// Returns an error when a precondition fails or any item lacks
    /// stock; in that case no stock is deducted at all.
    pub async fn create_delivery(
        &self,
        input: CreateDeliveryInput,
    ) -> Result<DeliveryWithItems, DeliveryError> {
        if input.items.is_empty() {
            return Err(DeliveryError::NoItems);
        }

        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DeliveryError::InvoiceNotFound(input.invoice_id))?;

        if invoice.invoice_kind != InvoiceKind::Product {
            return Err(DeliveryError::NotProductInvoice);
        }
        if invoice.status != InvoiceStatus::Sent {
            return Err(DeliveryError::InvoiceNotSent);
        }
        if invoice.payment_status != PaymentStatus::Paid {
            return Err(DeliveryError::InvoiceNotPaid);
        }

        if let Some(active) = find_active_delivery(&txn, invoice.id).await? {
            return Err(DeliveryError::ActiveDeliveryExists(active.id));
        }

        let now = Utc::now().into();
        let delivery_id = Uuid::new_v4();

        let delivery = deliveries::ActiveModel {
            id: Set(delivery_id),
            invoice_id: Set(invoice.id),
            status: Set(DeliveryStatus::Pending),
            stock_restored_at: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let delivery = delivery.insert(&txn).await?;

        let mut items = Vec::with_capacity(input.items.len());
        for item_input in &input.items {
            let item = delivery_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                delivery_id: Set(delivery_id),
                product_id: Set(item_input.product_id),
                quantity: Set(i64::from(item_input.quantity)),
                created_at: Set(now),
            };
            items.push(item.insert(&txn).await?);

            let delta = StockDelta::new(MovementKind::SalesOut, item_input.quantity)?;
            let ctx = MovementContext::new(invoice.number.clone(), input.created_by)
                .for_delivery(delivery_id);
            apply_movement(&txn, item_input.product_id, delta, ctx).await?;
        }

        txn.commit().await?;

        tracing::info!(
            delivery_id = %delivery.id,
            invoice_id = %invoice.id,
            item_count = items.len(),
            "delivery created, stock deducted"
        );

        Ok(DeliveryWithItems { delivery, items })
    }

    /// Moves a delivery through its state machine.
    ///
    /// Entering CANCELLED or RETURNED restores the deducted stock exactly
    /// once; the `stock_restored_at` guard makes a retried restoration a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid transition or a database failure.
    pub async fn update_status(
        &self,
        delivery_id: Uuid,
        target: CoreStatus,
        actor_id: Uuid,
    ) -> Result<deliveries::Model, DeliveryError> {
        let txn = self.db.begin().await?;

        let delivery = deliveries::Entity::find_by_id(delivery_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DeliveryError::NotFound(delivery_id))?;

        let current: CoreStatus = delivery.status.clone().into();
        let next = current.transition_to(target)?;

        let now = Utc::now().into();
        let mut update = deliveries::ActiveModel {
            id: Unchanged(delivery.id),
            status: Set(next.into()),
            updated_at: Set(now),
            ..Default::default()
        };

        if next.restores_stock() && delivery.stock_restored_at.is_none() {
            restore_stock(&txn, &delivery, actor_id).await?;
            update.stock_restored_at = Set(Some(now));
        }

        let updated = update.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            delivery_id = %delivery_id,
            from = ?current,
            to = ?next,
            "delivery status updated"
        );

        Ok(updated)
    }

    /// Deletes a delivery, undoing its stock effect.
    ///
    /// If the stock was never restored, the deducted quantities are put
    /// back; the delivery's movement rows go away with it, so the ledger
    /// stays consistent with the balance. Delivered goods cannot be
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns an error when the delivery is missing or delivered, or a
    /// database operation fails.
    pub async fn delete_delivery(&self, delivery_id: Uuid) -> Result<(), DeliveryError> {
        let txn = self.db.begin().await?;

        let delivery = deliveries::Entity::find_by_id(delivery_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DeliveryError::NotFound(delivery_id))?;

        if delivery.status == DeliveryStatus::Delivered {
            return Err(DeliveryError::CannotDeleteDelivered);
        }

        // Restore balances directly; the paired sales_out rows are deleted
        // below, so adding inverse records here would double-count.
        if delivery.stock_restored_at.is_none() {
            let items = delivery_items::Entity::find()
                .filter(delivery_items::Column::DeliveryId.eq(delivery_id))
                .all(&txn)
                .await?;

            for item in items {
                let product = products::Entity::find_by_id(item.product_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(DeliveryError::ProductNotFound(item.product_id))?;

                let update = products::ActiveModel {
                    id: Unchanged(product.id),
                    current_stock: Set(product.current_stock + item.quantity),
                    updated_at: Set(Utc::now().into()),
                    ..Default::default()
                };
                update.update(&txn).await?;
            }
        }

        delivery.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(delivery_id = %delivery_id, "delivery deleted");

        Ok(())
    }

    /// Gets a delivery by ID with its items.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::NotFound` when no delivery has the ID.
    pub async fn get_delivery(&self, id: Uuid) -> Result<DeliveryWithItems, DeliveryError> {
        let delivery = deliveries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DeliveryError::NotFound(id))?;

        let items = delivery_items::Entity::find()
            .filter(delivery_items::Column::DeliveryId.eq(id))
            .all(&self.db)
            .await?;

        Ok(DeliveryWithItems { delivery, items })
    }

    /// Lists all deliveries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_deliveries(&self) -> Result<Vec<deliveries::Model>, DeliveryError> {
        Ok(deliveries::Entity::find()
            .order_by_desc(deliveries::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

/// Finds a delivery of the invoice that is not cancelled or returned.
async fn find_active_delivery(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<Option<deliveries::Model>, DbErr> {
    deliveries::Entity::find()
        .filter(deliveries::Column::InvoiceId.eq(invoice_id))
        .filter(deliveries::Column::Status.is_not_in([
            DeliveryStatus::Cancelled,
            DeliveryStatus::Returned,
        ]))
        .one(txn)
        .await
}

/// Applies one return_in movement per delivery item.
async fn restore_stock(
    txn: &DatabaseTransaction,
    delivery: &deliveries::Model,
    actor_id: Uuid,
) -> Result<(), DeliveryError> {
    let items = delivery_items::Entity::find()
        .filter(delivery_items::Column::DeliveryId.eq(delivery.id))
        .all(txn)
        .await?;

    for item in items {
        let magnitude = u32::try_from(item.quantity).unwrap_or(u32::MAX);
        let delta = StockDelta::new(MovementKind::ReturnIn, magnitude)?;
        let ctx = MovementContext::new(format!("delivery:{}", delivery.id), actor_id)
            .for_delivery(delivery.id);
        apply_movement(txn, item.product_id, delta, ctx).await?;
    }

    Ok(())
}
