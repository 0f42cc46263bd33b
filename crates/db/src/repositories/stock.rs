//! Shared stock movement application.
//!
//! Every balance mutation in the system funnels through [`apply_movement`]:
//! lock the product row, apply the pure delta from `gudang-core`, persist the
//! new balance, then append the movement row carrying both snapshots. All of
//! it happens on the caller's open transaction, so any failure rolls back
//! the balance and the movement together.

use chrono::Utc;
use gudang_core::stock::{StockDelta, StockError, StockLevel};
use sea_orm::{
    ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait, QuerySelect, Set, Unchanged,
};
use uuid::Uuid;

use crate::entities::{products, stock_movements};

/// Error types for stock movement application.
#[derive(Debug, thiserror::Error)]
pub enum StockApplyError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Domain rejection (insufficient stock, zero quantity, overflow).
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Audit context stamped onto a movement row.
#[derive(Debug, Clone)]
pub struct MovementContext {
    /// Human-readable reference (invoice number, batch code, opname number).
    pub reference: String,
    /// User performing the mutation.
    pub actor_id: Uuid,
    /// Causing delivery, if any.
    pub delivery_id: Option<Uuid>,
    /// Causing production log, if any.
    pub production_log_id: Option<Uuid>,
    /// Causing opname item, if any.
    pub opname_item_id: Option<Uuid>,
    /// Causing manual adjustment, if any.
    pub adjustment_id: Option<Uuid>,
}

impl MovementContext {
    /// Creates a context with no causing-record link.
    #[must_use]
    pub fn new(reference: impl Into<String>, actor_id: Uuid) -> Self {
        Self {
            reference: reference.into(),
            actor_id,
            delivery_id: None,
            production_log_id: None,
            opname_item_id: None,
            adjustment_id: None,
        }
    }

    /// Links the movement to its causing delivery.
    #[must_use]
    pub fn for_delivery(mut self, delivery_id: Uuid) -> Self {
        self.delivery_id = Some(delivery_id);
        self
    }

    /// Links the movement to its causing production log.
    #[must_use]
    pub fn for_production_log(mut self, production_log_id: Uuid) -> Self {
        self.production_log_id = Some(production_log_id);
        self
    }

    /// Links the movement to its causing opname item.
    #[must_use]
    pub fn for_opname_item(mut self, opname_item_id: Uuid) -> Self {
        self.opname_item_id = Some(opname_item_id);
        self
    }

    /// Links the movement to its causing manual adjustment.
    #[must_use]
    pub fn for_adjustment(mut self, adjustment_id: Uuid) -> Self {
        self.adjustment_id = Some(adjustment_id);
        self
    }
}

/// Applies a stock delta to a product and records the paired movement.
///
/// Locks the product row for the remainder of the transaction, so two
/// concurrent mutations of the same product serialize instead of losing
/// an update.
///
/// # Errors
///
/// Returns an error if the product does not exist, the delta would take
/// stock below zero, or a database operation fails. The caller must not
/// commit after an error.
pub async fn apply_movement(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    delta: StockDelta,
    ctx: MovementContext,
) -> Result<stock_movements::Model, StockApplyError> {
    let product = products::Entity::find_by_id(product_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(StockApplyError::ProductNotFound(product_id))?;

    let mut level = StockLevel::new(product.current_stock);
    let change = level.apply(delta)?;

    let now = Utc::now().into();

    let update = products::ActiveModel {
        id: Unchanged(product.id),
        current_stock: Set(change.new),
        updated_at: Set(now),
        ..Default::default()
    };
    update.update(txn).await?;

    let movement = stock_movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        movement_kind: Set(delta.kind().into()),
        quantity: Set(delta.delta()),
        previous_stock: Set(change.previous),
        new_stock: Set(change.new),
        reference: Set(ctx.reference),
        actor_id: Set(ctx.actor_id),
        delivery_id: Set(ctx.delivery_id),
        production_log_id: Set(ctx.production_log_id),
        opname_item_id: Set(ctx.opname_item_id),
        adjustment_id: Set(ctx.adjustment_id),
        created_at: Set(now),
    };
    let recorded = movement.insert(txn).await?;

    tracing::info!(
        product_id = %product_id,
        kind = ?recorded.movement_kind,
        quantity = recorded.quantity,
        previous = recorded.previous_stock,
        new = recorded.new_stock,
        "stock movement applied"
    );

    Ok(recorded)
}
