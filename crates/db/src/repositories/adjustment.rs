//! Stock adjustment repository.
//!
//! Covers manual in/out corrections and the consumption of reconciled
//! opnames. Applying an opname writes one opname_adjustment movement per
//! non-zero item difference, then marks the opname applied; a second
//! apply is a conflict, not a silent no-op.

use chrono::Utc;
use gudang_core::stock::{MovementKind, StockDelta, StockError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, Unchanged,
};
use uuid::Uuid;

use crate::entities::{
    sea_orm_active_enums::{AdjustmentDirection, OpnameStatus},
    stock_adjustments, stock_opname_items, stock_opnames,
};
use crate::repositories::stock::{apply_movement, MovementContext, StockApplyError};

/// Error types for adjustment operations.
#[derive(Debug, thiserror::Error)]
pub enum AdjustmentError {
    /// Opname not found.
    #[error("Opname not found: {0}")]
    OpnameNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// The opname has already been applied.
    #[error("Opname has already been applied: {0}")]
    AlreadyApplied(Uuid),

    /// Stock rejection (insufficient stock, zero quantity).
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StockApplyError> for AdjustmentError {
    fn from(err: StockApplyError) -> Self {
        match err {
            StockApplyError::ProductNotFound(id) => Self::ProductNotFound(id),
            StockApplyError::Stock(e) => Self::Stock(e),
            StockApplyError::Database(e) => Self::Database(e),
        }
    }
}

/// Direction of a manual adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualDirection {
    /// Adds stock.
    In,
    /// Removes stock.
    Out,
}

/// Input for a manual stock adjustment.
#[derive(Debug, Clone)]
pub struct CreateAdjustmentInput {
    /// Product adjusted.
    pub product_id: Uuid,
    /// Adjustment direction.
    pub direction: ManualDirection,
    /// Magnitude, positive.
    pub quantity: u32,
    /// Why the correction was made.
    pub reason: String,
    /// User making the correction.
    pub created_by: Uuid,
}

/// Adjustment repository wrapping each mutation in one database transaction.
#[derive(Debug, Clone)]
pub struct AdjustmentRepository {
    db: DatabaseConnection,
}

impl AdjustmentRepository {
    /// Creates a new adjustment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a manual in/out adjustment and applies the paired movement.
    ///
    /// # Errors
    ///
    /// Returns an error when the product is missing, the quantity is zero,
    /// an outbound correction lacks stock, or a database operation fails.
    pub async fn create_adjustment(
        &self,
        input: CreateAdjustmentInput,
    ) -> Result<stock_adjustments::Model, AdjustmentError> {
        let (kind, direction) = match input.direction {
            ManualDirection::In => (MovementKind::AdjustmentIn, AdjustmentDirection::In),
            ManualDirection::Out => (MovementKind::AdjustmentOut, AdjustmentDirection::Out),
        };
        let delta = StockDelta::new(kind, input.quantity)?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let adjustment_id = Uuid::new_v4();

        let adjustment = stock_adjustments::ActiveModel {
            id: Set(adjustment_id),
            product_id: Set(input.product_id),
            direction: Set(direction),
            quantity: Set(i64::from(input.quantity)),
            reason: Set(input.reason.clone()),
            opname_id: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
        };
        let adjustment = adjustment.insert(&txn).await?;

        let ctx =
            MovementContext::new(input.reason, input.created_by).for_adjustment(adjustment_id);
        apply_movement(&txn, input.product_id, delta, ctx).await?;

        txn.commit().await?;

        tracing::info!(
            adjustment_id = %adjustment.id,
            product_id = %input.product_id,
            direction = ?adjustment.direction,
            quantity = adjustment.quantity,
            "manual adjustment applied"
        );

        Ok(adjustment)
    }

    /// Applies a reconciled opname: one opname_adjustment movement per
    /// non-zero item difference, then the opname is marked applied and
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns `AdjustmentError::AlreadyApplied` on a second apply, and
    /// aborts entirely if any negative difference would take stock below
    /// zero.
    pub async fn apply_opname(
        &self,
        opname_id: Uuid,
        actor_id: Uuid,
    ) -> Result<stock_opnames::Model, AdjustmentError> {
        let txn = self.db.begin().await?;

        let opname = stock_opnames::Entity::find_by_id(opname_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AdjustmentError::OpnameNotFound(opname_id))?;

        if opname.applied_at.is_some() {
            return Err(AdjustmentError::AlreadyApplied(opname_id));
        }

        let items = stock_opname_items::Entity::find()
            .filter(stock_opname_items::Column::OpnameId.eq(opname_id))
            .all(&txn)
            .await?;

        let now = Utc::now().into();

        for item in items.iter().filter(|item| item.difference != 0) {
            let adjustment_id = Uuid::new_v4();
            let adjustment = stock_adjustments::ActiveModel {
                id: Set(adjustment_id),
                product_id: Set(item.product_id),
                direction: Set(AdjustmentDirection::OpnameAdjustment),
                quantity: Set(item.difference),
                reason: Set(format!("opname:{}", opname.number)),
                opname_id: Set(Some(opname_id)),
                created_by: Set(actor_id),
                created_at: Set(now),
            };
            adjustment.insert(&txn).await?;

            let delta = StockDelta::opname(item.difference)?;
            let ctx = MovementContext::new(opname.number.clone(), actor_id)
                .for_opname_item(item.id)
                .for_adjustment(adjustment_id);
            apply_movement(&txn, item.product_id, delta, ctx).await?;
        }

        let update = stock_opnames::ActiveModel {
            id: Unchanged(opname_id),
            status: Set(OpnameStatus::Completed),
            applied_at: Set(Some(now)),
            ..Default::default()
        };
        let applied = update.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            opname_id = %opname_id,
            number = %applied.number,
            "opname applied"
        );

        Ok(applied)
    }

    /// Lists all adjustments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_adjustments(&self) -> Result<Vec<stock_adjustments::Model>, AdjustmentError> {
        Ok(stock_adjustments::Entity::find()
            .order_by_desc(stock_adjustments::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
