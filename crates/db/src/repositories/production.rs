//! Production log repository.
//!
//! Creating a log applies a production_in movement; deleting one is a
//! guarded compensation, not a row removal: the log stays as the audit
//! anchor, an adjustment_out movement undoes the stock effect, and
//! `reversed_at` makes the reversal idempotent.

use chrono::Utc;
use gudang_core::stock::{MovementKind, StockDelta, StockError};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait, Unchanged,
};
use uuid::Uuid;

use crate::entities::production_logs;
use crate::repositories::stock::{apply_movement, MovementContext, StockApplyError};

/// Error types for production log operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    /// Production log not found.
    #[error("Production log not found: {0}")]
    NotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Stock rejection (insufficient stock, zero quantity).
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StockApplyError> for ProductionError {
    fn from(err: StockApplyError) -> Self {
        match err {
            StockApplyError::ProductNotFound(id) => Self::ProductNotFound(id),
            StockApplyError::Stock(e) => Self::Stock(e),
            StockApplyError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for recording a production run.
#[derive(Debug, Clone)]
pub struct CreateProductionInput {
    /// Product produced.
    pub product_id: Uuid,
    /// Quantity produced, positive.
    pub quantity: u32,
    /// Production batch code.
    pub batch_code: String,
    /// User recording the run.
    pub created_by: Uuid,
}

/// Production repository wrapping each mutation in one database transaction.
#[derive(Debug, Clone)]
pub struct ProductionRepository {
    db: DatabaseConnection,
}

impl ProductionRepository {
    /// Creates a new production repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a production run and applies the production_in movement.
    ///
    /// # Errors
    ///
    /// Returns an error when the product is missing, the quantity is zero,
    /// or a database operation fails.
    pub async fn create_log(
        &self,
        input: CreateProductionInput,
    ) -> Result<production_logs::Model, ProductionError> {
        let delta = StockDelta::new(MovementKind::ProductionIn, input.quantity)?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let log_id = Uuid::new_v4();

        let log = production_logs::ActiveModel {
            id: Set(log_id),
            product_id: Set(input.product_id),
            quantity: Set(i64::from(input.quantity)),
            batch_code: Set(input.batch_code.clone()),
            reversed_at: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
        };
        let log = log.insert(&txn).await?;

        let ctx = MovementContext::new(input.batch_code, input.created_by)
            .for_production_log(log_id);
        apply_movement(&txn, input.product_id, delta, ctx).await?;

        txn.commit().await?;

        tracing::info!(
            log_id = %log.id,
            product_id = %log.product_id,
            quantity = log.quantity,
            batch = %log.batch_code,
            "production recorded"
        );

        Ok(log)
    }

    /// Reverses a production run with a compensating adjustment_out
    /// movement.
    ///
    /// Idempotent: reversing an already-reversed log succeeds without a
    /// second compensation.
    ///
    /// # Errors
    ///
    /// Returns an error when the log is missing, the produced quantity
    /// has since been consumed (insufficient stock), or a database
    /// operation fails.
    pub async fn delete_log(
        &self,
        log_id: Uuid,
        actor_id: Uuid,
    ) -> Result<production_logs::Model, ProductionError> {
        let txn = self.db.begin().await?;

        let log = production_logs::Entity::find_by_id(log_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ProductionError::NotFound(log_id))?;

        if log.reversed_at.is_some() {
            // Already compensated, nothing left to undo.
            return Ok(log);
        }

        let magnitude = u32::try_from(log.quantity).unwrap_or(u32::MAX);
        let delta = StockDelta::new(MovementKind::AdjustmentOut, magnitude)?;
        let ctx = MovementContext::new(format!("reversal:{}", log.batch_code), actor_id)
            .for_production_log(log.id);
        apply_movement(&txn, log.product_id, delta, ctx).await?;

        let update = production_logs::ActiveModel {
            id: Unchanged(log.id),
            reversed_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };
        let reversed = update.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(log_id = %log_id, "production reversed");

        Ok(reversed)
    }

    /// Lists all production logs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_logs(&self) -> Result<Vec<production_logs::Model>, ProductionError> {
        Ok(production_logs::Entity::find()
            .order_by_desc(production_logs::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
