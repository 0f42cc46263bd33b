//! Stock opname repository.
//!
//! An opname is a physical count. It never mutates stock by itself: the
//! counted differences are frozen on the items, and a reconciled opname is
//! later consumed by the adjustment repository. A count without any
//! discrepancy completes immediately, with `applied_at` set since there is
//! nothing to apply.

use chrono::Utc;
use gudang_core::stock::{opname_status, OpnameCount};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{products, stock_opname_items, stock_opnames};

/// Error types for opname operations.
#[derive(Debug, thiserror::Error)]
pub enum OpnameError {
    /// Opname not found.
    #[error("Opname not found: {0}")]
    NotFound(Uuid),

    /// Opname number already in use.
    #[error("Opname number already in use: {0}")]
    DuplicateNumber(String),

    /// An opname needs at least one counted item.
    #[error("Opname has no items")]
    NoItems,

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// A physical count cannot be negative.
    #[error("Physical count cannot be negative")]
    NegativeCount,

    /// A product was counted more than once.
    #[error("Product counted twice: {0}")]
    DuplicateProduct(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for a single counted item.
#[derive(Debug, Clone)]
pub struct OpnameItemInput {
    /// Product counted.
    pub product_id: Uuid,
    /// Physical quantity found on the shelf.
    pub physical_stock: i64,
}

/// Input for creating an opname.
#[derive(Debug, Clone)]
pub struct CreateOpnameInput {
    /// Unique opname number.
    pub number: String,
    /// Counted items, at least one.
    pub items: Vec<OpnameItemInput>,
    /// User performing the count.
    pub created_by: Uuid,
}

/// Opname with its items.
#[derive(Debug, Clone)]
pub struct OpnameWithItems {
    /// Opname header.
    pub opname: stock_opnames::Model,
    /// Counted items with frozen differences.
    pub items: Vec<stock_opname_items::Model>,
}

/// Opname repository wrapping each mutation in one database transaction.
#[derive(Debug, Clone)]
pub struct OpnameRepository {
    db: DatabaseConnection,
}

impl OpnameRepository {
    /// Creates a new opname repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an opname with frozen system/physical counts per item.
    ///
    /// The status is derived from the differences: reconciled if any
    /// count differs from the system, completed otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate number, invalid items, a missing
    /// product, or a database failure.
    pub async fn create_opname(
        &self,
        input: CreateOpnameInput,
    ) -> Result<OpnameWithItems, OpnameError> {
        if input.items.is_empty() {
            return Err(OpnameError::NoItems);
        }
        let mut seen = std::collections::HashSet::new();
        for item in &input.items {
            if item.physical_stock < 0 {
                return Err(OpnameError::NegativeCount);
            }
            if !seen.insert(item.product_id) {
                return Err(OpnameError::DuplicateProduct(item.product_id));
            }
        }

        let number = input.number.clone();
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let opname_id = Uuid::new_v4();

        // Snapshot system stock inside the transaction so the frozen
        // differences match what the reconciling adjustment will see.
        let mut counts = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let product = products::Entity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or(OpnameError::ProductNotFound(item.product_id))?;
            counts.push((item.product_id, OpnameCount {
                system_stock: product.current_stock,
                physical_stock: item.physical_stock,
            }));
        }

        let status = opname_status(
            &counts
                .iter()
                .map(|(_, count)| *count)
                .collect::<Vec<OpnameCount>>(),
        );

        let opname = stock_opnames::ActiveModel {
            id: Set(opname_id),
            number: Set(input.number),
            status: Set(status.into()),
            // A clean count has nothing to apply.
            applied_at: Set(if status == gudang_core::stock::OpnameStatus::Completed {
                Some(now)
            } else {
                None
            }),
            created_by: Set(input.created_by),
            created_at: Set(now),
        };
        // The UNIQUE constraint arbitrates duplicates, including concurrent
        // ones a pre-check could not see.
        let opname = match opname.insert(&txn).await {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(OpnameError::DuplicateNumber(number));
            }
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::with_capacity(counts.len());
        for (product_id, count) in counts {
            let item = stock_opname_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                opname_id: Set(opname_id),
                product_id: Set(product_id),
                system_stock: Set(count.system_stock),
                physical_stock: Set(count.physical_stock),
                difference: Set(count.difference()),
                created_at: Set(now),
            };
            items.push(item.insert(&txn).await?);
        }

        txn.commit().await?;

        tracing::info!(
            opname_id = %opname.id,
            number = %opname.number,
            status = ?opname.status,
            item_count = items.len(),
            "opname recorded"
        );

        Ok(OpnameWithItems { opname, items })
    }

    /// Gets an opname by ID with its items.
    ///
    /// # Errors
    ///
    /// Returns `OpnameError::NotFound` when no opname has the ID.
    pub async fn get_opname(&self, id: Uuid) -> Result<OpnameWithItems, OpnameError> {
        let opname = stock_opnames::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OpnameError::NotFound(id))?;

        let items = stock_opname_items::Entity::find()
            .filter(stock_opname_items::Column::OpnameId.eq(id))
            .all(&self.db)
            .await?;

        Ok(OpnameWithItems { opname, items })
    }

    /// Lists all opnames, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_opnames(&self) -> Result<Vec<stock_opnames::Model>, OpnameError> {
        Ok(stock_opnames::Entity::find()
            .order_by_desc(stock_opnames::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
