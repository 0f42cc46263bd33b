//! Product repository.

use chrono::Utc;
use gudang_core::stock::{MovementKind, StockDelta};
use gudang_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::stock::{apply_movement, MovementContext, StockApplyError};
use crate::entities::{products, stock_movements};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// SKU already in use.
    #[error("SKU already in use: {0}")]
    DuplicateSku(String),

    /// Opening stock movement rejection or failure.
    #[error(transparent)]
    Stock(#[from] StockApplyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Stock keeping unit, unique.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Opening stock on hand, recorded as an inbound adjustment movement.
    pub initial_stock: u32,
    /// Reorder threshold.
    pub min_stock: i64,
    /// User creating the product.
    pub created_by: Uuid,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product.
    ///
    /// The product starts at zero stock; any opening stock is applied as an
    /// inbound adjustment movement in the same transaction, so the balance
    /// is replayable from the ledger from the first row on.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::DuplicateSku` when the SKU is taken. Nothing
    /// is persisted on error.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        let sku = input.sku.clone();
        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(input.sku),
            name: Set(input.name),
            unit: Set(input.unit),
            current_stock: Set(0),
            min_stock: Set(input.min_stock.max(0)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let mut product = match product.insert(&txn).await {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(ProductError::DuplicateSku(sku));
            }
            Err(e) => return Err(e.into()),
        };

        if input.initial_stock > 0 {
            let delta = StockDelta::new(MovementKind::AdjustmentIn, input.initial_stock)
                .map_err(StockApplyError::from)?;
            let movement = apply_movement(
                &txn,
                product.id,
                delta,
                MovementContext::new("opening stock", input.created_by),
            )
            .await?;
            product.current_stock = movement.new_stock;
        }

        txn.commit().await?;

        tracing::info!(
            product_id = %product.id,
            sku = %product.sku,
            opening_stock = product.current_stock,
            "product created"
        );

        Ok(product)
    }

    /// Gets a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` when no product has the ID.
    pub async fn get_product(&self, id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Lists all products ordered by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_products(&self) -> Result<Vec<products::Model>, ProductError> {
        Ok(products::Entity::find()
            .order_by_asc(products::Column::Sku)
            .all(&self.db)
            .await?)
    }

    /// Lists one page of a product's movement history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` when the product does not exist.
    pub async fn movement_history(
        &self,
        product_id: Uuid,
        page: &PageRequest,
    ) -> Result<PageResponse<stock_movements::Model>, ProductError> {
        self.get_product(product_id).await?;

        let base = stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(product_id));

        let total = base.clone().count(&self.db).await?;

        let movements = base
            .order_by_desc(stock_movements::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(
            movements,
            page.page,
            page.per_page,
            total,
        ))
    }
}
