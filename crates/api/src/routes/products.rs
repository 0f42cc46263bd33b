//! Product routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use gudang_db::repositories::product::{CreateProductInput, ProductError, ProductRepository};
use gudang_db::repositories::stock::StockApplyError;
use gudang_shared::types::PageRequest;

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/{product_id}", get(get_product))
        .route("/products/{product_id}/movements", get(list_movements))
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Stock keeping unit, unique.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit of measure.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Opening stock on hand.
    #[serde(default)]
    pub initial_stock: u32,
    /// Reorder threshold.
    #[serde(default)]
    pub min_stock: i64,
}

fn default_unit() -> String {
    "pcs".to_string()
}

/// GET `/products` - List all products.
async fn list_products(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list_products().await {
        Ok(products) => (StatusCode::OK, Json(json!({ "products": products }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    let input = CreateProductInput {
        sku: payload.sku,
        name: payload.name,
        unit: payload.unit,
        initial_stock: payload.initial_stock,
        min_stock: payload.min_stock,
        created_by: auth.user_id(),
    };

    match repo.create_product(input).await {
        Ok(product) => (StatusCode::CREATED, Json(json!(product))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/products/{product_id}` - Get a product.
async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.get_product(product_id).await {
        Ok(product) => (StatusCode::OK, Json(json!(product))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/products/{product_id}/movements` - Movement history, newest first,
/// paginated.
async fn list_movements(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(product_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.movement_history(product_id, &page).await {
        Ok(movements) => (StatusCode::OK, Json(json!(movements))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Maps a repository error to the JSON error envelope.
fn error_response(err: &ProductError) -> axum::response::Response {
    let (status, error, message) = match err {
        ProductError::NotFound(_) => (StatusCode::NOT_FOUND, "product_not_found", err.to_string()),
        ProductError::DuplicateSku(_) => (StatusCode::CONFLICT, "duplicate_sku", err.to_string()),
        ProductError::Stock(StockApplyError::Database(e)) => {
            error!(error = %e, "product operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
        ProductError::Stock(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_quantity",
            err.to_string(),
        ),
        ProductError::Database(e) => {
            error!(error = %e, "product operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}
