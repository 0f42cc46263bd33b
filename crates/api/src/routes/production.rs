//! Production log routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use gudang_core::stock::StockError;
use gudang_db::repositories::production::{
    CreateProductionInput, ProductionError, ProductionRepository,
};

/// Creates the production log routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/production-logs", get(list_logs))
        .route("/production-logs", post(create_log))
        .route("/production-logs/{log_id}", delete(delete_log))
}

/// Request body for recording a production run.
#[derive(Debug, Deserialize)]
pub struct CreateProductionRequest {
    /// Product produced.
    pub product_id: Uuid,
    /// Quantity produced, positive.
    pub quantity: u32,
    /// Batch code for traceability.
    pub batch_code: String,
}

/// GET `/production-logs` - List production runs, newest first.
async fn list_logs(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ProductionRepository::new((*state.db).clone());

    match repo.list_logs().await {
        Ok(logs) => (StatusCode::OK, Json(json!({ "production_logs": logs }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/production-logs` - Record a run and add its output to stock.
async fn create_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProductionRequest>,
) -> impl IntoResponse {
    let repo = ProductionRepository::new((*state.db).clone());

    let input = CreateProductionInput {
        product_id: payload.product_id,
        quantity: payload.quantity,
        batch_code: payload.batch_code,
        created_by: auth.user_id(),
    };

    match repo.create_log(input).await {
        Ok(log) => (StatusCode::CREATED, Json(json!(log))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/production-logs/{log_id}` - Reverse a run, keeping the record.
async fn delete_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(log_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductionRepository::new((*state.db).clone());

    match repo.delete_log(log_id, auth.user_id()).await {
        Ok(log) => (StatusCode::OK, Json(json!(log))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Maps a repository error to the JSON error envelope.
fn error_response(err: &ProductionError) -> axum::response::Response {
    let (status, error, message) = match err {
        ProductionError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            "production_log_not_found",
            err.to_string(),
        ),
        ProductionError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, "product_not_found", err.to_string())
        }
        ProductionError::Stock(stock) => {
            let code = match stock {
                StockError::InsufficientStock { .. } => "insufficient_stock",
                _ => "invalid_quantity",
            };
            (StatusCode::UNPROCESSABLE_ENTITY, code, err.to_string())
        }
        ProductionError::Database(e) => {
            error!(error = %e, "production operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}
