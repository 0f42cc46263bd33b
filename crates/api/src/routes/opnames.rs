//! Stock opname routes.

use axum::{
    extract::{Path, State},
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
use gudang_db::repositories::adjustment::{AdjustmentError, AdjustmentRepository};
use gudang_db::repositories::opname::{
    CreateOpnameInput, OpnameError, OpnameItemInput, OpnameRepository,
};

/// Creates the opname routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/opnames", get(list_opnames))
        .route("/opnames", post(create_opname))
        .route("/opnames/{opname_id}", get(get_opname))
        .route("/opnames/{opname_id}/apply", post(apply_opname))
}

/// Request body for a counted item.
#[derive(Debug, Deserialize)]
pub struct OpnameItemRequest {
    /// Product counted.
    pub product_id: Uuid,
    /// Physical quantity found on the shelf, non-negative.
    pub physical_stock: i64,
}

/// Request body for creating an opname.
#[derive(Debug, Deserialize)]
pub struct CreateOpnameRequest {
    /// Unique opname number.
    pub number: String,
    /// Counted items, at least one.
    pub items: Vec<OpnameItemRequest>,
}

/// GET `/opnames` - List all opnames.
async fn list_opnames(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = OpnameRepository::new((*state.db).clone());

    match repo.list_opnames().await {
        Ok(opnames) => (StatusCode::OK, Json(json!({ "opnames": opnames }))).into_response(),
        Err(e) => opname_error_response(&e),
    }
}

/// POST `/opnames` - Record a count session with frozen differences.
async fn create_opname(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateOpnameRequest>,
) -> impl IntoResponse {
    let repo = OpnameRepository::new((*state.db).clone());

    let input = CreateOpnameInput {
        number: payload.number,
        items: payload
            .items
            .into_iter()
            .map(|item| OpnameItemInput {
                product_id: item.product_id,
                physical_stock: item.physical_stock,
            })
            .collect(),
        created_by: auth.user_id(),
    };

    match repo.create_opname(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({ "opname": created.opname, "items": created.items })),
        )
            .into_response(),
        Err(e) => opname_error_response(&e),
    }
}

/// GET `/opnames/{opname_id}` - Get an opname with its items.
async fn get_opname(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(opname_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OpnameRepository::new((*state.db).clone());

    match repo.get_opname(opname_id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(json!({ "opname": found.opname, "items": found.items })),
        )
            .into_response(),
        Err(e) => opname_error_response(&e),
    }
}

/// POST `/opnames/{opname_id}/apply` - Reconcile book stock to the count.
async fn apply_opname(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(opname_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AdjustmentRepository::new((*state.db).clone());

    match repo.apply_opname(opname_id, auth.user_id()).await {
        Ok(opname) => (StatusCode::OK, Json(json!(opname))).into_response(),
        Err(e) => adjustment_error_response(&e),
    }
}

/// Maps an opname repository error to the JSON error envelope.
fn opname_error_response(err: &OpnameError) -> axum::response::Response {
    let (status, error, message) = match err {
        OpnameError::NotFound(_) => (StatusCode::NOT_FOUND, "opname_not_found", err.to_string()),
        OpnameError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, "product_not_found", err.to_string())
        }
        OpnameError::DuplicateNumber(_) => {
            (StatusCode::CONFLICT, "duplicate_opname_number", err.to_string())
        }
        OpnameError::NoItems => (StatusCode::BAD_REQUEST, "no_items", err.to_string()),
        OpnameError::NegativeCount => {
            (StatusCode::BAD_REQUEST, "negative_count", err.to_string())
        }
        OpnameError::DuplicateProduct(_) => {
            (StatusCode::BAD_REQUEST, "duplicate_product", err.to_string())
        }
        OpnameError::Database(e) => {
            error!(error = %e, "opname operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// Maps an adjustment repository error to the JSON error envelope.
pub(super) fn adjustment_error_response(err: &AdjustmentError) -> axum::response::Response {
    let (status, error, message) = match err {
        AdjustmentError::OpnameNotFound(_) => {
            (StatusCode::NOT_FOUND, "opname_not_found", err.to_string())
        }
        AdjustmentError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, "product_not_found", err.to_string())
        }
        AdjustmentError::AlreadyApplied(_) => {
            (StatusCode::CONFLICT, "opname_already_applied", err.to_string())
        }
        AdjustmentError::Stock(stock) => {
            let code = match stock {
                gudang_core::stock::StockError::InsufficientStock { .. } => "insufficient_stock",
                _ => "invalid_quantity",
            };
            (StatusCode::UNPROCESSABLE_ENTITY, code, err.to_string())
        }
        AdjustmentError::Database(e) => {
            error!(error = %e, "adjustment operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}
