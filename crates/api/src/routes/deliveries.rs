//! Delivery routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use gudang_core::delivery::DeliveryStatus;
use gudang_core::stock::StockError;
use gudang_db::repositories::delivery::{
    CreateDeliveryInput, CreateDeliveryItemInput, DeliveryError, DeliveryRepository,
};

/// Creates the delivery routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deliveries", get(list_deliveries))
        .route("/deliveries", post(create_delivery))
        .route("/deliveries/{delivery_id}", get(get_delivery))
        .route("/deliveries/{delivery_id}", delete(delete_delivery))
        .route("/deliveries/{delivery_id}/status", patch(update_status))
}

/// Request body for a delivery line.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryItemRequest {
    /// Product shipped.
    pub product_id: Uuid,
    /// Quantity shipped, positive.
    pub quantity: u32,
}

/// Request body for creating a delivery.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    /// Invoice being fulfilled.
    pub invoice_id: Uuid,
    /// Items shipped, at least one.
    pub items: Vec<CreateDeliveryItemRequest>,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: DeliveryStatus,
}

/// GET `/deliveries` - List all deliveries.
async fn list_deliveries(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = DeliveryRepository::new((*state.db).clone());

    match repo.list_deliveries().await {
        Ok(deliveries) => {
            (StatusCode::OK, Json(json!({ "deliveries": deliveries }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/deliveries` - Create a delivery, deducting stock.
async fn create_delivery(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateDeliveryRequest>,
) -> impl IntoResponse {
    let repo = DeliveryRepository::new((*state.db).clone());

    let input = CreateDeliveryInput {
        invoice_id: payload.invoice_id,
        items: payload
            .items
            .into_iter()
            .map(|item| CreateDeliveryItemInput {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect(),
        created_by: auth.user_id(),
    };

    match repo.create_delivery(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({ "delivery": created.delivery, "items": created.items })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/deliveries/{delivery_id}` - Get a delivery with its items.
async fn get_delivery(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(delivery_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DeliveryRepository::new((*state.db).clone());

    match repo.get_delivery(delivery_id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(json!({ "delivery": found.delivery, "items": found.items })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// PATCH `/deliveries/{delivery_id}/status` - Move through the state machine.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(delivery_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let repo = DeliveryRepository::new((*state.db).clone());

    match repo
        .update_status(delivery_id, payload.status, auth.user_id())
        .await
    {
        Ok(delivery) => (StatusCode::OK, Json(json!(delivery))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/deliveries/{delivery_id}` - Delete a delivery, undoing stock.
async fn delete_delivery(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(delivery_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DeliveryRepository::new((*state.db).clone());

    match repo.delete_delivery(delivery_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// Maps a repository error to the JSON error envelope.
fn error_response(err: &DeliveryError) -> axum::response::Response {
    let (status, error, message) = match err {
        DeliveryError::NotFound(_) => {
            (StatusCode::NOT_FOUND, "delivery_not_found", err.to_string())
        }
        DeliveryError::InvoiceNotFound(_) => {
            (StatusCode::NOT_FOUND, "invoice_not_found", err.to_string())
        }
        DeliveryError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, "product_not_found", err.to_string())
        }
        DeliveryError::NotProductInvoice => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "not_product_invoice",
            err.to_string(),
        ),
        DeliveryError::InvoiceNotSent => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invoice_not_sent",
            err.to_string(),
        ),
        DeliveryError::InvoiceNotPaid => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invoice_not_paid",
            err.to_string(),
        ),
        DeliveryError::ActiveDeliveryExists(_) => {
            (StatusCode::CONFLICT, "active_delivery_exists", err.to_string())
        }
        DeliveryError::NoItems => (StatusCode::BAD_REQUEST, "no_items", err.to_string()),
        DeliveryError::CannotDeleteDelivered => (
            StatusCode::CONFLICT,
            "cannot_delete_delivered",
            err.to_string(),
        ),
        DeliveryError::Transition(inner) => {
            let (status, code) = match inner {
                gudang_core::delivery::DeliveryError::Terminal(_) => {
                    (StatusCode::CONFLICT, "delivery_terminal")
                }
                gudang_core::delivery::DeliveryError::InvalidTransition { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_status_transition")
                }
            };
            (status, code, err.to_string())
        }
        DeliveryError::Stock(stock) => {
            let code = match stock {
                StockError::InsufficientStock { .. } => "insufficient_stock",
                _ => "invalid_quantity",
            };
            (StatusCode::UNPROCESSABLE_ENTITY, code, err.to_string())
        }
        DeliveryError::Database(e) => {
            error!(error = %e, "delivery operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}
