//! Invoice routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use gudang_db::entities::sea_orm_active_enums::InvoiceKind;
use gudang_db::repositories::invoice::{
    CreateInvoiceInput, CreateInvoiceItemInput, InvoiceError, InvoiceRepository,
};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{invoice_id}", get(get_invoice))
        .route("/invoices/{invoice_id}/send", post(send_invoice))
}

/// Request body for an invoice line.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Product billed, absent for service lines.
    pub product_id: Option<Uuid>,
    /// Line description.
    pub description: String,
    /// Quantity billed.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Unique invoice number.
    pub number: String,
    /// Customer display name.
    pub customer_name: String,
    /// "product" or "service".
    pub invoice_kind: InvoiceKind,
    /// Invoice lines, at least one.
    pub items: Vec<CreateItemRequest>,
}

/// GET `/invoices` - List all invoices.
async fn list_invoices(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.list_invoices().await {
        Ok(invoices) => (StatusCode::OK, Json(json!({ "invoices": invoices }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/invoices` - Create a draft invoice.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    let input = CreateInvoiceInput {
        number: payload.number,
        customer_name: payload.customer_name,
        invoice_kind: payload.invoice_kind,
        items: payload
            .items
            .into_iter()
            .map(|item| CreateInvoiceItemInput {
                product_id: item.product_id,
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
        created_by: auth.user_id(),
    };

    match repo.create_invoice(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({ "invoice": created.invoice, "items": created.items })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/invoices/{invoice_id}` - Get an invoice with its items.
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.get_invoice(invoice_id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(json!({ "invoice": found.invoice, "items": found.items })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/invoices/{invoice_id}/send` - Mark a draft invoice as sent.
async fn send_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.send_invoice(invoice_id).await {
        Ok(invoice) => (StatusCode::OK, Json(json!(invoice))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Maps a repository error to the JSON error envelope.
fn error_response(err: &InvoiceError) -> axum::response::Response {
    let (status, error, message) = match err {
        InvoiceError::NotFound(_) => (StatusCode::NOT_FOUND, "invoice_not_found", err.to_string()),
        InvoiceError::DuplicateNumber(_) => {
            (StatusCode::CONFLICT, "duplicate_number", err.to_string())
        }
        InvoiceError::NoItems => (StatusCode::BAD_REQUEST, "no_items", err.to_string()),
        InvoiceError::NonPositiveQuantity => {
            (StatusCode::BAD_REQUEST, "invalid_quantity", err.to_string())
        }
        InvoiceError::NegativeUnitPrice => {
            (StatusCode::BAD_REQUEST, "invalid_unit_price", err.to_string())
        }
        InvoiceError::AlreadySent => (StatusCode::CONFLICT, "already_sent", err.to_string()),
        InvoiceError::Database(e) => {
            error!(error = %e, "invoice operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}
