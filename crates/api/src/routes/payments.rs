//! Payment routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use gudang_core::billing::{BillingError, PaymentState};
use gudang_db::repositories::payment::{CreatePaymentInput, PaymentError, PaymentRepository};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{invoice_id}/payments", get(list_payments))
        .route("/invoices/{invoice_id}/payments", post(create_payment))
        .route("/payments/{payment_id}", delete(delete_payment))
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount, 0 < amount <= remaining.
    pub amount: Decimal,
    /// Requested state; defaults to pending.
    #[serde(default = "default_state")]
    pub state: PaymentState,
    /// Opaque link to a proof document.
    pub proof_url: Option<String>,
}

fn default_state() -> PaymentState {
    PaymentState::Pending
}

/// GET `/invoices/{invoice_id}/payments` - Payments of an invoice.
async fn list_payments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.list_by_invoice(invoice_id).await {
        Ok(payments) => (StatusCode::OK, Json(json!({ "payments": payments }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/invoices/{invoice_id}/payments` - Record a payment.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    let input = CreatePaymentInput {
        invoice_id,
        amount: payload.amount,
        state: payload.state,
        proof_url: payload.proof_url,
        created_by: auth.user_id(),
    };

    match repo.create_payment(input).await {
        Ok(payment) => (StatusCode::CREATED, Json(json!(payment))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/payments/{payment_id}` - Delete a payment, reversing aggregates.
async fn delete_payment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.delete_payment(payment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// Maps a repository error to the JSON error envelope.
fn error_response(err: &PaymentError) -> axum::response::Response {
    let (status, error, message) = match err {
        PaymentError::InvoiceNotFound(_) => {
            (StatusCode::NOT_FOUND, "invoice_not_found", err.to_string())
        }
        PaymentError::PaymentNotFound(_) => {
            (StatusCode::NOT_FOUND, "payment_not_found", err.to_string())
        }
        PaymentError::InvoiceNotSent => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invoice_not_sent", err.to_string())
        }
        PaymentError::Billing(billing) => {
            let code = match billing {
                BillingError::NonPositiveAmount => "invalid_amount",
                BillingError::CanceledAtCreation => "invalid_payment_state",
                BillingError::ExceedsRemaining { .. } => "exceeds_remaining",
                BillingError::ReversalExceedsPaid { .. } => "reversal_exceeds_paid",
            };
            (StatusCode::UNPROCESSABLE_ENTITY, code, err.to_string())
        }
        PaymentError::Database(e) => {
            error!(error = %e, "payment operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": error, "message": message }))).into_response()
}
