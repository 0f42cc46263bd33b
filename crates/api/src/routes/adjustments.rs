//! Manual stock adjustment routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use gudang_db::repositories::adjustment::{
    AdjustmentRepository, CreateAdjustmentInput, ManualDirection,
};

use super::opnames::adjustment_error_response;

/// Creates the adjustment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/adjustments", get(list_adjustments))
        .route("/adjustments", post(create_adjustment))
}

/// Direction accepted on the wire.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionRequest {
    /// Adds stock.
    In,
    /// Removes stock.
    Out,
}

impl From<DirectionRequest> for ManualDirection {
    fn from(value: DirectionRequest) -> Self {
        match value {
            DirectionRequest::In => Self::In,
            DirectionRequest::Out => Self::Out,
        }
    }
}

/// Request body for a manual adjustment.
#[derive(Debug, Deserialize)]
pub struct CreateAdjustmentRequest {
    /// Product adjusted.
    pub product_id: Uuid,
    /// Direction of the correction.
    pub direction: DirectionRequest,
    /// Quantity moved, positive.
    pub quantity: u32,
    /// Free-text reason for the correction.
    pub reason: String,
}

/// GET `/adjustments` - List all adjustments, newest first.
async fn list_adjustments(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = AdjustmentRepository::new((*state.db).clone());

    match repo.list_adjustments().await {
        Ok(adjustments) => {
            (StatusCode::OK, Json(json!({ "adjustments": adjustments }))).into_response()
        }
        Err(e) => adjustment_error_response(&e),
    }
}

/// POST `/adjustments` - Record a manual correction with its movement.
async fn create_adjustment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAdjustmentRequest>,
) -> impl IntoResponse {
    let repo = AdjustmentRepository::new((*state.db).clone());

    let input = CreateAdjustmentInput {
        product_id: payload.product_id,
        direction: payload.direction.into(),
        quantity: payload.quantity,
        reason: payload.reason,
        created_by: auth.user_id(),
    };

    match repo.create_adjustment(input).await {
        Ok(adjustment) => (StatusCode::CREATED, Json(json!(adjustment))).into_response(),
        Err(e) => adjustment_error_response(&e),
    }
}
