//! API route definitions.

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, AppState};

pub mod adjustments;
pub mod deliveries;
pub mod health;
pub mod invoices;
pub mod opnames;
pub mod payments;
pub mod production;
pub mod products;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except health requires a bearer token
    let protected_routes = Router::new()
        .merge(products::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(deliveries::routes())
        .merge(opnames::routes())
        .merge(adjustments::routes())
        .merge(production::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}
