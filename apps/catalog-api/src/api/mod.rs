//! API routes, nested under `/api` by `axum_helpers::create_router`

pub mod customers;
pub mod products;
pub mod ready;

use axum::{Router, middleware};
use observability::metrics_middleware;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/customers", customers::router(state))
        .nest("/products", products::router(state))
        .merge(ready::router(state.clone()))
        .route_layer(middleware::from_fn(metrics_middleware))
}
