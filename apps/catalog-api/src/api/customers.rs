use axum::Router;
use domain_customers::handlers;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(state.customer_service())
}
