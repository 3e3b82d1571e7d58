//! Readiness probe: every repository, plus MongoDB itself when configured

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use catalog::{Repository, RequestContext};
use serde_json::Value;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

async fn readiness_check(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let ctx = RequestContext::background();

    let mut checks: Vec<(&str, HealthCheckFuture)> = vec![
        (
            "customers",
            Box::pin(async { state.customers.health_check(&ctx).await.map_err(|e| e.to_string()) }),
        ),
        (
            "products",
            Box::pin(async { state.products.health_check(&ctx).await.map_err(|e| e.to_string()) }),
        ),
    ];
    if let Some(db) = &state.db {
        checks.push((
            "mongodb",
            Box::pin(async move {
                database::mongodb::check_health(db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ));
    }

    run_health_checks(checks).await
}
