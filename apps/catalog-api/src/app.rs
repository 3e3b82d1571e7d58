use axum::{Router, routing::get};
use axum_helpers::{create_router, health_router};
use observability::metrics_handler;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Full HTTP surface: `/api/...`, `/health`, `/metrics` and Swagger UI.
pub fn build_router(state: &AppState, cors: CorsLayer) -> Router {
    create_router::<ApiDoc>(api::routes(state), cors)
        .merge(health_router(state.config.app))
        .route("/metrics", get(metrics_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, Storage};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use core_config::{app_info, features::FeatureFlags, server::ServerConfig};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> Router {
        let config = Config {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Development,
            features: FeatureFlags::disabled(),
            storage: Storage::Memory {
                seed_sample_data: true,
            },
        };
        let state = AppState::from_config(config).await.unwrap();
        build_router(&state, CorsLayer::permissive())
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_both_catalogs_are_mounted() {
        let app = app().await;

        let json = body_json(get(&app, "/api/customers").await).await;
        assert_eq!(json["total"], 5);
        assert_eq!(json["active_count"], 3);

        let json = body_json(get(&app, "/api/products?category=furniture").await).await;
        assert_eq!(json["total"], 2);

        let response = get(&app, "/api/customers/customer-3").await;
        assert_eq!(response.status(), StatusCode::GONE);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_liveness_and_readiness() {
        let app = app().await;

        assert_eq!(get(&app, "/health").await.status(), StatusCode::OK);

        let response = get(&app, "/api/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ready");
        assert_eq!(json["customers"], "connected");
        assert!(json.get("mongodb").is_none());
    }

    #[tokio::test]
    async fn test_catalog_health_endpoints() {
        let app = app().await;

        let json = body_json(get(&app, "/api/customers/health").await).await;
        assert_eq!(json["service"], "customer-api");
        assert_eq!(json["total_customers"], 5);
        assert_eq!(json["active_customers"], 3);

        let json = body_json(get(&app, "/api/products/metrics").await).await;
        assert_eq!(json["service"], "product-api");
        assert_eq!(json["total_requests"], 0);
    }

    #[tokio::test]
    async fn test_openapi_document_lists_both_catalogs() {
        let app = app().await;
        let json = body_json(get(&app, "/api-docs/openapi.json").await).await;
        assert!(json["paths"].get("/api/customers").is_some());
        assert!(json["paths"].get("/api/products/{id}").is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = app().await;
        let response = get(&app, "/api/orders").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "NOT_FOUND");
    }
}
