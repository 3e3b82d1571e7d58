//! HTTP glue shared by the domain routers.
//!
//! Domain crates own routing and OpenAPI docs; the request flows themselves
//! (context creation, body extraction, error mapping, status codes) live here.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    Json,
};
use axum_helpers::{ApiError, AppError, RequestId};
use serde_json::{json, Map, Value};

use crate::context::RequestContext;
use crate::entity::Entity;
use crate::error::CatalogError;
use crate::models::{HealthSnapshot, HealthStatus, Listing, MetricsSnapshot};
use crate::repository::Repository;
use crate::service::CatalogService;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => AppError::NotFound(err.to_string()),
            CatalogError::AlreadyExists { .. } => AppError::Conflict(err.to_string()),
            CatalogError::Unavailable { .. } => AppError::Gone(err.to_string()),
            CatalogError::Cancelled => AppError::RequestTimeout(err.to_string()),
            CatalogError::ValidationFailed(ref violations) => AppError::ValidationError {
                message: err.to_string(),
                details: serde_json::to_value(violations).ok(),
            },
            CatalogError::Internal { message, .. } => AppError::InternalServerError(message),
        }
    }
}

/// Context for one HTTP request, tagged with its correlation id and bounded
/// by the service's request timeout.
pub fn request_context<E, R>(service: &CatalogService<E, R>, request_id: &RequestId) -> RequestContext
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    service.request_context(request_id.as_str())
}

/// Map a service error to a response body that echoes the request id.
pub fn api_error(request_id: &RequestId) -> impl FnOnce(CatalogError) -> ApiError + '_ {
    move |err| AppError::from(err).with_request_id(request_id.as_str())
}

/// HTTP status for a health snapshot.
pub fn health_status_code(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::PARTIAL_CONTENT,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>, request_id: &RequestId) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::from(rejection).with_request_id(request_id.as_str()))
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn get_one<E, R>(
    service: &CatalogService<E, R>,
    request_id: &RequestId,
    key: &str,
) -> Result<Json<E>, ApiError>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let ctx = request_context(service, request_id);
    let entity = service.get_one(&ctx, key).await.map_err(api_error(request_id))?;
    Ok(Json(entity))
}

/// Listing endpoint; `active_only` forces the active predicate.
pub async fn list<E, R>(
    service: &CatalogService<E, R>,
    request_id: &RequestId,
    filter: E::Filter,
    active_only: bool,
) -> Result<Json<Listing<E>>, ApiError>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let ctx = request_context(service, request_id);
    let listing = if active_only {
        service.get_active(&ctx, filter).await
    } else {
        service.get_many(&ctx, filter).await
    };
    listing.map(Json).map_err(api_error(request_id))
}

/// Create endpoint: 201 with `{"message": ..., "<keyField>": key}`.
pub async fn create<E, R>(
    service: &CatalogService<E, R>,
    request_id: &RequestId,
    payload: Result<Json<E>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let entity = read_body(payload, request_id)?;
    let ctx = request_context(service, request_id);
    let created = service.create(&ctx, entity).await.map_err(api_error(request_id))?;

    let mut body = Map::new();
    body.insert(
        "message".to_string(),
        json!(format!("{} created successfully", capitalized(E::KIND))),
    );
    body.insert(E::KEY_FIELD.to_string(), json!(created.key()));
    Ok((StatusCode::CREATED, Json(Value::Object(body))))
}

pub async fn update<E, R>(
    service: &CatalogService<E, R>,
    request_id: &RequestId,
    key: &str,
    payload: Result<Json<E>, JsonRejection>,
) -> Result<Json<E>, ApiError>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let entity = read_body(payload, request_id)?;
    let ctx = request_context(service, request_id);
    let updated = service
        .update(&ctx, key, entity)
        .await
        .map_err(api_error(request_id))?;
    Ok(Json(updated))
}

pub async fn delete<E, R>(
    service: &CatalogService<E, R>,
    request_id: &RequestId,
    key: &str,
) -> Result<StatusCode, ApiError>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let ctx = request_context(service, request_id);
    service.delete(&ctx, key).await.map_err(api_error(request_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Health endpoint: 200 healthy, 206 degraded, 503 unhealthy.
pub async fn health<E, R>(
    service: &CatalogService<E, R>,
    request_id: &RequestId,
) -> (StatusCode, Json<HealthSnapshot>)
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let snapshot = service.health_status(&request_context(service, request_id)).await;
    (health_status_code(snapshot.status), Json(snapshot))
}

pub fn metrics<E, R>(service: &CatalogService<E, R>) -> Json<MetricsSnapshot>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    Json(service.metrics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRepository;
    use crate::models::ServiceInfo;
    use crate::testing::{Widget, WidgetFilter};
    use axum::{
        body::Body,
        extract::{Path, State},
        http::Request,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use core_config::features::FeatureFlags;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    type WidgetService = Arc<CatalogService<Widget, InMemoryRepository<Widget>>>;

    async fn get_widget(
        State(service): State<WidgetService>,
        request_id: RequestId,
        Path(id): Path<String>,
    ) -> Result<Json<Widget>, ApiError> {
        get_one(&service, &request_id, &id).await
    }

    async fn list_widgets(
        State(service): State<WidgetService>,
        request_id: RequestId,
    ) -> Result<Json<Listing<Widget>>, ApiError> {
        list(&service, &request_id, WidgetFilter::default(), false).await
    }

    async fn create_widget(
        State(service): State<WidgetService>,
        request_id: RequestId,
        payload: Result<Json<Widget>, JsonRejection>,
    ) -> Result<(StatusCode, Json<Value>), ApiError> {
        create(&service, &request_id, payload).await
    }

    async fn delete_widget(
        State(service): State<WidgetService>,
        request_id: RequestId,
        Path(id): Path<String>,
    ) -> Result<StatusCode, ApiError> {
        delete(&service, &request_id, &id).await
    }

    async fn widget_health(
        State(service): State<WidgetService>,
        request_id: RequestId,
    ) -> impl IntoResponse {
        health(&service, &request_id).await
    }

    fn app() -> Router {
        let repo = InMemoryRepository::with_entities([
            Widget::new("w1", true),
            Widget::new("w2", false),
        ]);
        let service = Arc::new(CatalogService::new(
            repo,
            ServiceInfo::new("widget-api", "1.0.0", "development"),
            FeatureFlags::disabled(),
        ));

        Router::new()
            .route("/", get(list_widgets).post(create_widget))
            .route("/health", get(widget_health))
            .route("/{id}", get(get_widget).delete(delete_widget))
            .with_state(service)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_mapping() {
        let cases = [
            (CatalogError::not_found("widget", "w"), StatusCode::NOT_FOUND),
            (CatalogError::already_exists("widget", "w"), StatusCode::CONFLICT),
            (CatalogError::unavailable("widget", "w"), StatusCode::GONE),
            (CatalogError::Cancelled, StatusCode::REQUEST_TIMEOUT),
            (CatalogError::ValidationFailed(vec![]), StatusCode::BAD_REQUEST),
            (CatalogError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_health_status_codes() {
        assert_eq!(health_status_code(HealthStatus::Healthy), StatusCode::OK);
        assert_eq!(health_status_code(HealthStatus::Degraded), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            health_status_code(HealthStatus::Unhealthy),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_inactive_entity_is_gone_with_request_id() {
        let response = app()
            .oneshot(
                Request::get("/w2")
                    .header("x-request-id", "req-9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GONE);

        let json = body_json(response).await;
        assert_eq!(json["error"], "UNAVAILABLE");
        assert_eq!(json["requestId"], "req-9");
    }

    #[tokio::test]
    async fn test_create_returns_key() {
        let body = serde_json::to_vec(&Widget::new("w3", true)).unwrap();
        let response = app()
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Widget created successfully");
        assert_eq!(json["widgetId"], "w3");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_entity() {
        let body = serde_json::to_vec(&Widget::new("", true)).unwrap();
        let response = app()
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert_eq!(json["details"][0]["field"], "widget_id");
    }

    #[tokio::test]
    async fn test_malformed_body_is_client_error() {
        let response = app()
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());

        let json = body_json(response).await;
        assert_eq!(json["error"], "JSON_EXTRACTION");
        assert!(json["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let app = app();
        let response = app
            .clone()
            .oneshot(Request::delete("/w1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get("/w1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_timeout_maps_to_408() {
        let repo = InMemoryRepository::with_entities([Widget::new("w1", true)]);
        let service = Arc::new(
            CatalogService::new(
                repo,
                ServiceInfo::new("widget-api", "1.0.0", "development"),
                FeatureFlags::disabled().with_latency(1),
            )
            .with_request_timeout(Some(std::time::Duration::from_millis(5))),
        );
        let app = Router::new().route("/{id}", get(get_widget)).with_state(service.clone());

        let response = app
            .oneshot(
                Request::get("/w1")
                    .header("x-request-id", "req-slow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let json = body_json(response).await;
        assert_eq!(json["error"], "REQUEST_CANCELLED");
        assert_eq!(json["requestId"], "req-slow");
        assert_eq!(service.total_errors(), 1);
    }

    #[test]
    fn test_request_context_carries_timeout() {
        let service = CatalogService::new(
            InMemoryRepository::<Widget>::new(),
            ServiceInfo::new("widget-api", "1.0.0", "development"),
            FeatureFlags::disabled(),
        );
        assert!(service.request_context("r1").deadline().is_none());

        let service = service.with_request_timeout(Some(std::time::Duration::from_secs(1)));
        let ctx = service.request_context("r2");
        assert_eq!(ctx.request_id(), "r2");
        assert!(ctx.deadline().is_some());
    }

    #[tokio::test]
    async fn test_listing_and_health() {
        let app = app();
        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["widgets"].as_array().unwrap().len(), 2);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["total_widgets"], 2);
    }
}
