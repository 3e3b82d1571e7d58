//! HTTP handlers for the product catalog

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, GoneResponse,
        InternalServerErrorResponse, NotFoundResponse, RequestTimeoutResponse,
    },
    ApiError, RequestId,
};
use catalog::{http, CatalogService, Listing, Repository};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::filter::{ProductFilter, ProductQuery};
use crate::models::{Product, ProductCatalogResponse, ProductSummary};

type SharedService<R> = Arc<CatalogService<Product, R>>;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        list_active_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        product_health,
        product_metrics,
    ),
    components(
        schemas(Product, ProductSummary, ProductCatalogResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            GoneResponse,
            RequestTimeoutResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router over any repository.
pub fn router<R>(service: CatalogService<Product, R>) -> Router
where
    R: Repository<Product> + ?Sized + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products::<R>).post(create_product::<R>))
        .route("/active", get(list_active_products::<R>))
        .route("/health", get(product_health::<R>))
        .route("/metrics", get(product_metrics::<R>))
        .route(
            "/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .with_state(shared_service)
}

/// List products matching the query
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching products", body = ProductCatalogResponse),
        (status = 408, response = RequestTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Listing<Product>>, ApiError> {
    http::list(&service, &request_id, ProductFilter::from(query), false).await
}

/// List active products matching the query
#[utoipa::path(
    get,
    path = "/active",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching active products", body = ProductCatalogResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_active_products<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Listing<Product>>, ApiError> {
    http::list(&service, &request_id, ProductFilter::from(query), true).await
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = Product,
    responses(
        (status = 201, description = "Product created successfully"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    http::create(&service, &request_id, payload).await
}

/// Get an active product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 410, response = GoneResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    http::get_one(&service, &request_id, &id).await
}

/// Replace a product; the path ID wins over the body
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = Product,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Path(id): Path<String>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    http::update(&service, &request_id, &id, payload).await
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    http::delete(&service, &request_id, &id).await
}

/// Product service health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Products",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 206, description = "Service is degraded"),
        (status = 503, description = "Repository is unreachable")
    )
)]
async fn product_health<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
) -> impl IntoResponse {
    http::health(&service, &request_id).await
}

/// Request and error counters of the product service
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Products",
    responses((status = 200, description = "Service counters"))
)]
async fn product_metrics<R: Repository<Product> + ?Sized>(
    State(service): State<SharedService<R>>,
) -> impl IntoResponse {
    http::metrics(&service)
}
