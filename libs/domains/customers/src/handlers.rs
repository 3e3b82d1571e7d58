//! HTTP handlers for the customer catalog
//!
//! Listings of customers also report how many entries of the returned page
//! are active and inactive.

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

use crate::filter::{CustomerFilter, CustomerQuery};
use crate::models::{Address, Customer, CustomerListResponse, CustomerSummary, Preferences};

type SharedService<R> = Arc<CatalogService<Customer, R>>;

/// OpenAPI documentation for the Customers API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_customers,
        list_active_customers,
        create_customer,
        get_customer,
        update_customer,
        delete_customer,
        customer_health,
        customer_metrics,
    ),
    components(
        schemas(Customer, Address, Preferences, CustomerSummary, CustomerListResponse),
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
        (name = "Customers", description = "Customer catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the customers router over any repository.
pub fn router<R>(service: CatalogService<Customer, R>) -> Router
where
    R: Repository<Customer> + ?Sized + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_customers::<R>).post(create_customer::<R>))
        .route("/active", get(list_active_customers::<R>))
        .route("/health", get(customer_health::<R>))
        .route("/metrics", get(customer_metrics::<R>))
        .route(
            "/{id}",
            get(get_customer::<R>)
                .put(update_customer::<R>)
                .delete(delete_customer::<R>),
        )
        .with_state(shared_service)
}

/// List customers matching the query
#[utoipa::path(
    get,
    path = "",
    tag = "Customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Matching customers", body = CustomerListResponse),
        (status = 408, response = RequestTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_customers<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Listing<Customer>>, ApiError> {
    http::list(&service, &request_id, CustomerFilter::from(query), false).await
}

/// List active customers matching the query
#[utoipa::path(
    get,
    path = "/active",
    tag = "Customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Matching active customers", body = CustomerListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_active_customers<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Listing<Customer>>, ApiError> {
    http::list(&service, &request_id, CustomerFilter::from(query), true).await
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "",
    tag = "Customers",
    request_body = Customer,
    responses(
        (status = 201, description = "Customer created successfully"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_customer<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    http::create(&service, &request_id, payload).await
}

/// Get an active customer by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, response = NotFoundResponse),
        (status = 410, response = GoneResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_customer<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    http::get_one(&service, &request_id, &id).await
}

/// Replace a customer; the path ID wins over the body
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    request_body = Customer,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_customer<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Path(id): Path<String>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    http::update(&service, &request_id, &id, payload).await
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_customer<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    http::delete(&service, &request_id, &id).await
}

/// Customer service health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Customers",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 206, description = "Service is degraded"),
        (status = 503, description = "Repository is unreachable")
    )
)]
async fn customer_health<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
    request_id: RequestId,
) -> impl IntoResponse {
    http::health(&service, &request_id).await
}

/// Request and error counters of the customer service
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Customers",
    responses((status = 200, description = "Service counters"))
)]
async fn customer_metrics<R: Repository<Customer> + ?Sized>(
    State(service): State<SharedService<R>>,
) -> impl IntoResponse {
    http::metrics(&service)
}
