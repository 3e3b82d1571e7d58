//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1101,
        "error": "INTERNAL_ERROR",
        "message": "failed to retrieve customers",
        "requestId": "6f1c3c52-8a4e-4f0e-bb7e-0d1c2b3a4f5e",
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "validation failed: customerId: customer ID is required",
        "details": [{"field": "customerId", "message": "customer ID is required"}],
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "customer 'c-42' not found",
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource already exists",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "ALREADY_EXISTS",
        "message": "product 'p-1' already exists",
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Gone - Resource is inactive",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "UNAVAILABLE",
        "message": "product 'p-1' is not available",
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct GoneResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Request Timeout - Request cancelled or deadline exceeded",
    content_type = "application/json",
    example = json!({
        "code": 1007,
        "error": "REQUEST_CANCELLED",
        "message": "operation cancelled",
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct RequestTimeoutResponse(pub ErrorResponse);
