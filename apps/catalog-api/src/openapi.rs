//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for both catalogs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Customer and product catalogs over in-memory or MongoDB storage"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/customers", api = domain_customers::ApiDoc),
        (path = "/api/products", api = domain_products::ApiDoc)
    )
)]
pub struct ApiDoc;
