//! Products Domain
//!
//! The product vertical of the catalog: the [`Product`] entity, its filter and
//! the HTTP router. Storage and business rules come from the `catalog` crate.
//!
//! # Usage
//!
//! ```rust,no_run
//! use catalog::{CatalogService, MongoRepository, ServiceInfo};
//! use core_config::features::FeatureFlags;
//! use domain_products::{handlers, Product};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoRepository::<Product>::new(&db);
//! repository.init_indexes().await?;
//!
//! let service = CatalogService::new(
//!     repository,
//!     ServiceInfo::new("product-api", "1.0.0", "development"),
//!     FeatureFlags::disabled(),
//! );
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod filter;
pub mod handlers;
pub mod models;

pub use filter::{ProductFilter, ProductQuery};
pub use handlers::ApiDoc;
pub use models::{Product, ProductSummary};
