//! Customers Domain
//!
//! The customer vertical of the catalog: the [`Customer`] entity with its
//! address and preferences, the listing filter and the HTTP router. Storage,
//! counters and health come from the `catalog` crate.
//!
//! ```rust,no_run
//! use catalog::{CatalogService, InMemoryRepository, ServiceInfo};
//! use core_config::features::FeatureFlags;
//! use domain_customers::{handlers, Customer};
//!
//! let service = CatalogService::new(
//!     InMemoryRepository::<Customer>::new(),
//!     ServiceInfo::new("customer-api", "1.0.0", "development"),
//!     FeatureFlags::disabled(),
//! );
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod filter;
pub mod handlers;
pub mod models;

pub use filter::{CustomerFilter, CustomerQuery};
pub use handlers::ApiDoc;
pub use models::{Address, Customer, CustomerSummary, Preferences};
