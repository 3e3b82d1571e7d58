//! # Catalog
//!
//! Storage-agnostic core of the catalog services: entity and filter traits,
//! the filter & pagination engine, the [`Repository`] abstraction with
//! in-memory and MongoDB implementations, the generic [`CatalogService`] and
//! the [`CatalogError`] taxonomy.
//!
//! ```ignore
//! use catalog::{CatalogService, InMemoryRepository, RequestContext, ServiceInfo};
//! use core_config::features::FeatureFlags;
//!
//! let service = CatalogService::new(
//!     InMemoryRepository::<Customer>::new(),
//!     ServiceInfo::new("customer-api", "1.0.0", "development"),
//!     FeatureFlags::disabled(),
//! );
//! let customer = service.get_one(&RequestContext::background(), "c-1").await?;
//! ```

pub mod context;
pub mod entity;
pub mod error;
pub mod filter;
pub mod http;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;

pub use context::RequestContext;
pub use entity::{validate_key, validate_name, Entity};
pub use error::{CatalogError, CatalogResult, ErrorKind, Violation};
pub use filter::{EntityFilter, Pagination, MAX_PAGE_SIZE};
pub use memory::InMemoryRepository;
pub use models::{HealthSnapshot, HealthStatus, Listing, MetricsSnapshot, ServiceInfo};
pub use mongo::{decode_document, encode_document, DocumentFilter, MongoEntity, MongoRepository};
pub use repository::{Page, Repository};
pub use service::CatalogService;
