//! Shared application state.

use catalog::{CatalogService, InMemoryRepository, MongoRepository, Repository, ServiceInfo};
use domain_customers::Customer;
use domain_products::Product;
use mongodb::Database;
use std::sync::Arc;

use tracing::info;

use crate::config::{Config, Storage};
use crate::seed;

pub type CustomerRepository = Arc<dyn Repository<Customer>>;
pub type ProductRepository = Arc<dyn Repository<Product>>;

/// Storage handles shared by the routers and the readiness probe.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub customers: CustomerRepository,
    pub products: ProductRepository,
    /// Present when running on MongoDB
    pub db: Option<Database>,
}

impl AppState {
    /// Open the configured storage backend and build the repositories.
    pub async fn from_config(config: Config) -> eyre::Result<Self> {
        match config.storage.clone() {
            Storage::Memory { seed_sample_data } => {
                let (customers, products): (CustomerRepository, ProductRepository) =
                    if seed_sample_data {
                        info!("Using in-memory storage with sample data");
                        (Arc::new(seed::customers()), Arc::new(seed::products()))
                    } else {
                        info!("Using empty in-memory storage");
                        (
                            Arc::new(InMemoryRepository::<Customer>::new()),
                            Arc::new(InMemoryRepository::<Product>::new()),
                        )
                    };
                Ok(Self {
                    config,
                    customers,
                    products,
                    db: None,
                })
            }
            Storage::MongoDb(mongo) => {
                let db = database::mongodb::connect_with_retry(&mongo).await?;
                info!(database = %mongo.database, "Using MongoDB storage");

                let customers = MongoRepository::<Customer>::new(&db);
                customers.init_indexes().await?;
                let products = MongoRepository::<Product>::new(&db);
                products.init_indexes().await?;

                Ok(Self {
                    config,
                    customers: Arc::new(customers),
                    products: Arc::new(products),
                    db: Some(db),
                })
            }
        }
    }

    fn service_info(&self, service: &str) -> ServiceInfo {
        ServiceInfo::new(
            service,
            self.config.app.version,
            self.config.environment.as_str(),
        )
    }

    pub fn customer_service(&self) -> CatalogService<Customer> {
        CatalogService::from_arc(
            self.customers.clone(),
            self.service_info("customer-api"),
            self.config.features.clone(),
        )
        .with_request_timeout(self.config.server.request_timeout)
    }

    pub fn product_service(&self) -> CatalogService<Product> {
        CatalogService::from_arc(
            self.products.clone(),
            self.service_info("product-api"),
            self.config.features.clone(),
        )
        .with_request_timeout(self.config.server.request_timeout)
    }
}
