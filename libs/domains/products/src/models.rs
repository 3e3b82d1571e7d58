use catalog::{validate_key, validate_name, Entity, MongoEntity};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::filter::ProductFilter;

fn validate_product_id(product_id: &str) -> Result<(), ValidationError> {
    validate_key(product_id, "product ID")
}

fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    validate_name(name, "product name")
}

/// Product entity, stored one document per product in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Caller-assigned unique key
    #[validate(custom(function = "validate_product_id"))]
    pub product_id: String,
    #[validate(custom(function = "validate_product_name"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "product description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "product price must be greater than 0"))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Units in stock
    #[serde(default)]
    #[validate(range(min = 0, message = "product stock cannot be negative"))]
    pub stock: i64,
    #[serde(default)]
    pub active: bool,
    /// Set by the server on creation
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Refreshed by the server on every mutation
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of a product
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: String,
    pub name: String,
    pub price: f64,
}

/// Shape of the product listing payload (documentation only)
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCatalogResponse {
    pub products: Vec<ProductSummary>,
    /// All matches, ignoring pagination
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Entity for Product {
    const KIND: &'static str = "product";
    const PLURAL: &'static str = "products";
    const KEY_FIELD: &'static str = "productId";

    type Filter = ProductFilter;
    type Summary = ProductSummary;

    fn key(&self) -> &str {
        &self.product_id
    }

    fn set_key(&mut self, key: String) {
        self.product_id = key;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }

    fn summary(&self) -> ProductSummary {
        ProductSummary {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            price: self.price,
        }
    }
}

impl MongoEntity for Product {
    fn secondary_indexes() -> Vec<(&'static str, Document)> {
        vec![
            ("idx_category", doc! { "category": 1 }),
            ("idx_price", doc! { "price": 1 }),
            ("idx_active", doc! { "active": 1 }),
        ]
    }
}
