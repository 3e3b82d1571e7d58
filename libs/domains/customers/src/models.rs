use catalog::{validate_key, validate_name, Entity, MongoEntity};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::filter::CustomerFilter;

fn validate_customer_id(customer_id: &str) -> Result<(), ValidationError> {
    validate_key(customer_id, "customer ID")
}

fn validate_customer_name(name: &str) -> Result<(), ValidationError> {
    validate_name(name, "customer name")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Preferences {
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default)]
    pub notifications: bool,
}

/// Customer entity, stored one document per customer in the `customers` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Caller-assigned unique key
    #[validate(custom(function = "validate_customer_id"))]
    pub customer_id: String,
    #[validate(custom(function = "validate_customer_name"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 320, message = "customer email cannot exceed 320 characters"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub active: bool,
    /// Loyalty tier such as `gold` or `silver`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_tier: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0, message = "customer loyalty points cannot be negative"))]
    pub loyalty_points: i64,
    /// Set by the server on creation
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Refreshed by the server on every mutation
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of a customer
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub customer_id: String,
    pub name: String,
    pub active: bool,
}

/// Shape of the customer listing payload (documentation only)
#[derive(Serialize, ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerSummary>,
    /// All matches, ignoring pagination
    pub total: u64,
    /// Active customers on the returned page
    pub active_count: u64,
    /// Inactive customers on the returned page
    pub inactive_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Entity for Customer {
    const KIND: &'static str = "customer";
    const PLURAL: &'static str = "customers";
    const KEY_FIELD: &'static str = "customerId";
    const REPORTS_ACTIVITY: bool = true;

    type Filter = CustomerFilter;
    type Summary = CustomerSummary;

    fn key(&self) -> &str {
        &self.customer_id
    }

    fn set_key(&mut self, key: String) {
        self.customer_id = key;
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

    fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            customer_id: self.customer_id.clone(),
            name: self.name.clone(),
            active: self.active,
        }
    }
}

impl MongoEntity for Customer {
    const DATE_FIELDS: &'static [&'static str] =
        &["createdAt", "updatedAt", "registrationDate", "lastLogin"];

    fn secondary_indexes() -> Vec<(&'static str, Document)> {
        vec![
            ("idx_email", doc! { "email": 1 }),
            ("idx_customer_tier", doc! { "customerTier": 1 }),
            ("idx_active", doc! { "active": 1 }),
        ]
    }
}
