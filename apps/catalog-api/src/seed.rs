//! Demo data for the in-memory backend

use catalog::InMemoryRepository;
use chrono::Utc;
use domain_customers::{Customer, Preferences};
use domain_products::Product;

fn customer(id: &str, name: &str, tier: Option<&str>, active: bool) -> Customer {
    let mut customer = Customer {
        customer_id: id.to_string(),
        name: name.to_string(),
        email: Some(format!("{id}@example.com")),
        phone: None,
        address: Default::default(),
        active,
        customer_tier: tier.map(str::to_string),
        preferences: Preferences::default(),
        registration_date: None,
        last_login: None,
        loyalty_points: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    if tier == Some("premium") {
        customer.loyalty_points = 5_000;
        customer.preferences.newsletter = true;
    }
    customer
}

fn product(id: &str, name: &str, category: &str, price: f64, stock: i64, active: bool) -> Product {
    Product {
        product_id: id.to_string(),
        name: name.to_string(),
        description: None,
        price,
        category: Some(category.to_string()),
        stock,
        active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn customers() -> InMemoryRepository<Customer> {
    InMemoryRepository::with_entities([
        customer("customer-1", "Juan Pérez García", Some("standard"), true),
        customer("customer-2", "María González López", Some("standard"), true),
        customer("customer-3", "Carlos Rodríguez Silva", Some("standard"), false),
        customer("customer-inactive", "Cliente Inactivo", None, false),
        customer("customer-premium", "Ana Premium VIP", Some("premium"), true),
    ])
}

pub fn products() -> InMemoryRepository<Product> {
    InMemoryRepository::with_entities([
        product("product-1", "Laptop Pro 14", "electronics", 1299.99, 25, true),
        product("product-2", "Wireless Mouse", "electronics", 29.99, 200, true),
        product("product-3", "Standing Desk", "furniture", 449.0, 12, true),
        product("product-4", "Desk Lamp", "furniture", 39.5, 0, false),
    ])
}
