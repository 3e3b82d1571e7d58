use catalog::filter::{eq_or_any, in_range, parse_flag, parse_number, parse_text};
use catalog::{DocumentFilter, EntityFilter, Pagination};
use mongodb::bson::Document;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::Product;

/// Predicates over products; absent predicates match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub active: Option<bool>,
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    pub pagination: Pagination,
}

impl EntityFilter<Product> for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        eq_or_any(self.active.as_ref(), &product.active)
            && (self.category.is_none() || self.category == product.category)
            && in_range(product.price, self.min_price, self.max_price)
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn set_pagination(&mut self, pagination: Pagination) {
        self.pagination = pagination;
    }

    fn only_active(mut self) -> Self {
        self.active = Some(true);
        self
    }
}

impl DocumentFilter for ProductFilter {
    fn to_document(&self) -> Document {
        let mut query = Document::new();
        if let Some(active) = self.active {
            query.insert("active", active);
        }
        if let Some(category) = &self.category {
            query.insert("category", category.as_str());
        }
        let mut price = Document::new();
        if let Some(min) = self.min_price {
            price.insert("$gte", min);
        }
        if let Some(max) = self.max_price {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            query.insert("price", price);
        }
        query
    }
}

/// Raw listing query; unparsable values are ignored rather than rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// `true` or `false`
    pub active: Option<String>,
    pub category: Option<String>,
    /// Minimum price, inclusive
    pub min_price: Option<String>,
    /// Maximum price, inclusive
    pub max_price: Option<String>,
    /// Zero-based page number
    pub page: Option<String>,
    /// Page size, 1 to 100
    pub page_size: Option<String>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        Self {
            active: parse_flag(query.active.as_deref()),
            category: parse_text(query.category.as_deref()),
            min_price: parse_number(query.min_price.as_deref()),
            max_price: parse_number(query.max_price.as_deref()),
            pagination: Pagination::from_raw(query.page.as_deref(), query.page_size.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn product(id: &str, category: Option<&str>, price: f64, active: bool) -> Product {
        serde_json::from_value(serde_json::json!({
            "productId": id,
            "name": format!("Product {id}"),
            "price": price,
            "category": category,
            "active": active
        }))
        .unwrap()
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filter = ProductFilter {
            min_price: Some(10.0),
            max_price: Some(20.0),
            ..Default::default()
        };
        assert!(filter.matches(&product("p1", None, 10.0, true)));
        assert!(filter.matches(&product("p2", None, 20.0, true)));
        assert!(!filter.matches(&product("p3", None, 20.01, true)));
        assert!(!filter.matches(&product("p4", None, 9.99, true)));
    }

    #[test]
    fn test_category_requires_value() {
        let filter = ProductFilter {
            category: Some("lighting".into()),
            ..Default::default()
        };
        assert!(filter.matches(&product("p1", Some("lighting"), 5.0, false)));
        assert!(!filter.matches(&product("p2", Some("garden"), 5.0, true)));
        assert!(!filter.matches(&product("p3", None, 5.0, true)));
    }

    #[test]
    fn test_query_parsing_is_lenient() {
        let filter = ProductFilter::from(ProductQuery {
            active: Some("true".into()),
            category: Some("  ".into()),
            min_price: Some("cheap".into()),
            max_price: Some("50".into()),
            page: Some("1".into()),
            page_size: Some("500".into()),
        });
        assert_eq!(filter.active, Some(true));
        assert_eq!(filter.category, None);
        assert_eq!(filter.min_price, None);
        assert_eq!(filter.max_price, Some(50.0));
        assert_eq!(filter.pagination, Pagination::new(1, 0));
    }

    #[test]
    fn test_to_document() {
        let filter = ProductFilter {
            active: Some(true),
            category: Some("lighting".into()),
            min_price: Some(1.0),
            max_price: Some(9.0),
            ..Default::default()
        };
        assert_eq!(
            filter.to_document(),
            doc! {
                "active": true,
                "category": "lighting",
                "price": { "$gte": 1.0, "$lte": 9.0 },
            }
        );
        assert_eq!(ProductFilter::default().to_document(), Document::new());
    }
}
