use catalog::filter::{contains_ignore_case, parse_flag, parse_text};
use catalog::{DocumentFilter, EntityFilter, Pagination};
use mongodb::bson::{doc, Document};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::Customer;

/// Predicates over customers; absent predicates match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub active: Option<bool>,
    /// Case-insensitive partial match on the email address
    pub email: Option<String>,
    pub customer_tier: Option<String>,
    pub pagination: Pagination,
}

impl EntityFilter<Customer> for CustomerFilter {
    fn matches(&self, customer: &Customer) -> bool {
        self.active.is_none_or(|active| customer.active == active)
            && contains_ignore_case(self.email.as_deref(), customer.email.as_deref())
            && (self.customer_tier.is_none() || self.customer_tier == customer.customer_tier)
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

impl DocumentFilter for CustomerFilter {
    fn to_document(&self) -> Document {
        let mut query = Document::new();
        if let Some(active) = self.active {
            query.insert("active", active);
        }
        if let Some(email) = &self.email {
            query.insert(
                "email",
                doc! { "$regex": regex::escape(email), "$options": "i" },
            );
        }
        if let Some(tier) = &self.customer_tier {
            query.insert("customerTier", tier.as_str());
        }
        query
    }
}

/// Raw listing query; unparsable values are ignored rather than rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// `true` or `false`
    pub active: Option<String>,
    /// Partial, case-insensitive email match
    pub email: Option<String>,
    pub customer_tier: Option<String>,
    /// Zero-based page number
    pub page: Option<String>,
    /// Page size, 1 to 100
    pub page_size: Option<String>,
}

impl From<CustomerQuery> for CustomerFilter {
    fn from(query: CustomerQuery) -> Self {
        Self {
            active: parse_flag(query.active.as_deref()),
            email: parse_text(query.email.as_deref()),
            customer_tier: parse_text(query.customer_tier.as_deref()),
            pagination: Pagination::from_raw(query.page.as_deref(), query.page_size.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, email: Option<&str>, tier: Option<&str>, active: bool) -> Customer {
        serde_json::from_value(serde_json::json!({
            "customerId": id,
            "name": format!("Customer {id}"),
            "email": email,
            "customerTier": tier,
            "active": active
        }))
        .unwrap()
    }

    #[test]
    fn test_email_is_partial_and_case_insensitive() {
        let filter = CustomerFilter {
            email: Some("ACME".into()),
            ..Default::default()
        };
        assert!(filter.matches(&customer("c1", Some("jane@acme.io"), None, true)));
        assert!(!filter.matches(&customer("c2", Some("joe@globex.com"), None, true)));
        assert!(!filter.matches(&customer("c3", None, None, true)));
    }

    #[test]
    fn test_predicates_are_anded() {
        let filter = CustomerFilter {
            active: Some(true),
            customer_tier: Some("gold".into()),
            ..Default::default()
        };
        assert!(filter.matches(&customer("c1", None, Some("gold"), true)));
        assert!(!filter.matches(&customer("c2", None, Some("gold"), false)));
        assert!(!filter.matches(&customer("c3", None, Some("silver"), true)));
        assert!(CustomerFilter::default().matches(&customer("c4", None, None, false)));
    }

    #[test]
    fn test_query_conversion() {
        let filter = CustomerFilter::from(CustomerQuery {
            active: Some("false".into()),
            email: Some(" acme ".into()),
            customer_tier: None,
            page: Some("-1".into()),
            page_size: Some("20".into()),
        });
        assert_eq!(filter.active, Some(false));
        assert_eq!(filter.email.as_deref(), Some("acme"));
        assert_eq!(filter.pagination, Pagination::new(0, 20));
    }

    #[test]
    fn test_to_document_escapes_email() {
        let filter = CustomerFilter {
            email: Some("a.b+c".into()),
            customer_tier: Some("gold".into()),
            ..Default::default()
        };
        assert_eq!(
            filter.to_document(),
            doc! {
                "email": { "$regex": "a\\.b\\+c", "$options": "i" },
                "customerTier": "gold",
            }
        );
    }
}
