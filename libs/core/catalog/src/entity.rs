use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use validator::{Validate, ValidationError};

use crate::filter::EntityFilter;

/// A catalog record: keyed, activatable and timestamped.
///
/// Implementors describe one vertical (customers, products). Storage, filtering
/// and the service layer are written once against this trait.
pub trait Entity:
    Clone + Debug + Serialize + DeserializeOwned + Validate + Send + Sync + Unpin + 'static
{
    /// Singular name used in messages and metric labels ("customer")
    const KIND: &'static str;
    /// Plural name used for listing payloads and collection names ("customers")
    const PLURAL: &'static str;
    /// Wire and document field holding the key ("customerId")
    const KEY_FIELD: &'static str;
    /// Listings of this entity carry active/inactive counts of the returned page
    const REPORTS_ACTIVITY: bool = false;

    type Filter: EntityFilter<Self>;
    type Summary: Serialize + Clone + Debug + PartialEq + Send + Sync + 'static;

    fn key(&self) -> &str;

    /// Replace the key, used when a path parameter is authoritative.
    fn set_key(&mut self, key: String);

    fn is_active(&self) -> bool;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);

    fn summary(&self) -> Self::Summary;
}

/// Shared rule for caller-assigned keys: present and at most 100 characters.
///
/// Intended for `#[validate(custom(function = ...))]` wrappers in domain crates.
pub fn validate_key(key: &str, label: &'static str) -> Result<(), ValidationError> {
    if key.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(format!("{label} is required").into()));
    }
    if key.chars().count() > 100 {
        return Err(ValidationError::new("length")
            .with_message(format!("{label} cannot exceed 100 characters").into()));
    }
    Ok(())
}

/// Shared rule for display names: present and at most 255 characters.
pub fn validate_name(name: &str, label: &'static str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(format!("{label} is required").into()));
    }
    if name.chars().count() > 255 {
        return Err(ValidationError::new("length")
            .with_message(format!("{label} cannot exceed 255 characters").into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_rejects_blank() {
        let err = validate_key("  ", "customer ID").unwrap_err();
        assert_eq!(err.code, "required");
        assert_eq!(err.message.unwrap(), "customer ID is required");
    }

    #[test]
    fn test_validate_key_rejects_long_keys() {
        let key = "k".repeat(101);
        let err = validate_key(&key, "product ID").unwrap_err();
        assert_eq!(err.code, "length");
    }

    #[test]
    fn test_validate_key_accepts_boundary() {
        assert!(validate_key(&"k".repeat(100), "product ID").is_ok());
        assert!(validate_key("c1", "customer ID").is_ok());
    }

    #[test]
    fn test_validate_name_limits() {
        assert!(validate_name("Widget", "product name").is_ok());
        assert!(validate_name(&"n".repeat(255), "product name").is_ok());

        let err = validate_name(&"n".repeat(256), "product name").unwrap_err();
        assert_eq!(err.message.unwrap(), "product name cannot exceed 255 characters");

        let err = validate_name("", "customer name").unwrap_err();
        assert_eq!(err.code, "required");
    }
}
