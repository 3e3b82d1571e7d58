//! Minimal entity used by the unit tests of this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entity::{validate_key, Entity};
use crate::filter::{eq_or_any, EntityFilter, Pagination};

fn validate_widget_id(id: &str) -> Result<(), ValidationError> {
    validate_key(id, "widget ID")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[validate(custom(function = "validate_widget_id"))]
    pub widget_id: String,
    #[validate(length(min = 1, message = "widget name is required"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Widget {
    pub fn new(id: &str, active: bool) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Self {
            widget_id: id.to_string(),
            name: format!("Widget {id}"),
            note: None,
            active,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetSummary {
    pub widget_id: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WidgetFilter {
    pub active: Option<bool>,
    pub pagination: Pagination,
}

impl EntityFilter<Widget> for WidgetFilter {
    fn matches(&self, widget: &Widget) -> bool {
        eq_or_any(self.active.as_ref(), &widget.active)
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

impl Entity for Widget {
    const KIND: &'static str = "widget";
    const PLURAL: &'static str = "widgets";
    const KEY_FIELD: &'static str = "widgetId";
    const REPORTS_ACTIVITY: bool = true;

    type Filter = WidgetFilter;
    type Summary = WidgetSummary;

    fn key(&self) -> &str {
        &self.widget_id
    }

    fn set_key(&mut self, key: String) {
        self.widget_id = key;
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

    fn summary(&self) -> WidgetSummary {
        WidgetSummary {
            widget_id: self.widget_id.clone(),
            active: self.active,
        }
    }
}
