use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::DealStatus;

/// Criteria for searching the deal catalogue. Soft-deleted deals are always excluded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DealQueryFilter {
    pub merchant_id: Option<i64>,
    pub category_id: Option<i64>,
    pub status: Option<Vec<DealStatus>>,
    /// Substring match against the location field.
    pub location: Option<String>,
    /// Substring match against title and description.
    pub term: Option<String>,
    /// Restricts results to deals that are purchasable at this instant: approved, active, unexpired and not sold
    /// out. Used by the public storefront views.
    pub available_at: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl DealQueryFilter {
    pub fn with_merchant_id(mut self, merchant_id: i64) -> Self {
        self.merchant_id = Some(merchant_id);
        self
    }

    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_status(mut self, status: DealStatus) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_term(mut self, term: String) -> Self {
        self.term = Some(term);
        self
    }

    pub fn available_at(mut self, at: DateTime<Utc>) -> Self {
        self.available_at = Some(at);
        self
    }

    pub fn paged(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.merchant_id.is_none() &&
            self.category_id.is_none() &&
            self.status.is_none() &&
            self.location.is_none() &&
            self.term.is_none() &&
            self.available_at.is_none()
    }
}

impl Display for DealQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(merchant_id) = &self.merchant_id {
            write!(f, "merchant_id: {merchant_id}. ")?;
        }
        if let Some(category_id) = &self.category_id {
            write!(f, "category_id: {category_id}. ")?;
        }
        if let Some(statuses) = &self.status {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: [{statuses}]. ")?;
        }
        if let Some(location) = &self.location {
            write!(f, "location: {location}. ")?;
        }
        if let Some(term) = &self.term {
            write!(f, "term: {term}. ")?;
        }
        if let Some(at) = &self.available_at {
            write!(f, "available at {at}. ")?;
        }
        Ok(())
    }
}
