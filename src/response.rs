//! JSON envelope shared by the resource endpoints (`/api/products`,
//! `/api/auth`, `/api/orders`). The `/api/functions` endpoints answer bare.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::routes::params::PageWindow;

/// Paging details for list responses; all `None` elsewhere.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn for_window(window: PageWindow, total: i64) -> Self {
        Self::new(window.page, window.per_page, total)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of pages implied by `total` and `per_page`.
    pub fn page_count(&self) -> Option<i64> {
        match (self.total, self.per_page) {
            (Some(total), Some(per_page)) if per_page > 0 => Some((total + per_page - 1) / per_page),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    /// Error body: `data` carries the details and `meta` is empty.
    pub fn failure(message: impl Into<String>, details: T) -> Self {
        Self {
            message: message.into(),
            data: Some(details),
            meta: Some(Meta::empty()),
        }
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
