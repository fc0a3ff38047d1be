//! Pagination types shared by every list endpoint.

use super::resource::Resource;
use serde::{Deserialize, Serialize};

/// Largest page the collaborator API will serve.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A page of records: `{ data: [...], meta: {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Pagination metadata. Only the list views read it; the dashboard ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[cfg(test)]
impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };

        Self {
            data,
            meta: PageMeta {
                total,
                page,
                limit,
                total_pages,
            },
        }
    }
}

/// Page selection plus the optional filters the list endpoints accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            status: None,
            customer_id: None,
        }
    }
}

impl PageRequest {
    /// First page with the given size, no filters.
    pub fn first(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Keep only the filters `resource` understands, with page and limit clamped.
    ///
    /// Two requests that differ only in irrelevant filters normalise to the
    /// same value, which is what the query cache keys on.
    pub fn scoped_to(&self, resource: Resource) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        let (search, status, customer_id) = match resource {
            Resource::Customers => (non_empty(&self.search), None, None),
            Resource::Deals => (None, non_empty(&self.status), non_empty(&self.customer_id)),
            Resource::Interactions => (None, None, non_empty(&self.customer_id)),
        };

        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
            search,
            status,
            customer_id,
        }
    }

    /// Query-string pairs for the collaborator API.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(customer_id) = &self.customer_id {
            pairs.push(("customerId", customer_id.clone()));
        }
        pairs
    }
}
