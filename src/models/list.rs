//! Paged list envelope and list filters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `{ data, count }` envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    /// Total number of matching records, across all pages
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Some(OrderDirection::Asc),
            "DESC" => Some(OrderDirection::Desc),
            _ => None,
        }
    }
}

/// Filter and paging parameters for list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
    /// Any other filter, passed through verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn order(mut self, order_by: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(order_by.into());
        self.order_direction = Some(direction);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page_number) = self.page_number {
            pairs.push(("pageNumber".to_string(), page_number.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("orderBy".to_string(), order_by.clone()));
        }
        if let Some(direction) = self.order_direction {
            pairs.push(("orderDirection".to_string(), direction.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }

    /// Parse a raw query string (without the leading `?`), percent-decoding it.
    ///
    /// Unparseable paging values are passed through as plain filters.
    pub fn from_query_str(raw: &str) -> Self {
        let mut query = Self::default();
        let raw = raw.trim_start_matches('?');
        if raw.is_empty() {
            return query;
        }
        let Ok(url) = reqwest::Url::parse(&format!("http://localhost/?{}", raw)) else {
            return query;
        };
        for (key, value) in url.query_pairs() {
            let (key, value) = (key.into_owned(), value.into_owned());
            match key.as_str() {
                "pageNumber" if value.parse::<u32>().is_ok() => {
                    query.page_number = value.parse().ok();
                }
                "pageSize" if value.parse::<u32>().is_ok() => {
                    query.page_size = value.parse().ok();
                }
                "orderBy" => query.order_by = Some(value),
                "orderDirection" if OrderDirection::parse(&value).is_some() => {
                    query.order_direction = OrderDirection::parse(&value);
                }
                _ => {
                    query.filters.insert(key, value);
                }
            }
        }
        query
    }
}
