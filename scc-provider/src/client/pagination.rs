//! Cursor pagination
//!
//! Collection responses carry `limit`, `total_count` and a `next` link
//! whose `start` token is passed back to fetch the following page.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ApiRequest, SccClient};
use crate::error::{ApiError, ApiResult};

/// Page size requested from the service
pub const PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLink {
    pub href: Option<String>,
    pub start: Option<String>,
}

/// One page of a collection; the items sit next to the metadata under a
/// resource-specific key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    pub limit: Option<i64>,
    pub total_count: Option<i64>,
    pub next: Option<PageLink>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl Page {
    /// Take the items stored under `key`; a missing key is an empty page
    pub fn take_items<T: DeserializeOwned>(&mut self, key: &str) -> ApiResult<Vec<T>> {
        match self.rest.remove(key) {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(items) => serde_json::from_value(items).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse '{}': {}", key, e))
            }),
        }
    }

    pub fn next_start(&self) -> Option<&str> {
        self.next
            .as_ref()
            .and_then(|n| n.start.as_deref())
            .filter(|s| !s.is_empty())
    }
}

impl SccClient {
    /// Fetch every page of a collection
    pub async fn collect_pages<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        key: &str,
    ) -> ApiResult<Vec<T>> {
        let mut items = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let mut page_request = request.clone().with_query("limit", PAGE_LIMIT);
            if let Some(token) = &start {
                page_request = page_request.with_query("start", token);
            }
            let mut page: Page = self.send_json(page_request).await?;
            items.extend(page.take_items::<T>(key)?);

            let next = page.next_start().map(str::to_string);
            // A repeated cursor would never terminate
            if next.is_none() || next == start {
                break;
            }
            start = next;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_items_and_cursor() {
        let mut page: Page = serde_json::from_value(json!({
            "limit": 2,
            "total_count": 3,
            "next": {"href": "https://x/scopes?start=abc", "start": "abc"},
            "scopes": [{"id": "1"}, {"id": "2"}]
        }))
        .unwrap();
        assert_eq!(page.next_start(), Some("abc"));
        let items: Vec<serde_json::Value> = page.take_items("scopes").unwrap();
        assert_eq!(items.len(), 2);

        let mut last: Page = serde_json::from_value(json!({"limit": 2})).unwrap();
        assert_eq!(last.next_start(), None);
        assert!(last.take_items::<serde_json::Value>("scopes").unwrap().is_empty());
    }
}
