//! The uniform response envelope.
//!
//! Every proxied backend call and every handler response is shaped as
//! `{ "success": bool, "data": T?, "message": string? }` so callers only
//! ever check one flag.

use serde::{Deserialize, Serialize};

/// Uniform success/data/message envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A successful envelope carrying `data` and a message for the user.
    #[must_use]
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// A successful envelope without a payload (e.g. `204 No Content`).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// A failed envelope with a user-facing message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Transform the payload, keeping the flag and message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
        }
    }
}

/// One page of a paginated backend listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

const fn default_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    /// Number of pages, given `total` and `limit`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return u64::from(!self.data.is_empty());
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

/// Listing endpoints return either a bare array or a paginated object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Page(Paginated<T>),
}

impl<T> ListPayload<T> {
    /// Normalize into a page; a bare array becomes a single complete page.
    #[must_use]
    pub fn into_page(self) -> Paginated<T> {
        match self {
            Self::Page(page) => page,
            Self::Items(items) => {
                let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
                Paginated {
                    total: u64::from(len),
                    page: 1,
                    limit: len,
                    data: items,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_data() {
        let json = serde_json::to_value(ApiResponse::<u32>::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn test_ok_carries_data() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_list_payload_accepts_bare_array() {
        let payload: ListPayload<u32> = serde_json::from_str("[1,2,3]").unwrap();
        let page = payload.into_page();
        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_list_payload_accepts_paginated_object() {
        let payload: ListPayload<u32> =
            serde_json::from_str(r#"{"data":[4],"total":21,"page":3,"limit":10}"#).unwrap();
        let page = payload.into_page();
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_map_keeps_message() {
        let mapped = ApiResponse::ok_with_message(2, "done").map(|n| n * 10);
        assert_eq!(mapped.data, Some(20));
        assert_eq!(mapped.message.as_deref(), Some("done"));
    }
}
