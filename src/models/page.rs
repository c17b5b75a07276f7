//! Response payloads returned by the notices backend.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Notice;

/// One page of a notice listing.
///
/// `content` is server-sorted; its order is authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    #[serde(default)]
    pub content: Vec<Notice>,

    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub total_elements: u64,
}

impl FeedPage {
    pub fn new(content: Vec<Notice>, total_pages: u32, total_elements: u64) -> Self {
        Self {
            content,
            total_pages,
            total_elements,
        }
    }
}

/// Outcome of a manual backend refresh.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Notices scraped in total
    #[serde(default)]
    pub total: u64,

    /// Newly ingested notices
    #[serde(default)]
    pub saved: u64,

    #[serde(default)]
    pub skipped: u64,

    #[serde(default)]
    pub errors: u64,
}

/// Envelope wrapping every backend response: `{success, message, data}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into an API error.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(AppError::api(
                self.message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AppError::api("response carried no data"))
    }
}
