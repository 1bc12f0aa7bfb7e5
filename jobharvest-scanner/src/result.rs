use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single page as the local crawl saw it, before any parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: String,
    pub response_time: Duration,
}

impl FetchedPage {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status_code: 0,
            content_type: None,
            body: String::new(),
            response_time: Duration::from_secs(0),
        }
    }

    /// Soft blocks (403 challenge pages, 429s) still carry a body worth inspecting
    pub fn is_soft_blocked(&self) -> bool {
        matches!(self.status_code, 401 | 403 | 429 | 503)
    }
}
