use crate::error::{ExtractionError, Result};
use url::{Url, form_urlencoded};

/// Query parameters that carry a search keyword on common job boards
pub const KEYWORD_PARAMS: &[&str] = &["q", "keywords"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub url: Url,
    /// Only the synthetic tier and JSON skill defaults use this
    pub keyword: Option<String>,
}

impl ExtractionRequest {
    pub fn new(url: Url) -> Self {
        let keyword = extract_keyword(&url);
        Self { url, keyword }
    }

    /// Validate a raw URL string; this is the one place a request is rejected
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ExtractionError::InvalidUrl("URL is required".to_string()));
        }

        let url = Url::parse(raw).map_err(|e| ExtractionError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractionError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        Ok(Self::new(url))
    }

    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword;
        self
    }
}

/// Pull a search keyword from `q`/`keywords`, or from a `<keyword>-jobs` path segment
pub fn extract_keyword(url: &Url) -> Option<String> {
    for param in KEYWORD_PARAMS {
        let value = url
            .query_pairs()
            .find(|(key, _)| key == *param)
            .map(|(_, value)| value.trim().to_string());
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return Some(value);
        }
    }

    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let slug = decode_segment(segment.strip_suffix("-jobs")?);
    let keyword = slug.replace('-', " ").trim().to_string();
    if keyword.is_empty() { None } else { Some(keyword) }
}

/// Percent-decode a path segment; `+` reads as a space, as boards emit it that way
fn decode_segment(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .map(|(key, value)| {
            if value.is_empty() {
                key.into_owned()
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
