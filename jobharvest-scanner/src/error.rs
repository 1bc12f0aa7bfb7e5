use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Render service error (status {status}): {message}")]
    RemoteService { status: u16, message: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// Network-level failures that should push the cascade to its next tier
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScanError::HttpError(_) | ScanError::RemoteService { .. } | ScanError::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
