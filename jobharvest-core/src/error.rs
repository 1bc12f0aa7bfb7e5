use thiserror::Error;

/// The only failures the cascade reports to its caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Extraction cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
