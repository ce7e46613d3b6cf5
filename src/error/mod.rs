use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API response error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid price data: {message}")]
    InvalidPriceData { message: String },

    #[error("Insufficient price data: {points} point(s), at least 2 are required to compute a standard deviation")]
    InsufficientData { points: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlertError {
    /// Transport failures, non-success statuses and undecodable bodies.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AlertError::Http(_) | AlertError::Api { .. } | AlertError::Json(_)
        )
    }

    pub fn invalid_price(message: impl Into<String>) -> Self {
        AlertError::InvalidPriceData {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
