use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Malformed data in '{section}': {reason}")]
    MalformedData { section: String, reason: String },
    #[error("Login failed: {0}")]
    LoginFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl AppError {
    pub fn malformed(section: &str, reason: impl ToString) -> Self {
        AppError::MalformedData {
            section: section.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Transport-level failures: the next poll tick retries naturally.
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            AppError::Parse(value.to_string())
        } else {
            AppError::Network(value.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Parse(value.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::TokenStore(value.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(value: url::ParseError) -> Self {
        AppError::Config(value.to_string())
    }
}
