use std::path::PathBuf;
use thiserror::Error;

/// Common error type for document persistence and shared plumbing
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("No document stored at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl From<String> for CommonError {
    fn from(s: String) -> Self {
        CommonError::Generic(s)
    }
}

impl From<&str> for CommonError {
    fn from(s: &str) -> Self {
        CommonError::Generic(s.to_string())
    }
}

/// Result of persistence operations
pub type CommonResult<T> = Result<T, CommonError>;
