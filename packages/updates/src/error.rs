//! Error types for update checks

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Update site returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid release data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Check timed out after {0:?}")]
    Timeout(Duration),

    #[error("Check aborted: {0}")]
    Aborted(String),
}
