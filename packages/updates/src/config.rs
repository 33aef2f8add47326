use crate::poller::DEFAULT_TIMEOUT;
use crate::release::LEGACY_CUTOFF;
use crate::source::GITHUB_API_BASE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Update-check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Application name used in status lines
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Running version; `"0.0"` marks a development build
    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// GitHub account and repository publishing application releases
    #[serde(default = "default_app_account")]
    pub app_account: String,

    #[serde(default = "default_app_repo")]
    pub app_repo: String,

    /// Releases older than this are never offered
    #[serde(default = "default_cutoff")]
    pub cutoff_version: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Oldest library major version that can still be read
    #[serde(default = "default_minimum_library_version")]
    pub minimum_library_version: u32,

    /// Library major version written by this build
    #[serde(default = "default_current_library_version")]
    pub current_library_version: u32,

    /// Last application version the user was told about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_version: Option<String>,
}

fn default_app_name() -> String {
    "GCS".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_app_account() -> String {
    "richardwilkes".to_string()
}

fn default_app_repo() -> String {
    "gcs".to_string()
}

fn default_cutoff() -> String {
    LEGACY_CUTOFF.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_api_base() -> String {
    GITHUB_API_BASE.to_string()
}

fn default_user_agent() -> String {
    concat!("sheetedit/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_minimum_library_version() -> u32 {
    3
}

fn default_current_library_version() -> u32 {
    4
}

impl UpdateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_version: default_app_version(),
            app_account: default_app_account(),
            app_repo: default_app_repo(),
            cutoff_version: default_cutoff(),
            timeout_secs: default_timeout_secs(),
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            minimum_library_version: default_minimum_library_version(),
            current_library_version: default_current_library_version(),
            last_seen_version: None,
        }
    }
}
