//! Where releases come from.
//!
//! [`GitHubReleases`] reads the releases of one repository through the
//! GitHub REST API. Timeouts are enforced by the poller, not here.

use crate::version::tag_version;
use crate::{Release, UpdateError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch every published release, in any order
    async fn fetch_releases(&self) -> Result<Vec<Release>, UpdateError>;

    /// Human description for logs
    fn describe(&self) -> String;
}

#[derive(Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
}

/// Releases of `account/repo` on GitHub
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    client: Client,
    api_base: String,
    account: String,
    repo: String,
    user_agent: String,
}

impl GitHubReleases {
    pub fn new(account: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: GITHUB_API_BASE.to_string(),
            account: account.into(),
            repo: repo.into(),
            user_agent: concat!("sheetedit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn url(&self) -> String {
        format!("{}/repos/{}/{}/releases", self.api_base, self.account, self.repo)
    }
}

/// Convert API payloads to releases. Drafts, pre-releases and tags that are
/// not of the form `v<version>` are dropped.
fn convert(payload: Vec<GitHubRelease>) -> Vec<Release> {
    payload
        .into_iter()
        .filter(|release| !release.draft && !release.prerelease)
        .filter_map(|release| {
            let version = tag_version(&release.tag_name)?.to_string();
            Some(Release {
                version,
                notes: release.body.unwrap_or_default(),
                published_at: release.published_at,
            })
        })
        .collect()
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    async fn fetch_releases(&self) -> Result<Vec<Release>, UpdateError> {
        let url = self.url();
        tracing::debug!(%url, "fetching releases");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpdateError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let text = response.text().await?;
        let payload: Vec<GitHubRelease> = serde_json::from_str(&text)?;
        Ok(convert(payload))
    }

    fn describe(&self) -> String {
        format!("{}/{}", self.account, self.repo)
    }
}

/// Fixed release list, e.g. read from a file or built in tests
#[derive(Debug, Clone, Default)]
pub struct StaticReleases {
    releases: Vec<Release>,
}

impl StaticReleases {
    pub fn new(releases: Vec<Release>) -> Self {
        Self { releases }
    }

    /// Parse a JSON array of releases
    pub fn from_json(json: &str) -> Result<Self, UpdateError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl ReleaseSource for StaticReleases {
    async fn fetch_releases(&self) -> Result<Vec<Release>, UpdateError> {
        Ok(self.releases.clone())
    }

    fn describe(&self) -> String {
        format!("{} fixed releases", self.releases.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_github_payload() {
        let json = r#"[
            {"tag_name": "v5.1.2", "body": "Fixes", "published_at": "2022-06-01T12:00:00Z", "draft": false, "prerelease": false},
            {"tag_name": "v5.2.0", "body": null, "draft": true, "prerelease": false},
            {"tag_name": "v5.3.0-rc1", "body": "", "draft": false, "prerelease": true},
            {"tag_name": "nightly", "body": "", "draft": false, "prerelease": false}
        ]"#;
        let payload: Vec<GitHubRelease> = serde_json::from_str(json).unwrap();

        let releases = convert(payload);

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].version, "5.1.2");
        assert_eq!(releases[0].notes, "Fixes");
        assert!(releases[0].published_at.is_some());
    }

    #[test]
    fn test_url() {
        let source = GitHubReleases::new("richardwilkes", "gcs").with_api_base("http://localhost:9999/");
        assert_eq!(source.url(), "http://localhost:9999/repos/richardwilkes/gcs/releases");
        assert_eq!(source.describe(), "richardwilkes/gcs");
    }

    #[tokio::test]
    async fn test_static_releases() {
        let source = StaticReleases::from_json(r#"[{"version": "5.0.0"}]"#).unwrap();
        let releases = source.fetch_releases().await.unwrap();
        assert_eq!(releases, vec![Release::new("5.0.0", "")]);
    }
}
