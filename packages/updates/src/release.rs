//! Releases published on an update site, and selection of the ones worth
//! offering.

use crate::version::{natural_cmp, natural_less};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Version reported by development builds; they never look for updates
pub const DEV_VERSION: &str = "0.0";

/// Releases before this version predate the current data format
pub const LEGACY_CUTOFF: &str = "5.0.0";

/// One published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub version: String,

    /// Release notes (markdown)
    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Release {
    pub fn new(version: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            notes: notes.into(),
            published_at: None,
        }
    }
}

/// Keep the releases newer than `current` that `exclude` lets through,
/// newest first
pub fn select_releases<F>(candidates: Vec<Release>, current: &str, exclude: F) -> Vec<Release>
where
    F: Fn(&Release) -> bool,
{
    let mut releases: Vec<Release> = candidates
        .into_iter()
        .filter(|release| !exclude(release))
        .filter(|release| natural_cmp(&release.version, current) == Ordering::Greater)
        .collect();
    releases.sort_by(|a, b| natural_cmp(&b.version, &a.version));
    releases
}

/// Exclusion predicate for releases older than `cutoff`
pub fn older_than(cutoff: &str) -> impl Fn(&Release) -> bool + '_ {
    move |release| natural_less(&release.version, cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn releases(versions: &[&str]) -> Vec<Release> {
        versions
            .iter()
            .map(|version| Release::new(*version, format!("notes for {}", version)))
            .collect()
    }

    fn versions(releases: &[Release]) -> Vec<&str> {
        releases.iter().map(|r| r.version.as_str()).collect()
    }

    #[test]
    fn test_cutoff_and_current_are_excluded() {
        let selected = select_releases(
            releases(&["4.9.0", "5.0.0", "5.1.2"]),
            "5.0.0",
            older_than(LEGACY_CUTOFF),
        );
        assert_eq!(versions(&selected), vec!["5.1.2"]);
    }

    #[test]
    fn test_newest_first() {
        let selected = select_releases(
            releases(&["5.2.0", "5.10.0", "5.3.1"]),
            "5.1.0",
            older_than(LEGACY_CUTOFF),
        );
        assert_eq!(versions(&selected), vec!["5.10.0", "5.3.1", "5.2.0"]);
    }

    #[test]
    fn test_nothing_newer() {
        let selected = select_releases(releases(&["5.0.0", "5.0.1"]), "5.0.1", |_| false);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_release_json() {
        let release: Release =
            serde_json::from_str(r#"{"version":"5.1.2","publishedAt":"2022-06-01T12:00:00Z"}"#)
                .unwrap();
        assert_eq!(release.version, "5.1.2");
        assert!(release.notes.is_empty());
        assert!(release.published_at.is_some());
    }
}
