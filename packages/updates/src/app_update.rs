//! Application self-update check.

use crate::poller::{CheckOutcome, PollSignal, PollSnapshot, SingleFlightPoller, StartOutcome, StatusText};
use crate::release::{older_than, select_releases, Release, DEV_VERSION};
use crate::{ReleaseSource, UpdateConfig, UpdateError};
use parking_lot::Mutex;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Release notes to show once an update was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    pub title: String,
    pub latest_version: String,

    /// Notes of every newer release, newest first
    pub markdown: String,
}

pub struct AppUpdateChecker {
    app_name: String,
    app_version: String,
    cutoff: String,
    text: StatusText,
    source: Arc<dyn ReleaseSource>,
    poller: SingleFlightPoller<Vec<Release>>,
    last_seen: Mutex<Option<String>>,
}

impl AppUpdateChecker {
    pub fn new(config: &UpdateConfig, source: Arc<dyn ReleaseSource>) -> Self {
        Self {
            app_name: config.app_name.clone(),
            app_version: config.app_version.clone(),
            cutoff: config.cutoff_version.clone(),
            text: StatusText::new(config.app_name.clone()),
            source,
            poller: SingleFlightPoller::new("app-update").with_timeout(config.timeout()),
            last_seen: Mutex::new(config.last_seen_version.clone()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.poller = self.poller.with_timeout(timeout);
        self
    }

    pub fn with_signals(mut self, signals: mpsc::UnboundedSender<PollSignal>) -> Self {
        self.poller = self.poller.with_signals(signals);
        self
    }

    pub fn is_development_build(&self) -> bool {
        self.app_version == DEV_VERSION
    }

    /// Start a fresh check in the background
    pub fn check(&self) -> StartOutcome {
        if self.is_development_build() {
            self.poller.session().set_result(self.text.disabled());
            return StartOutcome::Disabled;
        }

        let source = Arc::clone(&self.source);
        let current = self.app_version.clone();
        let cutoff = self.cutoff.clone();
        let text = self.text.clone();

        self.poller
            .start(&self.text, move || find_app_update(source, current, cutoff, text))
    }

    pub fn read(&self) -> PollSnapshot<Vec<Release>> {
        self.poller.read()
    }

    /// Build the release-notes notice for the available releases, if any,
    /// and remember the newest one as seen
    pub fn notification(&self) -> Option<UpdateNotice> {
        let snapshot = self.read();
        let releases = snapshot.payload.filter(|releases| !releases.is_empty())?;

        let mut markdown = String::new();
        let _ = writeln!(markdown, "# {}", snapshot.status);
        for (i, release) in releases.iter().enumerate() {
            if i != 0 {
                markdown.push_str("---\n");
            }
            let _ = writeln!(markdown, "## Release Notes for {} v{}", self.app_name, release.version);
            markdown.push_str(&release.notes);
            markdown.push('\n');
        }

        let latest_version = releases[0].version.clone();
        *self.last_seen.lock() = Some(latest_version.clone());

        Some(UpdateNotice {
            title: snapshot.status,
            latest_version,
            markdown,
        })
    }

    pub fn last_seen_version(&self) -> Option<String> {
        self.last_seen.lock().clone()
    }
}

async fn find_app_update(
    source: Arc<dyn ReleaseSource>,
    current: String,
    cutoff: String,
    text: StatusText,
) -> Result<CheckOutcome<Vec<Release>>, UpdateError> {
    let candidates = source.fetch_releases().await?;
    let releases = select_releases(candidates, &current, older_than(&cutoff));
    let newest = releases.first().map(|release| release.version.clone());

    Ok(match newest {
        Some(version) if version != current => CheckOutcome::Found {
            status: text.available(&version),
            payload: releases,
        },
        _ => CheckOutcome::Nothing {
            status: text.up_to_date(),
        },
    })
}
