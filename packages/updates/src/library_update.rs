//! Library version checks, one poll session per library.

use crate::poller::{CheckOutcome, PollSignal, PollSnapshot, SingleFlightPoller, StartOutcome, StatusText};
use crate::release::{select_releases, Release};
use crate::version::major_version;
use crate::{ReleaseSource, UpdateConfig, UpdateError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// A library to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryCheck {
    /// `account/repo`
    pub key: String,
    pub title: String,

    /// Empty when nothing is installed yet
    pub installed_version: String,
}

/// Whether `version` is in the readable tag range `min.x.y ..= max.x.y`
pub fn in_tag_range(version: &str, min: u32, max: u32) -> bool {
    major_version(version).map_or(false, |major| (min..=max).contains(&major))
}

pub struct LibraryUpdateChecker {
    minimum: u32,
    current: u32,
    timeout: Duration,
    signals: Option<mpsc::UnboundedSender<PollSignal>>,
    pollers: Mutex<BTreeMap<String, Arc<SingleFlightPoller<Release>>>>,
}

impl LibraryUpdateChecker {
    pub fn new(config: &UpdateConfig) -> Self {
        Self {
            minimum: config.minimum_library_version,
            current: config.current_library_version,
            timeout: config.timeout(),
            signals: None,
            pollers: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_signals(mut self, signals: mpsc::UnboundedSender<PollSignal>) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Hint shown next to the repository fields
    pub fn tag_hint(&self) -> String {
        format!(
            "in the form \"v{}.x.y\" through \"v{}.x.y\", where x and y can be any numeric value.",
            self.minimum, self.current
        )
    }

    pub fn accepts(&self, version: &str) -> bool {
        in_tag_range(version, self.minimum, self.current)
    }

    fn poller(&self, key: &str) -> Arc<SingleFlightPoller<Release>> {
        let mut pollers = self.pollers.lock();
        let poller = pollers.entry(key.to_string()).or_insert_with(|| {
            let mut poller = SingleFlightPoller::new(format!("library:{}", key)).with_timeout(self.timeout);
            if let Some(signals) = &self.signals {
                poller = poller.with_signals(signals.clone());
            }
            Arc::new(poller)
        });
        Arc::clone(poller)
    }

    /// Look for a newer release of `library` in the background
    pub fn check(&self, library: &LibraryCheck, source: Arc<dyn ReleaseSource>) -> StartOutcome {
        let poller = self.poller(&library.key);
        let text = StatusText::new(library.title.clone());
        let installed = library.installed_version.clone();
        let range = (self.minimum, self.current);
        let status = text.clone();

        poller.start(&text, move || find_library_update(source, installed, range, status))
    }

    pub fn read(&self, key: &str) -> Option<PollSnapshot<Release>> {
        self.pollers.lock().get(key).map(|poller| poller.read())
    }

    /// Drop the poll session of a removed or re-keyed library
    pub fn forget(&self, key: &str) {
        self.pollers.lock().remove(key);
    }

    pub fn tracked(&self) -> Vec<String> {
        self.pollers.lock().keys().cloned().collect()
    }
}

async fn find_library_update(
    source: Arc<dyn ReleaseSource>,
    installed: String,
    (minimum, current): (u32, u32),
    text: StatusText,
) -> Result<CheckOutcome<Release>, UpdateError> {
    let candidates = source.fetch_releases().await?;
    let releases = select_releases(candidates, &installed, |release| {
        !in_tag_range(&release.version, minimum, current)
    });

    Ok(match releases.into_iter().next() {
        Some(newest) => CheckOutcome::Found {
            status: text.available(&newest.version),
            payload: newest,
        },
        None => CheckOutcome::Nothing {
            status: text.up_to_date(),
        },
    })
}
