//! # Single-Flight Poller
//!
//! Runs a long network check in the background so that at most one instance
//! of it is in flight, and publishes the outcome into a [`PollSession`] the
//! UI can read at any time.
//!
//! ## Flow
//!
//! ```text
//!  start() ──▶ reset session ──▶ spawn(timeout(check))
//!     │            │                      │
//!     │            └─ already running ─▶ AlreadyRunning
//!     │                                   ▼
//!     │                       set_payload / set_result
//!     │                                   │
//!     └───────────────────────────────────┴──▶ PollSignal → UI task queue
//! ```
//!
//! The lock is held only while fields are assigned. The check itself, and
//! the completion signal, run outside of it.

use crate::UpdateError;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default bound on a single check
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new check is running
    Started,

    /// A check was already in flight; nothing was done
    AlreadyRunning,

    /// Checking is turned off (development builds); the status says why
    Disabled,
}

/// Snapshot of a poll session
#[derive(Debug, Clone, PartialEq)]
pub struct PollSnapshot<P> {
    pub status: String,
    pub payload: Option<P>,
    pub running: bool,
}

/// Lock-guarded state of one named check
#[derive(Debug)]
pub struct PollSession<P> {
    state: RwLock<PollSnapshot<P>>,
}

impl<P: Clone> PollSession<P> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(PollSnapshot {
                status: String::new(),
                payload: None,
                running: false,
            }),
        }
    }

    /// Mark a check as running. Returns false if one already is.
    pub fn reset(&self, status: impl Into<String>) -> bool {
        let mut state = self.state.write();
        if state.running {
            return false;
        }
        state.status = status.into();
        state.payload = None;
        state.running = true;
        true
    }

    /// Complete without a payload
    pub fn set_result(&self, status: impl Into<String>) {
        let mut state = self.state.write();
        state.status = status.into();
        state.payload = None;
        state.running = false;
    }

    /// Complete with a payload
    pub fn set_payload(&self, status: impl Into<String>, payload: P) {
        let mut state = self.state.write();
        state.status = status.into();
        state.payload = Some(payload);
        state.running = false;
    }

    pub fn read(&self) -> PollSnapshot<P> {
        self.state.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.read().running
    }
}

impl<P: Clone> Default for PollSession<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Successful outcome of a check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome<P> {
    /// Something worth showing was found
    Found { status: String, payload: P },

    /// Nothing newer
    Nothing { status: String },
}

/// Sent to the UI queue once a check has published its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSignal {
    pub check: String,
}

/// Status lines for the checks of one subject (the app, a library)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    subject: String,
}

impl StatusText {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn checking(&self) -> String {
        format!("Checking for {} updates…", self.subject)
    }

    pub fn available(&self, version: &str) -> String {
        format!("{} v{} is available!", self.subject, version)
    }

    pub fn up_to_date(&self) -> String {
        format!("No {} updates are available", self.subject)
    }

    pub fn unreachable(&self) -> String {
        format!("Unable to access the {} update site", self.subject)
    }

    pub fn disabled(&self) -> String {
        format!("Development versions don't look for {} updates", self.subject)
    }
}

/// Single-flight guard around one named check
pub struct SingleFlightPoller<P> {
    name: String,
    session: Arc<PollSession<P>>,
    timeout: Duration,
    signals: Option<mpsc::UnboundedSender<PollSignal>>,
}

impl<P> SingleFlightPoller<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            session: Arc::new(PollSession::new()),
            timeout: DEFAULT_TIMEOUT,
            signals: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Channel the completion signal is sent on
    pub fn with_signals(mut self, signals: mpsc::UnboundedSender<PollSignal>) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn session(&self) -> &Arc<PollSession<P>> {
        &self.session
    }

    pub fn read(&self) -> PollSnapshot<P> {
        self.session.read()
    }

    /// Start `check` unless one is already in flight.
    ///
    /// Must be called from within a tokio runtime. Failures, panics and
    /// timeouts all publish `text.unreachable()`.
    pub fn start<F, Fut>(&self, text: &StatusText, check: F) -> StartOutcome
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CheckOutcome<P>, UpdateError>> + Send + 'static,
    {
        if !self.session.reset(text.checking()) {
            tracing::debug!(check = %self.name, "check already running");
            return StartOutcome::AlreadyRunning;
        }

        let name = self.name.clone();
        let session = Arc::clone(&self.session);
        let signals = self.signals.clone();
        let timeout = self.timeout;
        let failed = text.unreachable();

        tracing::debug!(check = %name, ?timeout, "check started");

        tokio::spawn(async move {
            let worker = tokio::spawn(async move {
                match tokio::time::timeout(timeout, check()).await {
                    Ok(result) => result,
                    Err(_) => Err(UpdateError::Timeout(timeout)),
                }
            });

            let result = match worker.await {
                Ok(result) => result,
                Err(err) => Err(UpdateError::Aborted(err.to_string())),
            };

            match result {
                Ok(CheckOutcome::Found { status, payload }) => {
                    tracing::info!(check = %name, %status, "check finished");
                    session.set_payload(status, payload);
                }
                Ok(CheckOutcome::Nothing { status }) => {
                    tracing::info!(check = %name, %status, "check finished");
                    session.set_result(status);
                }
                Err(err) => {
                    tracing::error!(check = %name, error = %err, "check failed");
                    session.set_result(failed);
                }
            }

            if let Some(signals) = signals {
                if signals.send(PollSignal { check: name }).is_err() {
                    tracing::debug!("poll signal receiver dropped");
                }
            }
        });

        StartOutcome::Started
    }
}
