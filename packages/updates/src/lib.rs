//! # Sheetedit Updates
//!
//! Background update checks for the application and its data libraries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │ AppUpdateChecker         │     │ LibraryUpdateChecker     │
//! │  one poll session        │     │  one session per library │
//! └──────────────────────────┘     └──────────────────────────┘
//!               ↓                                ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │ SingleFlightPoller: reset → spawn(timeout(check)) → publish │
//! └─────────────────────────────────────────────────────────────┘
//!               ↓                                ↓
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │ ReleaseSource (GitHub)   │     │ PollSignal → UI queue    │
//! └──────────────────────────┘     └──────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let source = Arc::new(GitHubReleases::new("richardwilkes", "gcs"));
//! let checker = AppUpdateChecker::new(&UpdateConfig::default(), source).with_signals(tx);
//!
//! checker.check();
//! rx.recv().await;
//! if let Some(notice) = checker.notification() {
//!     println!("{}", notice.markdown);
//! }
//! ```

mod app_update;
mod config;
mod error;
mod library_update;
mod poller;
mod release;
mod source;
pub mod version;

pub use app_update::{AppUpdateChecker, UpdateNotice};
pub use config::UpdateConfig;
pub use error::UpdateError;
pub use library_update::{in_tag_range, LibraryCheck, LibraryUpdateChecker};
pub use poller::{
    CheckOutcome, PollSession, PollSignal, PollSnapshot, SingleFlightPoller, StartOutcome,
    StatusText, DEFAULT_TIMEOUT,
};
pub use release::{older_than, select_releases, Release, DEV_VERSION, LEGACY_CUTOFF};
pub use source::{GitHubReleases, ReleaseSource, StaticReleases, GITHUB_API_BASE};
pub use version::{natural_cmp, natural_less};
