use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sheetedit_updates::{
    AppUpdateChecker, GitHubReleases, ReleaseSource, StartOutcome, StaticReleases, StatusText,
    UpdateConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Read releases from a JSON file instead of the update site
    #[arg(long)]
    pub releases: Option<PathBuf>,
}

/// Release source for `account/repo`, or a fixed list read from `file`
pub fn release_source(
    updates: &UpdateConfig,
    account: &str,
    repo: &str,
    file: Option<&Path>,
) -> Result<Arc<dyn ReleaseSource>> {
    Ok(match file {
        Some(file) => Arc::new(StaticReleases::from_json(&std::fs::read_to_string(file)?)?),
        None => Arc::new(
            GitHubReleases::new(account, repo)
                .with_api_base(updates.api_base.clone())
                .with_user_agent(updates.user_agent.clone()),
        ),
    })
}

/// Whether `status` is the failure line published for `subject`
pub fn is_unreachable(status: &str, subject: &str) -> bool {
    status == StatusText::new(subject).unreachable()
}

pub async fn check_update(args: UpdateArgs, cwd: &Path, config: &mut Config) -> Result<()> {
    let updates = &config.updates;
    let source = release_source(
        updates,
        &updates.app_account,
        &updates.app_repo,
        args.releases.as_deref(),
    )?;
    tracing::debug!(source = %source.describe(), "checking for application updates");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let checker = AppUpdateChecker::new(updates, source).with_signals(tx);

    match checker.check() {
        StartOutcome::Started => {
            rx.recv().await;
        }
        StartOutcome::AlreadyRunning | StartOutcome::Disabled => {}
    }

    let snapshot = checker.read();
    match checker.notification() {
        Some(notice) => {
            println!("{}", notice.title.green().bold());
            println!();
            println!("{}", notice.markdown);

            let seen = checker.last_seen_version();
            if config.updates.last_seen_version != seen {
                config.updates.last_seen_version = seen;
                config.save(cwd)?;
            }
        }
        None if is_unreachable(&snapshot.status, &config.updates.app_name) => {
            println!("{} {}", "✗".red(), snapshot.status);
        }
        None => println!("{} {}", "✓".green(), snapshot.status),
    }

    Ok(())
}
