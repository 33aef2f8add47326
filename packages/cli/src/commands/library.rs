use crate::commands::update::{is_unreachable, release_source};
use crate::config::{Config, LibraryEntry};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use sheetedit_editor::{
    EditSession, LibraryDescriptor, LibrarySet, PropagationBus, Scope,
};
use sheetedit_updates::{LibraryUpdateChecker, StartOutcome};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, Subcommand)]
pub enum LibraryCommand {
    /// List configured libraries
    List,

    /// Add a library
    Add {
        #[arg(long)]
        title: String,

        /// GitHub account
        #[arg(long)]
        account: String,

        /// GitHub repository
        #[arg(long)]
        repo: String,

        /// Absolute path of the local copy
        #[arg(long)]
        path: String,
    },

    /// Change a library's settings
    Set {
        /// Library key (`account/repo`)
        key: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        account: Option<String>,

        #[arg(long)]
        repo: Option<String>,

        #[arg(long)]
        path: Option<String>,
    },

    /// Look for newer library releases
    Check {
        /// Only check this library
        key: Option<String>,

        /// Read releases from a JSON file instead of GitHub
        #[arg(long)]
        releases: Option<PathBuf>,
    },
}

pub async fn library(command: LibraryCommand, cwd: &Path, config: &mut Config) -> Result<()> {
    match command {
        LibraryCommand::List => {
            list(config);
            Ok(())
        }
        LibraryCommand::Add {
            title,
            account,
            repo,
            path,
        } => {
            let library = LibraryDescriptor::new(&title, &account, &repo, &path);
            library.validate(false)?;
            if config.library(&library.key()).is_some() {
                return Err(anyhow!("{} is already configured", library.key()));
            }
            println!("  {} Added {}", "✓".green(), library.key());
            config.libraries.push(LibraryEntry {
                library,
                installed_version: String::new(),
            });
            config.save(cwd)
        }
        LibraryCommand::Set {
            key,
            title,
            account,
            repo,
            path,
        } => {
            let new_key = apply_settings(config, &key, title, account, repo, path)?;
            println!("  {} Applied settings for {}", "✓".green(), new_key);
            config.save(cwd)
        }
        LibraryCommand::Check { key, releases } => {
            check(config, key.as_deref(), releases.as_deref()).await
        }
    }
}

fn list(config: &Config) {
    if config.libraries.is_empty() {
        println!("{}", "No libraries configured".yellow());
        return;
    }
    for entry in &config.libraries {
        let version = if entry.installed_version.is_empty() {
            "not installed".dimmed().to_string()
        } else {
            format!("v{}", entry.installed_version)
        };
        println!(
            "  {} {} [{}] {}",
            entry.library.title.bright_white().bold(),
            entry.library.key(),
            version,
            entry.library.path_on_disk.dimmed()
        );
    }
}

/// Edit one library through a session and apply it. Returns the key it is
/// filed under afterwards.
fn apply_settings(
    config: &mut Config,
    key: &str,
    title: Option<String>,
    account: Option<String>,
    repo: Option<String>,
    path: Option<String>,
) -> Result<String> {
    let entry = config
        .library(key)
        .cloned()
        .ok_or_else(|| anyhow!("Unknown library {}", key))?;

    let mut set = LibrarySet::new();
    for other in &config.libraries {
        set.insert(other.library.clone());
    }

    let mut session = EditSession::start(
        "library",
        Scope::Global,
        entry.library.clone(),
        config.session_options("Library"),
    );
    let special = entry.library.is_special();
    session.edit("Library Settings", |library| {
        if let Some(title) = title {
            library.title = title;
        }
        // The master and user libraries keep their repository
        if !special {
            if let Some(account) = account {
                library.github_account = account;
            }
            if let Some(repo) = repo {
                library.repo_name = repo;
            }
        }
        if let Some(path) = path {
            library.path_on_disk = path;
        }
    })?;

    let new_key = {
        let mut binding = set
            .binding(key)
            .ok_or_else(|| anyhow!("Unknown library {}", key))?;
        session.apply(&mut binding, &PropagationBus::new(), &mut [])?;
        binding.key().to_string()
    };

    if new_key != key && config.library(&new_key).is_some() {
        return Err(anyhow!("{} is already configured", new_key));
    }

    for stored in &mut config.libraries {
        if stored.library.key() == key {
            if let Some(applied) = set.get(&new_key) {
                stored.library = applied.clone();
            }
        }
    }

    Ok(new_key)
}

async fn check(config: &Config, only: Option<&str>, releases: Option<&Path>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let checker = LibraryUpdateChecker::new(&config.updates).with_signals(tx);

    let mut started = 0;
    for entry in &config.libraries {
        if only.is_some_and(|key| key != entry.library.key()) {
            continue;
        }
        // The user library is local only
        if entry.library.is_user() {
            continue;
        }
        let source = release_source(
            &config.updates,
            &entry.library.github_account,
            &entry.library.repo_name,
            releases,
        )?;
        if checker.check(&entry.check(), source) == StartOutcome::Started {
            started += 1;
        }
    }

    if started == 0 {
        println!("{}", "No libraries to check".yellow());
        return Ok(());
    }

    for _ in 0..started {
        if rx.recv().await.is_none() {
            break;
        }
    }

    for entry in &config.libraries {
        if let Some(snapshot) = checker.read(entry.library.key().as_str()) {
            let marker = match snapshot.payload {
                Some(_) => "↑".yellow(),
                None if is_unreachable(&snapshot.status, &entry.library.title) => "✗".red(),
                None => "✓".green(),
            };
            println!("  {} {}", marker, snapshot.status);
        }
    }

    Ok(())
}
