use crate::config::{Config, LibraryEntry, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sheetedit_common::{DocumentStore, JsonFileStore};
use sheetedit_editor::{
    Body, FactoryDefault, LibraryDescriptor, MASTER_LIBRARY_ACCOUNT, MASTER_LIBRARY_REPO,
    USER_LIBRARY_ACCOUNT, USER_LIBRARY_REPO,
};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for body type files
    #[arg(short, long, default_value = "bodies")]
    pub body_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = Config::path(cwd);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing sheetedit...".bright_blue().bold());

    let body_dir = cwd.join(&args.body_dir);
    if !body_dir.exists() {
        fs::create_dir_all(&body_dir)?;
        println!("  {} Created {}/", "✓".green(), args.body_dir);
    }

    let humanoid = body_dir.join("humanoid.body");
    if !humanoid.exists() {
        JsonFileStore::<Body>::new().save(&Body::factory(), &humanoid)?;
        println!("  {} Created {}/humanoid.body", "✓".green(), args.body_dir);
    }

    let config = Config {
        libraries: vec![
            LibraryEntry {
                library: LibraryDescriptor::new(
                    "Master Library",
                    MASTER_LIBRARY_ACCOUNT,
                    MASTER_LIBRARY_REPO,
                    &cwd.join("Master Library").display().to_string(),
                ),
                installed_version: String::new(),
            },
            LibraryEntry {
                library: LibraryDescriptor::new(
                    "User Library",
                    USER_LIBRARY_ACCOUNT,
                    USER_LIBRARY_REPO,
                    &cwd.join("User Library").display().to_string(),
                ),
                installed_version: String::new(),
            },
        ],
        ..Config::default()
    };
    config.save(cwd)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Ready!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: sheetedit body show {}/humanoid.body", args.body_dir);
    println!("  2. Run: sheetedit update check");

    Ok(())
}
