use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use sheetedit_common::{DocumentStore, JsonFileStore};
use sheetedit_editor::{
    Body, Document, DropTarget, EditSession, FactoryDefault, MoveOutcome, Scope,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
pub enum BodyCommand {
    /// Print a body type's hit-location table
    Show {
        file: PathBuf,
    },

    /// Write the standard humanoid table
    New {
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Drag a hit location onto another row
    Move {
        file: PathBuf,

        /// Row being dragged (0-based)
        #[arg(long)]
        from: usize,

        /// Row it is dropped on (0-based)
        #[arg(long)]
        onto: usize,

        /// Drop on the lower half of the row (insert after it)
        #[arg(long)]
        below: bool,
    },

    /// Print the content fingerprint
    Fingerprint {
        file: PathBuf,
    },
}

pub fn body(command: BodyCommand, config: &Config) -> Result<()> {
    let store = JsonFileStore::<Body>::new();

    match command {
        BodyCommand::Show { file } => {
            let mut body = store.load(&file)?;
            body.update();
            print_table(&body, 0);
            Ok(())
        }
        BodyCommand::New { file, force } => {
            if file.exists() && !force {
                return Err(anyhow!("{} already exists (use --force)", file.display()));
            }
            store.save(&Body::factory(), &file)?;
            println!("  {} Created {}", "✓".green(), file.display());
            Ok(())
        }
        BodyCommand::Move {
            file,
            from,
            onto,
            below,
        } => move_location(&store, &file, from, DropTarget::from_hit(onto, below), config),
        BodyCommand::Fingerprint { file } => {
            let body = store.load(&file)?;
            println!("{}", body.fingerprint());
            Ok(())
        }
    }
}

fn move_location(
    store: &JsonFileStore<Body>,
    file: &Path,
    from: usize,
    target: DropTarget,
    config: &Config,
) -> Result<()> {
    let document = store.load(file)?;
    let mut session = EditSession::start(
        file.display().to_string(),
        Scope::Global,
        document,
        config.session_options("Body Type"),
    );

    let id = session
        .document()
        .locations
        .get(from)
        .map(|location| location.id)
        .ok_or_else(|| anyhow!("No hit location at row {}", from))?;

    match session.move_location(id, target.index)? {
        MoveOutcome::Moved { from, to } => {
            session.save_to(store, file)?;
            println!("  {} Moved row {} → {}", "✓".green(), from, to);
            print_table(session.document(), 0);
        }
        MoveOutcome::Unchanged => {
            println!("  {} Dropped in place; nothing to do", "•".dimmed());
        }
        MoveOutcome::NotFound => return Err(anyhow!("No hit location at row {}", from)),
    }

    Ok(())
}

fn print_table(body: &Body, depth: usize) {
    let indent = "    ".repeat(depth);
    println!(
        "{}{} ({})",
        indent,
        body.name.bright_white().bold(),
        body.roll
    );
    for (i, location) in body.locations.iter().enumerate() {
        println!(
            "{}  {:>2}. {:>5}  {:<16} {:>3}  DR {:+}",
            indent,
            i,
            location.roll_range,
            location.table_name,
            location.hit_penalty,
            location.dr_bonus
        );
        if let Some(sub_table) = &location.sub_table {
            print_table(sub_table, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("humanoid.body");
        let store = JsonFileStore::<Body>::new();
        store.save(&Body::factory(), &file).unwrap();

        // Drag the torso onto the lower half of the eye row
        move_location(&store, &file, 5, DropTarget::from_hit(0, true), &Config::default()).unwrap();

        let body = store.load(&file).unwrap();
        assert_eq!(body.locations[1].table_name, "Torso");
        assert_eq!(body.locations.len(), 13);
    }

    #[test]
    fn test_move_in_place_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("humanoid.body");
        let store = JsonFileStore::<Body>::new();
        store.save(&Body::factory(), &file).unwrap();
        let before = std::fs::read_to_string(&file).unwrap();

        move_location(&store, &file, 5, DropTarget::from_hit(5, true), &Config::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
    }

    #[test]
    fn test_move_unknown_row() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("humanoid.body");
        let store = JsonFileStore::<Body>::new();
        store.save(&Body::factory(), &file).unwrap();

        assert!(move_location(&store, &file, 40, DropTarget::from_hit(0, false), &Config::default()).is_err());
    }
}
