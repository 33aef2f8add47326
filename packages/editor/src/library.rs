//! # Library Descriptors
//!
//! A library is a GitHub repository of data files mirrored to a local
//! directory. Its settings (title, repository, path) are edited through a
//! session like any other document; applying re-files the library under its
//! new key in the [`LibrarySet`].

use crate::{Document, DomainKey, EditorError, KeyAllocator, Scope, SettingsTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const MASTER_LIBRARY_ACCOUNT: &str = "richardwilkes";
pub const MASTER_LIBRARY_REPO: &str = "gcs_master_library";
pub const USER_LIBRARY_ACCOUNT: &str = "Local";
pub const USER_LIBRARY_REPO: &str = "User Library";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDescriptor {
    pub title: String,
    pub github_account: String,
    pub repo_name: String,
    pub path_on_disk: String,
}

impl LibraryDescriptor {
    pub fn new(title: &str, github_account: &str, repo_name: &str, path_on_disk: &str) -> Self {
        Self {
            title: title.to_string(),
            github_account: github_account.to_string(),
            repo_name: repo_name.to_string(),
            path_on_disk: path_on_disk.to_string(),
        }
    }

    /// Key the library is filed under: `account/repo`
    pub fn key(&self) -> String {
        format!("{}/{}", self.github_account, self.repo_name)
    }

    pub fn domain(&self) -> DomainKey {
        DomainKey::new(format!("library:{}", self.key()))
    }

    pub fn is_master(&self) -> bool {
        self.github_account == MASTER_LIBRARY_ACCOUNT && self.repo_name == MASTER_LIBRARY_REPO
    }

    pub fn is_user(&self) -> bool {
        self.github_account == USER_LIBRARY_ACCOUNT && self.repo_name == USER_LIBRARY_REPO
    }

    /// The master and user libraries keep their name and repository
    pub fn is_special(&self) -> bool {
        self.is_master() || self.is_user()
    }

    /// Check the descriptor can be accepted. `special` is whether the
    /// library being edited was special to begin with.
    pub fn validate(&self, special: bool) -> Result<(), EditorError> {
        if !special {
            if self.title.trim().is_empty() {
                return Err(EditorError::InvalidDocument("library name is empty".into()));
            }
            if self.github_account.is_empty() || self.repo_name.is_empty() {
                return Err(EditorError::InvalidDocument(
                    "GitHub account and repository are required".into(),
                ));
            }
            if self.is_special() {
                return Err(EditorError::InvalidDocument(format!(
                    "{} is reserved",
                    self.key()
                )));
            }
        }
        if self.path_on_disk.len() <= 1 || !Path::new(&self.path_on_disk).is_absolute() {
            return Err(EditorError::InvalidDocument(format!(
                "library path must be absolute: {:?}",
                self.path_on_disk
            )));
        }
        Ok(())
    }
}

impl Document for LibraryDescriptor {
    // Plain fields; nothing to re-key
    fn rekey(&mut self, _keys: &mut KeyAllocator) {}
}

/// All configured libraries, by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySet {
    libraries: BTreeMap<String, LibraryDescriptor>,
}

impl LibrarySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, library: LibraryDescriptor) {
        self.libraries.insert(library.key(), library);
    }

    pub fn get(&self, key: &str) -> Option<&LibraryDescriptor> {
        self.libraries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryDescriptor> {
        self.libraries.values()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Bind one library for editing
    pub fn binding(&mut self, key: &str) -> Option<LibraryBinding<'_>> {
        let library = self.libraries.get(key)?;
        let special = library.is_special();
        let domain = library.domain();
        Some(LibraryBinding {
            set: self,
            key: key.to_string(),
            domain,
            special,
        })
    }
}

/// A library being edited: applying replaces the entry, re-filing it under
/// its new key if the account or repository changed
pub struct LibraryBinding<'a> {
    set: &'a mut LibrarySet,
    key: String,
    domain: DomainKey,
    special: bool,
}

impl LibraryBinding<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_special(&self) -> bool {
        self.special
    }
}

impl SettingsTarget<LibraryDescriptor> for LibraryBinding<'_> {
    fn domain(&self) -> &DomainKey {
        &self.domain
    }

    fn accept(&mut self, _scope: &Scope, document: LibraryDescriptor) -> Result<(), EditorError> {
        document.validate(self.special)?;
        self.set.libraries.remove(&self.key);
        self.key = document.key();
        tracing::info!(library = %self.key, path = %document.path_on_disk, "library settings applied");
        self.set.libraries.insert(self.key.clone(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn homebrew() -> LibraryDescriptor {
        LibraryDescriptor::new("Homebrew", "gm-bob", "homebrew", "/data/homebrew")
    }

    #[test]
    fn test_special_libraries() {
        let master = LibraryDescriptor::new(
            "Master Library",
            MASTER_LIBRARY_ACCOUNT,
            MASTER_LIBRARY_REPO,
            "/data/master",
        );
        assert!(master.is_master());
        assert!(master.is_special());
        assert!(!homebrew().is_special());
    }

    #[test]
    fn test_validate() {
        assert!(homebrew().validate(false).is_ok());

        let mut unnamed = homebrew();
        unnamed.title = "  ".into();
        assert!(unnamed.validate(false).is_err());
        // Special libraries keep their fixed name, so it is not checked
        assert!(unnamed.validate(true).is_ok());

        let mut relative = homebrew();
        relative.path_on_disk = "data/homebrew".into();
        assert!(relative.validate(false).is_err());

        let mut squatter = homebrew();
        squatter.github_account = MASTER_LIBRARY_ACCOUNT.into();
        squatter.repo_name = MASTER_LIBRARY_REPO.into();
        assert!(squatter.validate(false).is_err());
    }

    #[test]
    fn test_accept_refiles_under_new_key() {
        let mut set = LibrarySet::new();
        set.insert(homebrew());

        let mut moved = homebrew();
        moved.repo_name = "homebrew-v2".into();

        let mut binding = set.binding("gm-bob/homebrew").unwrap();
        binding.accept(&Scope::Global, moved).unwrap();
        assert_eq!(binding.key(), "gm-bob/homebrew-v2");

        assert!(set.get("gm-bob/homebrew").is_none());
        assert_eq!(set.get("gm-bob/homebrew-v2").unwrap().repo_name, "homebrew-v2");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_accept_leaves_set_untouched() {
        let mut set = LibrarySet::new();
        set.insert(homebrew());

        let mut broken = homebrew();
        broken.path_on_disk = String::new();

        let mut binding = set.binding("gm-bob/homebrew").unwrap();
        assert!(binding.accept(&Scope::Global, broken).is_err());
        assert_eq!(set.get("gm-bob/homebrew"), Some(&homebrew()));
    }
}
