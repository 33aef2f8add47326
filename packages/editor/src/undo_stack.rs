//! # Undo/Redo Log
//!
//! Tracks edit history as whole-document snapshots.
//!
//! ## Design
//!
//! - Each record holds a full `before` and `after` clone, never a diff
//! - Undo hands back `before` and moves the record to the redo side
//! - Redo hands back `after` and moves it back
//! - New records clear the redo side (linear history, no branching)
//! - When the log is over capacity the oldest undoable record is dropped
//! - Undo and redo cannot fail: snapshots are plain data
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut log = UndoLog::new();
//!
//! let mut record = EditRecord::begin(1, "Rename", &body);
//! body.name = "Quadruped".into();
//! record.finish(&body);
//! log.push(record)?;
//!
//! let restored = log.undo().cloned();
//! ```

use crate::EditorError;

/// One reversible edit: the document before and after it
#[derive(Debug, Clone)]
pub struct EditRecord<D> {
    token: u64,

    /// Name shown in "Undo <label>" menus
    pub label: String,

    pub before: D,

    /// Captured when the edit is committed
    pub after: Option<D>,
}

impl<D: Clone> EditRecord<D> {
    /// Start a record by snapshotting the current document
    pub fn begin(token: u64, label: impl Into<String>, current: &D) -> Self {
        Self {
            token,
            label: label.into(),
            before: current.clone(),
            after: None,
        }
    }

    /// Snapshot the edited document
    pub fn finish(&mut self, edited: &D) {
        self.after = Some(edited.clone());
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_finished(&self) -> bool {
        self.after.is_some()
    }

    /// Merge hook for coalescing rapid edits. Records never merge: every
    /// committed edit is its own undo step.
    pub fn absorb(&mut self, _other: &EditRecord<D>) -> bool {
        false
    }
}

/// Bounded undo/redo log
#[derive(Debug)]
pub struct UndoLog<D> {
    /// Undoable records (most recent last)
    undo_stack: Vec<EditRecord<D>>,

    /// Undone records (most recent last)
    redo_stack: Vec<EditRecord<D>>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl<D: Clone> UndoLog<D> {
    /// Create a log with the default capacity (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record a finished edit
    pub fn push(&mut self, record: EditRecord<D>) -> Result<(), EditorError> {
        if !record.is_finished() {
            return Err(EditorError::UnfinishedEdit);
        }

        // New action invalidates the future
        self.redo_stack.clear();

        if let Some(top) = self.undo_stack.last_mut() {
            if top.absorb(&record) {
                return Ok(());
            }
        }

        self.undo_stack.push(record);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let evicted = self.undo_stack.remove(0);
            tracing::trace!(label = %evicted.label, "evicted oldest undo record");
        }

        Ok(())
    }

    /// Step back. Returns the snapshot to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<&D> {
        let record = self.undo_stack.pop()?;
        self.redo_stack.push(record);
        self.redo_stack.last().map(|record| &record.before)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<&D> {
        let record = self.redo_stack.pop()?;
        self.undo_stack.push(record);
        self.undo_stack.last().and_then(|record| record.after.as_ref())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.max_levels
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Label of the next undo step
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|record| record.label.as_str())
    }

    /// Label of the next redo step
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|record| record.label.as_str())
    }
}

impl<D: Clone> Default for UndoLog<D> {
    fn default() -> Self {
        Self::new()
    }
}
