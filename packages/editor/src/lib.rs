//! # Sheetedit Editor
//!
//! Session controller for form-edited settings documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: panels, fields, drag & drop (external)  │
//! └─────────────────────────────────────────────┘
//!                     ↓ edits
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - begin/commit edits into the UndoLog      │
//! │  - dirty state from content fingerprints    │
//! │  - apply / cancel / close                   │
//! └─────────────────────────────────────────────┘
//!                     ↓ apply
//! ┌─────────────────────────────────────────────┐
//! │ SettingsTarget (global default / entity)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PropagationBus → other open documents       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots, not diffs**: every undo record holds whole documents
//! 2. **Derived dirtiness**: modified means the fingerprint moved from the
//!    accepted baseline, so undoing back is clean again
//! 3. **Rejections are values**: boundaries of history, unknown drag
//!    targets and nested edits never panic
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sheetedit_editor::{Body, DomainKey, EditSession, PropagationBus, Scope, SessionOptions, SettingsDomain};
//!
//! let mut domain = SettingsDomain::new(DomainKey::new("body_type"), Body::humanoid());
//! let mut session = EditSession::open("body", Scope::Global, &domain, SessionOptions::default());
//!
//! session.edit("Rename", |body| body.name = "Centaur".into())?;
//! assert!(session.is_modified());
//!
//! session.apply(&mut domain, &PropagationBus::new(), &mut [])?;
//! assert!(!session.is_modified());
//! ```

mod body;
mod document;
mod domain;
mod errors;
mod library;
mod propagation;
pub mod reorder;
mod session;
mod sheet;
mod undo_stack;

pub use body::{roll_minimum, Body, HitLocation, LocationId};
pub use document::{Document, FactoryDefault, KeyAllocator};
pub use domain::{DomainKey, EntityId, Scope, SettingsDomain, SettingsTarget};
pub use errors::EditorError;
pub use library::{
    LibraryBinding, LibraryDescriptor, LibrarySet, MASTER_LIBRARY_ACCOUNT, MASTER_LIBRARY_REPO,
    USER_LIBRARY_ACCOUNT, USER_LIBRARY_REPO,
};
pub use propagation::{BroadcastReport, DomainResponder, OpenDocument, PropagationBus};
pub use reorder::{DropTarget, Identified, MoveOutcome};
pub use session::{CloseDecision, ConfirmClose, EditSession, SessionOptions, SessionState};
pub use sheet::SheetView;
pub use undo_stack::{EditRecord, UndoLog};

// Re-export common types for convenience
pub use sheetedit_common::{fingerprint, DocumentStore, Fingerprint, JsonFileStore, MemoryStore};
