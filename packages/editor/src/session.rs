//! # Edit Session Management
//!
//! An EditSession binds one document to an undoable, change-tracked editing
//! transaction, the way a settings window does.
//!
//! ## Lifecycle
//!
//! ```text
//!            commit / undo / redo
//!   Clean  ─────────────────────▶  Dirty
//!     ▲                              │
//!     └──── apply, or undo back ─────┘
//!                                    │ cancel
//!                                    ▼
//!                                Discarded
//!
//!   any state ── close ──▶ Closed (terminal)
//! ```
//!
//! "Modified" is never stored: it is `fingerprint(live) != baseline`,
//! recomputed on every query, so undoing back to the accepted content makes
//! the session clean again without any bookkeeping.
//!
//! All methods take `&mut self` and are meant to be driven from the single
//! UI thread.

use crate::reorder::{self, Identified, MoveOutcome};
use crate::{
    Body, BroadcastReport, Document, EditRecord, EditorError, FactoryDefault, KeyAllocator,
    LocationId, OpenDocument, PropagationBus, Scope, SettingsDomain, SettingsTarget, UndoLog,
};
use sheetedit_common::{DocumentStore, Fingerprint};
use std::path::Path;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Undo levels kept (0 = unlimited)
    pub undo_capacity: usize,

    /// Ask before closing with unapplied changes
    pub prompt_for_save: bool,

    /// Human name of the document kind, used in titles and undo labels
    pub document_name: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            undo_capacity: 100,
            prompt_for_save: true,
            document_name: "Document".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Clean,
    Dirty,
    Discarded,
    Closed,
}

/// Answer from the close-confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    ApplyAndClose,
    DiscardAndClose,
    AbortClose,
}

/// Blocking yes/no/cancel prompt supplied by the UI
pub trait ConfirmClose {
    fn confirm(&mut self, prompt: &str) -> CloseDecision;
}

/// Single edit session
pub struct EditSession<D: Document> {
    /// Unique session identifier (also seeds node keys)
    id: String,

    scope: Scope,

    options: SessionOptions,

    /// Document being edited
    live: D,

    /// Document as loaded (or last applied), restored by cancel
    original: D,

    /// Fingerprint of the accepted state
    baseline: Fingerprint,

    undo: UndoLog<D>,

    keys: KeyAllocator,

    /// Token of the edit between `begin_edit` and `commit_edit`
    open_edit: Option<u64>,

    next_token: u64,

    state: SessionState,
}

impl<D: Document> EditSession<D> {
    /// Start editing `initial`
    pub fn start(id: impl Into<String>, scope: Scope, initial: D, options: SessionOptions) -> Self {
        let id = id.into();
        let mut keys = KeyAllocator::new(id.clone());
        let mut live = initial;
        live.rekey(&mut keys);
        let baseline = live.fingerprint();

        tracing::debug!(session = %id, %baseline, "session started");

        Self {
            undo: UndoLog::with_max_levels(options.undo_capacity),
            original: live.clone(),
            live,
            baseline,
            keys,
            id,
            scope,
            options,
            open_edit: None,
            next_token: 0,
            state: SessionState::Clean,
        }
    }

    /// Start a session on the accepted document of `domain` for `scope`
    pub fn open(
        id: impl Into<String>,
        scope: Scope,
        domain: &SettingsDomain<D>,
        options: SessionOptions,
    ) -> Self {
        let initial = domain.accepted(&scope).clone();
        Self::start(id, scope, initial, options)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn document(&self) -> &D {
        &self.live
    }

    pub fn baseline(&self) -> Fingerprint {
        self.baseline
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn title(&self) -> String {
        match &self.scope {
            Scope::Global => format!("Default {}", self.options.document_name),
            Scope::Entity(entity) => format!("{}: {}", self.options.document_name, entity),
        }
    }

    pub fn set_prompt_for_save(&mut self, prompt: bool) {
        self.options.prompt_for_save = prompt;
    }

    /// Whether the live document differs from the accepted state
    pub fn is_modified(&self) -> bool {
        self.live.fingerprint() != self.baseline
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Snapshot the live document ahead of a change
    pub fn begin_edit(&mut self, label: impl Into<String>) -> Result<EditRecord<D>, EditorError> {
        self.ensure_open()?;
        if self.open_edit.is_some() {
            return Err(EditorError::EditInProgress);
        }

        self.next_token += 1;
        self.open_edit = Some(self.next_token);
        Ok(EditRecord::begin(self.next_token, label, &self.live))
    }

    /// Install `mutated` as the live document and record the edit
    pub fn commit_edit(&mut self, mut record: EditRecord<D>, mutated: D) -> Result<(), EditorError> {
        self.ensure_open()?;
        if self.open_edit != Some(record.token()) {
            return Err(EditorError::StaleEdit);
        }

        record.finish(&mutated);
        let label = record.label.clone();
        self.undo.push(record)?;
        self.open_edit = None;
        self.live = mutated;
        self.refresh_state();

        tracing::debug!(session = %self.id, edit = %label, modified = self.is_modified(), "edit committed");
        Ok(())
    }

    /// Drop an open edit without recording it
    pub fn abandon_edit(&mut self, record: EditRecord<D>) {
        if self.open_edit == Some(record.token()) {
            self.open_edit = None;
        }
    }

    /// Run `change` against a working copy and commit it as one edit.
    ///
    /// Nothing is recorded when the working copy comes back with the same
    /// content.
    pub fn edit<R>(
        &mut self,
        label: impl Into<String>,
        change: impl FnOnce(&mut D) -> R,
    ) -> Result<R, EditorError> {
        let record = self.begin_edit(label)?;
        let mut working = self.live.clone();
        let result = change(&mut working);

        if working.fingerprint() == self.live.fingerprint() {
            self.abandon_edit(record);
            return Ok(result);
        }

        self.commit_edit(record, working)?;
        Ok(result)
    }

    /// Relocate an item inside a sibling list of the live document as one
    /// undoable edit. `locate` picks the list holding `id`.
    pub fn reorder<T, F>(
        &mut self,
        label: impl Into<String>,
        locate: F,
        id: &T::Id,
        target: usize,
    ) -> Result<MoveOutcome, EditorError>
    where
        T: Identified,
        F: FnOnce(&mut D) -> Option<&mut Vec<T>>,
    {
        self.edit(label, |document| match locate(document) {
            Some(list) => reorder::move_item(list, id, target),
            None => MoveOutcome::NotFound,
        })
    }

    /// Step back one edit. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        if self.is_closed() || self.open_edit.is_some() {
            return false;
        }
        let Some(before) = self.undo.undo() else {
            return false;
        };
        self.live = before.clone();
        self.refresh_state();
        true
    }

    /// Step forward one edit. Returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        if self.is_closed() || self.open_edit.is_some() {
            return false;
        }
        let Some(after) = self.undo.redo() else {
            return false;
        };
        self.live = after.clone();
        self.refresh_state();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.undo_description()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.undo.redo_description()
    }

    /// Accept the live document for this session's scope, then tell the
    /// other open documents reading the same domain
    pub fn apply<T: SettingsTarget<D>>(
        &mut self,
        target: &mut T,
        bus: &PropagationBus,
        peers: &mut [&mut dyn OpenDocument],
    ) -> Result<BroadcastReport, EditorError> {
        self.ensure_open()?;

        target.accept(&self.scope, self.live.clone())?;
        self.baseline = self.live.fingerprint();
        self.original = self.live.clone();
        self.refresh_state();

        tracing::info!(session = %self.id, domain = %target.domain(), baseline = %self.baseline, "changes applied");

        Ok(bus.broadcast(target.domain(), self.scope.entity(), true, peers))
    }

    /// Throw away the live document and return to the loaded one
    pub fn cancel(&mut self) {
        if self.is_closed() {
            return;
        }
        self.live = self.original.clone();
        self.undo.clear();
        self.open_edit = None;
        self.state = SessionState::Discarded;
        tracing::debug!(session = %self.id, "changes discarded");
    }

    /// Ask whether the session may close. Returns false only when the user
    /// aborts the close.
    pub fn request_close<T: SettingsTarget<D>>(
        &mut self,
        confirm: &mut dyn ConfirmClose,
        target: &mut T,
        bus: &PropagationBus,
        peers: &mut [&mut dyn OpenDocument],
    ) -> Result<bool, EditorError> {
        if self.is_closed() {
            return Ok(true);
        }

        if self.options.prompt_for_save && self.is_modified() {
            let prompt = format!("Apply changes made to\n{}?", self.title());
            match confirm.confirm(&prompt) {
                CloseDecision::ApplyAndClose => {
                    self.apply(target, bus, peers)?;
                }
                CloseDecision::DiscardAndClose => self.cancel(),
                CloseDecision::AbortClose => return Ok(false),
            }
        }

        self.close();
        Ok(true)
    }

    /// Dispose the session
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
        self.open_edit = None;
        self.undo.clear();
        tracing::debug!(session = %self.id, "session closed");
    }

    /// Replace the whole document as one undoable edit
    pub fn load_from_external(&mut self, document: D) -> Result<(), EditorError> {
        let label = format!("Load {}", self.options.document_name);
        self.replace(label, document)
    }

    /// Load through a persistence collaborator. On failure the session is
    /// left untouched.
    pub fn load_from(
        &mut self,
        store: &dyn DocumentStore<D>,
        path: &Path,
    ) -> Result<(), EditorError> {
        let document = store.load(path).map_err(|err| {
            tracing::warn!(session = %self.id, path = %path.display(), error = %err, "load failed");
            err
        })?;
        self.load_from_external(document)
    }

    pub fn save_to(&self, store: &dyn DocumentStore<D>, path: &Path) -> Result<(), EditorError> {
        store.save(&self.live, path)?;
        Ok(())
    }

    fn replace(&mut self, label: String, mut document: D) -> Result<(), EditorError> {
        let record = self.begin_edit(label)?;
        document.rekey(&mut self.keys);
        self.commit_edit(record, document)
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.is_closed() {
            Err(EditorError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn refresh_state(&mut self) {
        if self.is_closed() {
            return;
        }
        self.state = if self.is_modified() {
            SessionState::Dirty
        } else {
            SessionState::Clean
        };
    }
}

impl<D: FactoryDefault> EditSession<D> {
    /// Reset to the default: entity sessions take the domain's global
    /// default, global sessions take the factory document
    pub fn reset_to_default(&mut self, domain: &SettingsDomain<D>) -> Result<(), EditorError> {
        let document = match &self.scope {
            Scope::Global => D::factory(),
            Scope::Entity(_) => domain.global().clone(),
        };
        let label = format!("Reset {}", self.options.document_name);
        self.replace(label, document)
    }
}

impl EditSession<Body> {
    /// Drag-and-drop relocation of a hit location as one undoable edit
    pub fn move_location(
        &mut self,
        id: LocationId,
        target: usize,
    ) -> Result<MoveOutcome, EditorError> {
        self.edit("Hit Location Drag", |body| body.move_location(id, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomainKey, EntityId};

    fn body_domain() -> SettingsDomain<Body> {
        SettingsDomain::new(DomainKey::new("body_type"), Body::humanoid())
    }

    fn options() -> SessionOptions {
        SessionOptions {
            document_name: "Body Type".to_string(),
            ..SessionOptions::default()
        }
    }

    fn session() -> EditSession<Body> {
        EditSession::open("body", Scope::Global, &body_domain(), options())
    }

    struct Answer(CloseDecision, usize);

    impl ConfirmClose for Answer {
        fn confirm(&mut self, _prompt: &str) -> CloseDecision {
            self.1 += 1;
            self.0
        }
    }

    #[test]
    fn test_session_creation() {
        let session = session();

        assert_eq!(session.id(), "body");
        assert_eq!(session.state(), SessionState::Clean);
        assert!(!session.is_modified());
        assert!(!session.can_undo());
        assert_eq!(session.title(), "Default Body Type");
    }

    #[test]
    fn test_entity_title() {
        let session = EditSession::open(
            "body",
            Scope::Entity(EntityId::new("Zara")),
            &body_domain(),
            options(),
        );
        assert_eq!(session.title(), "Body Type: Zara");
    }

    #[test]
    fn test_begin_commit_marks_dirty() {
        let mut session = session();

        let record = session.begin_edit("Rename").unwrap();
        let mut changed = session.document().clone();
        changed.name = "Winged Humanoid".into();
        session.commit_edit(record, changed).unwrap();

        assert!(session.is_modified());
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.undo_label(), Some("Rename"));
    }

    #[test]
    fn test_nested_begin_is_rejected() {
        let mut session = session();
        let _record = session.begin_edit("First").unwrap();

        assert!(matches!(session.begin_edit("Second"), Err(EditorError::EditInProgress)));
    }

    #[test]
    fn test_stale_record_is_rejected() {
        let mut session = session();
        let first = session.begin_edit("First").unwrap();
        session.abandon_edit(first.clone());

        let _second = session.begin_edit("Second").unwrap();
        let document = session.document().clone();

        assert!(matches!(session.commit_edit(first, document), Err(EditorError::StaleEdit)));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_undo_back_to_baseline_is_clean() {
        let mut session = session();
        for slots in 3..6 {
            session
                .edit("Skull Slots", |body| body.locations[1].slots = slots)
                .unwrap();
        }
        assert!(session.is_modified());

        while session.undo() {}

        assert!(!session.is_modified());
        assert_eq!(session.state(), SessionState::Clean);
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.document().locations[1].slots, 3);
        assert_eq!(session.state(), SessionState::Dirty);
    }

    #[test]
    fn test_edit_without_change_records_nothing() {
        let mut session = session();
        session.edit("Nothing", |_| ()).unwrap();

        assert!(!session.can_undo());
        // The open edit was released
        assert!(session.begin_edit("Next").is_ok());
    }

    #[test]
    fn test_apply_updates_domain_and_baseline() {
        let mut domain = body_domain();
        let mut session = EditSession::open("body", Scope::Global, &domain, options());
        session
            .edit("Rename", |body| body.name = "Centaur".into())
            .unwrap();

        let report = session
            .apply(&mut domain, &PropagationBus::new(), &mut [])
            .unwrap();

        assert!(report.all_succeeded());
        assert!(!session.is_modified());
        assert_eq!(session.state(), SessionState::Clean);
        assert_eq!(domain.global().name, "Centaur");
    }

    #[test]
    fn test_cancel_restores_original() {
        let domain = body_domain();
        let mut session = EditSession::open("body", Scope::Global, &domain, options());
        session.edit("Rename", |body| body.name = "Ogre".into()).unwrap();

        session.cancel();

        assert_eq!(session.state(), SessionState::Discarded);
        assert_eq!(session.document().name, "Humanoid");
        assert!(!session.is_modified());
        assert!(!session.can_undo());
        // Accepted state untouched
        assert_eq!(domain.accepted(&Scope::Global).name, "Humanoid");
    }

    #[test]
    fn test_request_close_decisions() {
        let bus = PropagationBus::new();

        let mut domain = body_domain();
        let mut session = EditSession::open("a", Scope::Global, &domain, options());
        session.edit("Rename", |body| body.name = "Kept".into()).unwrap();
        let mut abort = Answer(CloseDecision::AbortClose, 0);
        assert!(!session.request_close(&mut abort, &mut domain, &bus, &mut []).unwrap());
        assert_eq!(session.state(), SessionState::Dirty);

        let mut discard = Answer(CloseDecision::DiscardAndClose, 0);
        assert!(session.request_close(&mut discard, &mut domain, &bus, &mut []).unwrap());
        assert!(session.is_closed());
        assert_eq!(domain.global().name, "Humanoid");

        let mut session = EditSession::open("b", Scope::Global, &domain, options());
        session.edit("Rename", |body| body.name = "Applied".into()).unwrap();
        let mut apply = Answer(CloseDecision::ApplyAndClose, 0);
        assert!(session.request_close(&mut apply, &mut domain, &bus, &mut []).unwrap());
        assert_eq!(domain.global().name, "Applied");
    }

    #[test]
    fn test_request_close_without_changes_does_not_prompt() {
        let mut domain = body_domain();
        let mut session = EditSession::open("a", Scope::Global, &domain, options());
        let mut answer = Answer(CloseDecision::AbortClose, 0);

        let closed = session
            .request_close(&mut answer, &mut domain, &PropagationBus::new(), &mut [])
            .unwrap();

        assert!(closed);
        assert_eq!(answer.1, 0);
    }

    #[test]
    fn test_prompting_disabled_closes_silently() {
        let mut domain = body_domain();
        let mut session = EditSession::open("a", Scope::Global, &domain, options());
        session.edit("Rename", |body| body.name = "Lost".into()).unwrap();
        session.set_prompt_for_save(false);
        let mut answer = Answer(CloseDecision::AbortClose, 0);

        assert!(session
            .request_close(&mut answer, &mut domain, &PropagationBus::new(), &mut [])
            .unwrap());
        assert_eq!(answer.1, 0);
        assert_eq!(domain.global().name, "Humanoid");
    }

    #[test]
    fn test_closed_session_rejects_edits() {
        let mut session = session();
        session.close();

        assert!(matches!(session.begin_edit("Late"), Err(EditorError::SessionClosed)));
        assert!(!session.undo());
        assert!(!session.redo());
    }

    #[test]
    fn test_load_from_external_is_undoable() {
        let mut session = session();
        let mut quadruped = Body::new("Quadruped", "3d");
        quadruped.locations = Body::humanoid().locations[..4].to_vec();

        session.load_from_external(quadruped).unwrap();
        assert_eq!(session.document().name, "Quadruped");
        assert_eq!(session.undo_label(), Some("Load Body Type"));
        assert!(session.document().locations.iter().all(|l| l.id != LocationId(0)));

        assert!(session.undo());
        assert_eq!(session.document().name, "Humanoid");
        assert!(!session.is_modified());
    }

    #[test]
    fn test_reset_to_default_per_scope() {
        let mut domain = body_domain();
        let mut global_body = Body::humanoid();
        global_body.name = "House Rules".into();
        domain.accept(&Scope::Global, global_body).unwrap();

        let entity = Scope::Entity(EntityId::new("Zara"));
        let mut sheet_session = EditSession::open("s", entity, &domain, options());
        sheet_session.edit("Rename", |body| body.name = "Zara's".into()).unwrap();
        sheet_session.reset_to_default(&domain).unwrap();
        assert_eq!(sheet_session.document().name, "House Rules");
        assert_eq!(sheet_session.undo_label(), Some("Reset Body Type"));

        let mut global_session = EditSession::open("g", Scope::Global, &domain, options());
        global_session.reset_to_default(&domain).unwrap();
        assert_eq!(global_session.document().name, "Humanoid");
    }

    #[test]
    fn test_reorder_generic_list() {
        let mut session = session();
        let face = session.document().locations[2].id;

        let outcome = session
            .reorder("Move Row", |body| Some(&mut body.locations), &face, 0)
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Moved { from: 2, to: 0 });
        assert_eq!(session.document().locations[0].table_name, "Face");
        assert_eq!(session.undo_label(), Some("Move Row"));

        let missing = session
            .reorder("Move Row", |body| Some(&mut body.locations), &LocationId(9999), 0)
            .unwrap();
        assert_eq!(missing, MoveOutcome::NotFound);
        assert_eq!(session.undo_label(), Some("Move Row"));
        assert!(session.undo());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_move_location_records_one_step() {
        let mut session = session();
        let torso = session.document().locations[5].id;

        let outcome = session.move_location(torso, 1).unwrap();
        assert!(outcome.changed());
        assert_eq!(session.undo_label(), Some("Hit Location Drag"));

        // Dropping onto its own slot changes nothing and records nothing
        let outcome = session.move_location(torso, 2).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert!(session.undo());
        assert!(!session.can_undo());
        assert!(!session.is_modified());
    }
}
