//! # Editable Documents
//!
//! A document is any plain-data structure a session can edit: a body type,
//! a library descriptor, and so on.
//!
//! ## Requirements
//!
//! - **Independent clones**: `clone()` must not share mutable state with the
//!   original. Undo snapshots are clones, and they must never change after
//!   they are taken.
//! - **Canonical hash**: `Hash` walks the semantic content in a fixed order.
//!   Fields that only exist for the UI (focus keys, node identities) stay
//!   out of the hash so that re-keying never marks a document modified.
//! - **Re-keying**: a document that arrives from outside (a file, the
//!   accepted settings) gets fresh internal keys before a session owns it.

use sheetedit_common::Fingerprint;
use std::hash::Hash;

/// Document that can be owned by an [`EditSession`](crate::EditSession)
pub trait Document: Clone + Hash + Send + 'static {
    /// Re-key internal cross references using the session's allocator
    fn rekey(&mut self, keys: &mut KeyAllocator);

    /// Content fingerprint
    fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

/// Documents with a built-in factory default ("reset to default")
pub trait FactoryDefault: Document {
    fn factory() -> Self;
}

/// Sequential key generator for the nodes of session-owned documents
#[derive(Debug, Clone)]
pub struct KeyAllocator {
    seed: String,
    count: u64,
}

impl KeyAllocator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Next numeric node identity
    pub fn next_id(&mut self) -> u64 {
        self.count += 1;
        self.count
    }

    /// Next focus-key prefix, e.g. `"body-7."`
    pub fn next_prefix(&mut self) -> String {
        let id = self.next_id();
        format!("{}-{}.", self.seed, id)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
