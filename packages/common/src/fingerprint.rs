//! # Content Fingerprints
//!
//! A fingerprint is a 64-bit hash of a document's semantic content, used to
//! answer "did anything change?" without keeping diffs around.
//!
//! The hash is driven by the document's own `Hash` implementation, so the
//! traversal is canonical and order-sensitive: reordering two children
//! produces a different fingerprint. The hasher is unseeded, which makes the
//! value stable across clones, sessions and process restarts on the same
//! platform.
//!
//! Equal fingerprints are treated as equal content. The collision
//! probability of a 64-bit hash is accepted for dirty tracking.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Deterministic 64-bit content hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint any hashable value
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = FxHasher::default();
        value.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Raw hash value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Shorthand for [`Fingerprint::of`]
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> Fingerprint {
    Fingerprint::of(value)
}
