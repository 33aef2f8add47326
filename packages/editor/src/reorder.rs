//! # Sibling Reordering
//!
//! Moves an existing child to a new position inside its sibling list.
//!
//! The UI layer does the hit-testing and hands over the drop position as a
//! [`DropTarget`]. Items are located by identity, never by value, because
//! two siblings may hold identical values.
//!
//! ```text
//! [A, B, C, D]  move C → 1   [A, C, B, D]
//! [A, B, C, D]  move A → 4   [B, C, D, A]
//! [A, B, C, D]  move B → 1   unchanged
//! [A, B, C, D]  move B → 2   unchanged
//! ```

/// Items with a stable identity distinct from their value
pub trait Identified {
    type Id: PartialEq;

    fn identity(&self) -> &Self::Id;
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The item now lives at `to`
    Moved { from: usize, to: usize },

    /// The target resolved to the item's current position
    Unchanged,

    /// No sibling has the requested identity
    NotFound,
}

impl MoveOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Insertion index computed from a hit-tested child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub index: usize,
}

impl DropTarget {
    /// `below_center` is true when the pointer is on the lower half of the
    /// child at `child_index`, meaning "insert after it".
    pub fn from_hit(child_index: usize, below_center: bool) -> Self {
        let index = if below_center {
            child_index + 1
        } else {
            child_index
        };
        Self { index }
    }
}

/// Move the item with identity `id` to insertion index `target`
///
/// `target` is expressed against the list *before* removal, the way a drop
/// indicator between two rows reads. Targets past the end append.
pub fn move_item<T: Identified>(list: &mut Vec<T>, id: &T::Id, target: usize) -> MoveOutcome {
    move_where(list, |item| item.identity() == id, target)
}

/// Same as [`move_item`], locating the item with a predicate
pub fn move_where<T, F>(list: &mut Vec<T>, is_item: F, target: usize) -> MoveOutcome
where
    F: Fn(&T) -> bool,
{
    let Some(from) = list.iter().position(|item| is_item(item)) else {
        return MoveOutcome::NotFound;
    };

    let mut to = target.min(list.len());
    // Removing the item shifts everything after it down by one
    if from < to {
        to -= 1;
    }

    if from == to {
        return MoveOutcome::Unchanged;
    }

    let item = list.remove(from);
    list.insert(to, item);
    MoveOutcome::Moved { from, to }
}

/// Pure variant of [`move_item`]
pub fn moved<T: Identified>(mut list: Vec<T>, id: &T::Id, target: usize) -> Vec<T> {
    move_item(&mut list, id, target);
    list
}
