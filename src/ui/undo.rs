//! Undo/redo for entry list edits.
//!
//! Every edit made through the side panel is recorded as an [`EntryAction`].
//! Undoing an action applies its inverse and hands that inverse back, so the
//! same machinery serves redo.

use crate::constants::MAX_UNDO_HISTORY;
use crate::entries::EntryList;
use crate::types::*;

/// A reversible edit of the entry list.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryAction {
    /// An entry was inserted at `index`
    Added { entry: Entry, index: usize },
    /// An entry was removed from `index`
    Removed { entry: Entry, index: usize },
    /// An entry's label changed
    Relabeled {
        id: EntryId,
        old_label: String,
        new_label: String,
    },
    /// An entry's weight changed
    WeightChanged { id: EntryId, old_weight: u32, new_weight: u32 },
    /// An entry's color override changed
    ColorChanged {
        id: EntryId,
        old_color: Option<Color>,
        new_color: Option<Color>,
    },
    /// An entry's image changed
    ImageChanged {
        id: EntryId,
        old_image: Option<String>,
        new_image: Option<String>,
    },
    /// An entry was included or excluded
    InclusionChanged { id: EntryId, old: bool, new: bool },
    /// An entry was dragged from one position to another
    Moved { from: usize, to: usize },
    /// The whole list was replaced (sort, shuffle, clear)
    Replaced { before: EntryList, after: EntryList },
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone, Default)]
pub struct UndoHistory {
    undo_stack: Vec<EntryAction>,
    redo_stack: Vec<EntryAction>,
}

impl UndoHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new action.
    ///
    /// This clears the redo stack since a new action invalidates anything
    /// previously undone. The oldest action is dropped past 200 entries.
    pub fn push_action(&mut self, action: EntryAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Records an action, folding it into the previous one when both change
    /// the label or both change the weight of the same entry. Typing a word or
    /// dragging a weight then undoes in one step.
    pub fn push_coalescing(&mut self, action: EntryAction) {
        if let Some(last) = self.undo_stack.last_mut() {
            match (last, &action) {
                (
                    EntryAction::Relabeled { id, new_label, .. },
                    EntryAction::Relabeled {
                        id: next,
                        new_label: label,
                        ..
                    },
                ) if *id == *next => {
                    *new_label = label.clone();
                    self.redo_stack.clear();
                    return;
                }
                (
                    EntryAction::WeightChanged { id, new_weight, .. },
                    EntryAction::WeightChanged {
                        id: next,
                        new_weight: weight,
                        ..
                    },
                ) if *id == *next => {
                    *new_weight = *weight;
                    self.redo_stack.clear();
                    return;
                }
                _ => {}
            }
        }
        self.push_action(action);
    }

    /// Returns true if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pops the most recent action from the undo stack.
    pub fn pop_undo(&mut self) -> Option<EntryAction> {
        self.undo_stack.pop()
    }

    /// Pops the most recent action from the redo stack.
    pub fn pop_redo(&mut self) -> Option<EntryAction> {
        self.redo_stack.pop()
    }

    /// Pushes an undone action's inverse onto the redo stack.
    pub fn push_redo(&mut self, action: EntryAction) {
        self.redo_stack.push(action);
    }

    /// Pushes a redone action's inverse back onto the undo stack without
    /// touching the redo stack.
    pub fn push_undo(&mut self, action: EntryAction) {
        self.undo_stack.push(action);
    }

    /// Number of undoable actions.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }
}

/// Applying recorded actions to an entry list.
pub trait UndoableEntryList {
    /// Reverses `action` and returns the action that would reverse it again,
    /// or `None` if the entry it refers to no longer exists.
    fn apply_undo(&mut self, action: &EntryAction) -> Option<EntryAction>;

    /// Re-applies an action previously returned by [`Self::apply_undo`].
    fn apply_redo(&mut self, action: &EntryAction) -> Option<EntryAction>;
}

impl UndoableEntryList for EntryList {
    fn apply_undo(&mut self, action: &EntryAction) -> Option<EntryAction> {
        match action {
            EntryAction::Added { entry, .. } => {
                let (index, entry) = self.remove(&entry.id)?;
                Some(EntryAction::Removed { entry, index })
            }
            EntryAction::Removed { entry, index } => {
                self.insert_entry(*index, entry.clone());
                Some(EntryAction::Added {
                    entry: entry.clone(),
                    index: *index,
                })
            }
            EntryAction::Relabeled {
                id,
                old_label,
                new_label,
            } => {
                self.set_label(id, old_label.clone())?;
                Some(EntryAction::Relabeled {
                    id: *id,
                    old_label: new_label.clone(),
                    new_label: old_label.clone(),
                })
            }
            EntryAction::WeightChanged {
                id,
                old_weight,
                new_weight,
            } => {
                self.set_weight(id, *old_weight as i64)?;
                Some(EntryAction::WeightChanged {
                    id: *id,
                    old_weight: *new_weight,
                    new_weight: *old_weight,
                })
            }
            EntryAction::ColorChanged {
                id,
                old_color,
                new_color,
            } => {
                self.set_color(id, *old_color)?;
                Some(EntryAction::ColorChanged {
                    id: *id,
                    old_color: *new_color,
                    new_color: *old_color,
                })
            }
            EntryAction::ImageChanged {
                id,
                old_image,
                new_image,
            } => {
                self.set_image(id, old_image.clone())?;
                Some(EntryAction::ImageChanged {
                    id: *id,
                    old_image: new_image.clone(),
                    new_image: old_image.clone(),
                })
            }
            EntryAction::InclusionChanged { id, old, new } => {
                self.set_included(id, *old)?;
                Some(EntryAction::InclusionChanged {
                    id: *id,
                    old: *new,
                    new: *old,
                })
            }
            EntryAction::Moved { from, to } => {
                self.move_entry(*to, *from).then_some(EntryAction::Moved {
                    from: *to,
                    to: *from,
                })
            }
            EntryAction::Replaced { before, after } => {
                *self = before.clone();
                Some(EntryAction::Replaced {
                    before: after.clone(),
                    after: before.clone(),
                })
            }
        }
    }

    fn apply_redo(&mut self, action: &EntryAction) -> Option<EntryAction> {
        // Redo is just applying the reverse of an undo
        self.apply_undo(action)
    }
}
