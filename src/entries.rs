//! The ordered entry list that feeds the wheel.
//!
//! Entries are stored in an id-keyed map and the list order is a separate
//! vector of ids. Reordering only ever touches the id vector, so weight, color
//! and image stay attached to the entry they were set on.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Ordered collection of wheel entries with stable identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryList {
    order: Vec<EntryId>,
    entries: HashMap<EntryId, Entry>,
}

impl EntryList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list with one entry per line of `text`.
    ///
    /// Lines are kept as typed (including blank ones) so the editor can show
    /// them; blank lines never reach the wheel.
    pub fn from_text(text: &str) -> Self {
        let mut list = Self::new();
        for line in text.lines() {
            list.add(line.trim());
        }
        list
    }

    /// Joins the labels back into newline-separated text.
    pub fn to_text(&self) -> String {
        self.iter()
            .map(|e| e.label.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of entries, drawable or not.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the list has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates entries in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.order.iter().filter_map(move |id| self.entries.get(id))
    }

    /// Ids in list order.
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Looks up an entry by list position.
    pub fn at(&self, index: usize) -> Option<&Entry> {
        self.order.get(index).and_then(|id| self.entries.get(id))
    }

    /// Current list position of an entry.
    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    /// Appends a new entry and returns its id.
    pub fn add(&mut self, label: impl Into<String>) -> EntryId {
        self.push_entry(Entry::new(label))
    }

    /// Appends an already constructed entry, keeping its id.
    pub fn push_entry(&mut self, entry: Entry) -> EntryId {
        let id = entry.id;
        self.order.push(id);
        self.entries.insert(id, entry);
        id
    }

    /// Inserts an entry at `index` (clamped to the list length), keeping its id.
    pub fn insert_entry(&mut self, index: usize, entry: Entry) -> EntryId {
        let id = entry.id;
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        self.entries.insert(id, entry);
        id
    }

    /// Inserts a new entry right after `index`, or at the end if out of range.
    pub fn insert_after(&mut self, index: usize, label: impl Into<String>) -> EntryId {
        self.insert_entry(index.saturating_add(1), Entry::new(label))
    }

    /// Removes an entry, returning it with the position it occupied.
    pub fn remove(&mut self, id: &EntryId) -> Option<(usize, Entry)> {
        let index = self.position(id)?;
        self.order.remove(index);
        self.entries.remove(id).map(|entry| (index, entry))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Replaces an entry's label. Returns the previous label.
    pub fn set_label(&mut self, id: &EntryId, label: impl Into<String>) -> Option<String> {
        let entry = self.entries.get_mut(id)?;
        Some(std::mem::replace(&mut entry.label, label.into()))
    }

    /// Sets an entry's weight, clamped to `[0, 200]`. Returns the previous weight.
    pub fn set_weight(&mut self, id: &EntryId, weight: i64) -> Option<u32> {
        let entry = self.entries.get_mut(id)?;
        Some(std::mem::replace(&mut entry.weight, clamp_weight(weight)))
    }

    /// Sets or clears an entry's color override. Returns the previous value.
    pub fn set_color(&mut self, id: &EntryId, color: Option<Color>) -> Option<Option<Color>> {
        let entry = self.entries.get_mut(id)?;
        Some(std::mem::replace(&mut entry.color, color))
    }

    /// Sets or clears an entry's image source. Returns the previous value.
    pub fn set_image(&mut self, id: &EntryId, image: Option<String>) -> Option<Option<String>> {
        let entry = self.entries.get_mut(id)?;
        Some(std::mem::replace(&mut entry.image, image))
    }

    /// Includes or excludes an entry from the wheel. Returns the previous flag.
    pub fn set_included(&mut self, id: &EntryId, included: bool) -> Option<bool> {
        let entry = self.entries.get_mut(id)?;
        Some(std::mem::replace(&mut entry.included, included))
    }

    /// Moves the entry at `from` so it ends up at `to`, as a drag does.
    ///
    /// Returns `false` when either index is out of range.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.order.len() || to >= self.order.len() {
            return false;
        }
        let id = self.order.remove(from);
        self.order.insert(to, id);
        true
    }

    /// Sorts or shuffles the list. Entries with blank labels are dropped first.
    pub fn apply_order<R: Rng + ?Sized>(&mut self, order: NameOrder, rng: &mut R) {
        let blank: Vec<EntryId> = self
            .iter()
            .filter(|e| e.display_label().is_empty())
            .map(|e| e.id)
            .collect();
        for id in &blank {
            self.remove(id);
        }

        let entries = &self.entries;
        let key = |id: &EntryId| {
            let label = entries.get(id).map(|e| e.display_label()).unwrap_or_default();
            (label.to_lowercase(), label.to_string())
        };
        match order {
            NameOrder::Ascending => self.order.sort_by_key(key),
            NameOrder::Descending => {
                self.order.sort_by_key(key);
                self.order.reverse();
            }
            NameOrder::Shuffle => self.order.shuffle(rng),
        }
    }

    /// Entries that get a sector, in list order.
    pub fn drawable(&self) -> Vec<&Entry> {
        self.iter().filter(|e| e.is_drawable()).collect()
    }

    /// Weights of the drawable entries, in list order.
    pub fn drawable_weights(&self) -> Vec<u32> {
        self.iter()
            .filter(|e| e.is_drawable())
            .map(|e| e.weight)
            .collect()
    }

    /// Sum of the drawable entries' weights.
    pub fn total_drawable_weight(&self) -> u32 {
        self.drawable_weights().iter().sum()
    }

    /// Share of the wheel an entry occupies, in `[0, 1]`.
    ///
    /// Non-drawable entries have no share. When every drawable weight is zero
    /// the wheel falls back to equal shares.
    pub fn share_of(&self, id: &EntryId) -> f64 {
        let drawable = self.drawable();
        let Some(index) = drawable.iter().position(|e| &e.id == id) else {
            return 0.0;
        };
        let weights: Vec<u32> = drawable.iter().map(|e| e.weight).collect();
        crate::layout::fractions(&weights)[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labels(list: &EntryList) -> Vec<&str> {
        list.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn test_from_text_keeps_lines_in_order() {
        let list = EntryList::from_text("Alice\nBob\n\nCharlie");
        assert_eq!(labels(&list), vec!["Alice", "Bob", "", "Charlie"]);
        assert_eq!(list.drawable().len(), 3);
        assert_eq!(list.to_text(), "Alice\nBob\n\nCharlie");
    }

    #[test]
    fn test_drawable_respects_include_flag() {
        let mut list = EntryList::from_text("Alice\nBob\nCharlie");
        let bob = list.ids()[1];
        list.set_included(&bob, false);

        let drawn: Vec<&str> = list.drawable().iter().map(|e| e.display_label()).collect();
        assert_eq!(drawn, vec!["Alice", "Charlie"]);
        // Excluded, not deleted
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_weight_is_clamped() {
        let mut list = EntryList::new();
        let id = list.add("A");
        assert_eq!(list.set_weight(&id, 500), Some(1));
        assert_eq!(list.get(&id).unwrap().weight, 200);
        list.set_weight(&id, -3);
        assert_eq!(list.get(&id).unwrap().weight, 0);
    }

    #[test]
    fn test_reorder_keeps_customisation_with_entry() {
        let mut list = EntryList::from_text("Alice\nCarol\nBob");
        let bob = list.ids()[2];
        let red = Color::rgb(255, 0, 0);
        list.set_color(&bob, Some(red));
        list.set_image(&bob, Some("images/wheel/bob.png".into()));
        list.set_weight(&bob, 7);

        assert!(list.move_entry(2, 0));

        let first = list.at(0).unwrap();
        assert_eq!(first.id, bob);
        assert_eq!(first.label, "Bob");
        assert_eq!(first.color, Some(red));
        assert_eq!(first.image.as_deref(), Some("images/wheel/bob.png"));
        assert_eq!(first.weight, 7);
        // Whoever now sits at Bob's old index did not inherit anything
        let third = list.at(2).unwrap();
        assert_eq!(third.color, None);
        assert_eq!(third.weight, 1);
    }

    #[test]
    fn test_duplicate_labels_keep_separate_identity() {
        let mut list = EntryList::from_text("Sam\nSam");
        let (first, second) = (list.ids()[0], list.ids()[1]);
        list.set_color(&second, Some(Color::BLACK));
        list.move_entry(1, 0);

        assert_eq!(list.at(0).unwrap().id, second);
        assert_eq!(list.at(0).unwrap().color, Some(Color::BLACK));
        assert_eq!(list.get(&first).unwrap().color, None);
    }

    #[test]
    fn test_move_entry_out_of_range() {
        let mut list = EntryList::from_text("A\nB");
        assert!(!list.move_entry(0, 5));
        assert_eq!(labels(&list), vec!["A", "B"]);
    }

    #[test]
    fn test_insert_after_and_remove() {
        let mut list = EntryList::from_text("A\nC");
        let b = list.insert_after(0, "B");
        assert_eq!(labels(&list), vec!["A", "B", "C"]);

        let (index, removed) = list.remove(&b).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.label, "B");
        assert!(list.get(&b).is_none());
        assert!(list.remove(&b).is_none());
    }

    #[test]
    fn test_apply_order_sorts_and_drops_blank_lines() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut list = EntryList::from_text("charlie\n\nAlice\nbob");
        let alice = list.ids()[2];
        list.set_weight(&alice, 9);

        list.apply_order(NameOrder::Ascending, &mut rng);
        assert_eq!(labels(&list), vec!["Alice", "bob", "charlie"]);
        assert_eq!(list.at(0).unwrap().weight, 9);

        list.apply_order(NameOrder::Descending, &mut rng);
        assert_eq!(labels(&list), vec!["charlie", "bob", "Alice"]);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut list = EntryList::from_text("A\nB\nC\nD\nE\nF");
        let mut before: Vec<EntryId> = list.ids().to_vec();

        list.apply_order(NameOrder::Shuffle, &mut rng);

        let mut after: Vec<EntryId> = list.ids().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_share_of_uses_drawable_weights() {
        let mut list = EntryList::from_text("A\nB\nC");
        let ids = list.ids().to_vec();
        list.set_weight(&ids[1], 3);
        list.set_included(&ids[2], false);

        assert!((list.share_of(&ids[0]) - 0.25).abs() < 1e-12);
        assert!((list.share_of(&ids[1]) - 0.75).abs() < 1e-12);
        assert_eq!(list.share_of(&ids[2]), 0.0);
        assert_eq!(list.total_drawable_weight(), 4);
    }
}
