//! Positional editing buffer.
//!
//! Items are kept in one tagged sequence: every slot knows whether it
//! mirrors a persisted record or was added locally, so a single cursor
//! addresses the whole collection without boundary arithmetic. Existing
//! slots always precede new ones because `append` only ever pushes.

use crate::editor::bulk::{BulkPayload, ExistingItem};
use crate::models::Persisted;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Existing(String),
    New,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot<D> {
    pub origin: Origin,
    pub draft: D,
}

impl<D> Slot<D> {
    pub fn is_new(&self) -> bool {
        self.origin == Origin::New
    }

    pub fn id(&self) -> Option<&str> {
        match &self.origin {
            Origin::Existing(id) => Some(id),
            Origin::New => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionalBuffer<D> {
    slots: Vec<Slot<D>>,
    deleted_ids: Vec<String>,
    cursor: usize,
}

impl<D> Default for PositionalBuffer<D> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            deleted_ids: Vec::new(),
            cursor: 0,
        }
    }
}

impl<D: Clone> PositionalBuffer<D> {
    pub fn from_existing<T: Persisted<Draft = D>>(items: &[T]) -> Self {
        Self {
            slots: existing_slots(items),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&Slot<D>> {
        self.slots.get(index)
    }

    pub fn current(&self) -> Option<&Slot<D>> {
        self.slots.get(self.cursor)
    }

    pub fn slots(&self) -> &[Slot<D>] {
        &self.slots
    }

    pub fn existing_len(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_new()).count()
    }

    pub fn new_len(&self) -> usize {
        self.slots.len() - self.existing_len()
    }

    pub fn deleted_ids(&self) -> &[String] {
        &self.deleted_ids
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.deleted_ids.is_empty() || self.slots.iter().any(Slot::is_new)
    }

    /// Adds an unsaved item at the end and moves the cursor onto it.
    pub fn append(&mut self, draft: D) {
        self.slots.push(Slot {
            origin: Origin::New,
            draft,
        });
        self.cursor = self.slots.len() - 1;
    }

    /// The delete button's guard: the last remaining item cannot be removed.
    pub fn can_remove(&self) -> bool {
        self.slots.len() >= 2
    }

    /// Removes the slot at `index`. A persisted item's id moves to
    /// `deleted_ids` in the same step. The cursor steps back by one unless
    /// it is already at 0.
    pub fn remove_at(&mut self, index: usize) -> Option<Slot<D>> {
        if index >= self.slots.len() {
            return None;
        }
        let slot = self.slots.remove(index);
        if let Origin::Existing(id) = &slot.origin {
            self.deleted_ids.push(id.clone());
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.clamp_cursor();
        Some(slot)
    }

    pub fn remove_current(&mut self) -> Option<Slot<D>> {
        self.remove_at(self.cursor)
    }

    /// Applies `f` to the draft at `index`, whichever side of the
    /// existing/new boundary it sits on.
    pub fn edit<F: FnOnce(&mut D)>(&mut self, index: usize, f: F) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                f(&mut slot.draft);
                true
            }
            None => false,
        }
    }

    pub fn edit_current<F: FnOnce(&mut D)>(&mut self, f: F) -> bool {
        self.edit(self.cursor, f)
    }

    /// Returns whether the cursor moved.
    pub fn prev(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 >= self.slots.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index;
        self.clamp_cursor();
    }

    pub fn payload(&self) -> BulkPayload<D> {
        let mut items = Vec::new();
        let mut new_items = Vec::new();
        for slot in &self.slots {
            match &slot.origin {
                Origin::Existing(id) => items.push(ExistingItem {
                    id: id.clone(),
                    draft: slot.draft.clone(),
                }),
                Origin::New => new_items.push(slot.draft.clone()),
            }
        }
        BulkPayload {
            items,
            deleted_ids: self.deleted_ids.clone(),
            new_items,
        }
    }

    /// Called after a successful save: the server now owns the data, so
    /// local additions and deletions are dropped and the cursor returns to 0.
    pub fn commit(&mut self) {
        self.slots.retain(|s| !s.is_new());
        self.deleted_ids.clear();
        self.cursor = 0;
    }

    /// Re-mirrors freshly fetched records while keeping unsaved additions
    /// and deletions that still apply.
    pub fn replace_existing<T: Persisted<Draft = D>>(&mut self, items: &[T]) {
        let deleted = std::mem::take(&mut self.deleted_ids);
        let mut slots: Vec<Slot<D>> = existing_slots(items)
            .into_iter()
            .filter(|s| s.id().map_or(true, |id| !deleted.iter().any(|d| d == id)))
            .collect();
        self.deleted_ids = deleted
            .into_iter()
            .filter(|id| items.iter().any(|item| item.id() == id.as_str()))
            .collect();
        slots.extend(self.slots.drain(..).filter(Slot::is_new));
        self.slots = slots;
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.slots.len().saturating_sub(1));
    }
}

fn existing_slots<T: Persisted>(items: &[T]) -> Vec<Slot<T::Draft>> {
    items
        .iter()
        .map(|item| Slot {
            origin: Origin::Existing(item.id().to_string()),
            draft: item.to_draft(),
        })
        .collect()
}
