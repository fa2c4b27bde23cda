use std::fmt;
use std::sync::Arc;

use crate::editor::buffer::PositionalBuffer;

type Getter<D> = Arc<dyn Fn(&D) -> String + Send + Sync>;
type Setter<D> = Arc<dyn Fn(&mut D, String) + Send + Sync>;

/// A named, editable text field of a draft.
pub struct Field<D> {
    label: String,
    get: Getter<D>,
    set: Setter<D>,
}

impl<D> Clone for Field<D> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<D> fmt::Debug for Field<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("label", &self.label).finish()
    }
}

impl<D> Field<D> {
    pub fn new(
        label: impl Into<String>,
        get: impl Fn(&D) -> String + Send + Sync + 'static,
        set: impl Fn(&mut D, String) + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn read(&self, draft: &D) -> String {
        (self.get)(draft)
    }

    pub fn write(&self, draft: &mut D, value: String) {
        (self.set)(draft, value)
    }
}

#[derive(Debug)]
struct ActiveEdit<D> {
    field: Field<D>,
    index: usize,
    value: String,
}

/// Tracks the one field currently in edit mode and its uncommitted text.
#[derive(Debug)]
pub struct FieldEditor<D> {
    active: Option<ActiveEdit<D>>,
}

impl<D> Default for FieldEditor<D> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<D: Clone> FieldEditor<D> {
    /// Enters edit mode for `field` of the item at `index`. Any edit already
    /// in progress is committed first.
    pub fn begin(&mut self, buffer: &mut PositionalBuffer<D>, field: Field<D>, index: usize) -> bool {
        self.commit(buffer);
        let Some(slot) = buffer.get(index) else {
            return false;
        };
        let value = field.read(&slot.draft);
        self.active = Some(ActiveEdit { field, index, value });
        true
    }

    pub fn input(&mut self, value: impl Into<String>) {
        if let Some(active) = self.active.as_mut() {
            active.value = value.into();
        }
    }

    pub fn pending(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.value.as_str())
    }

    pub fn is_editing(&self, label: &str, index: usize) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.index == index && a.field.label() == label)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Enter or blur: writes the pending text into the buffer and leaves
    /// edit mode. Returns whether anything was written.
    pub fn commit(&mut self, buffer: &mut PositionalBuffer<D>) -> bool {
        match self.active.take() {
            Some(ActiveEdit { field, index, value }) => {
                buffer.edit(index, |draft| field.write(draft, value))
            }
            None => false,
        }
    }

    /// Escape: leaves edit mode without writing.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}
