use crate::api_client::{AuthToken, Collection, PortalApi};
use crate::cache::QueryCache;
use crate::editor::collection::{note_content, NoteEditor};
use crate::errors::Toast;
use crate::models::{ContentUnit, UnitKind};

/// A student's own notes on a unit, edited locally and saved in one request.
pub struct NotesPanel {
    editor: NoteEditor,
}

impl NotesPanel {
    pub fn new(kind: UnitKind, unit: &ContentUnit) -> Self {
        Self {
            editor: NoteEditor::new(kind, unit.id.clone(), Collection::Notes, &unit.notes)
                .allow_empty(),
        }
    }

    pub fn editor(&self) -> &NoteEditor {
        &self.editor
    }

    /// Starts a blank note with a local id and opens it for typing.
    pub fn add(&mut self) {
        self.editor.add();
        self.editor.begin_edit(note_content());
    }

    pub fn write(&mut self, text: impl Into<String>) {
        if !self.editor.is_editing(note_content().label()) {
            self.editor.begin_edit(note_content());
        }
        self.editor.input(text);
    }

    pub fn finish(&mut self) -> bool {
        self.editor.commit_edit()
    }

    /// Unlike admin collections, a student may delete every note.
    pub fn delete_current(&mut self) -> bool {
        self.editor.delete_current()
    }

    pub fn contents(&self) -> Vec<&str> {
        self.editor
            .buffer()
            .slots()
            .iter()
            .map(|s| s.draft.content.as_str())
            .collect()
    }

    pub async fn save(
        &mut self,
        api: &dyn PortalApi,
        token: &AuthToken,
        cache: &QueryCache,
    ) -> Toast {
        self.editor.save(api, token, cache).await
    }
}
