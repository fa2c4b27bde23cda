use serde::Serialize;
use tracing::{info, warn};

use crate::api_client::{AuthToken, Collection, PortalApi};
use crate::cache::{QueryCache, QueryKey};
use crate::editor::buffer::PositionalBuffer;
use crate::editor::field::{Field, FieldEditor};
use crate::editor::validation::Validate;
use crate::errors::{PortalError, Toast};
use crate::models::{
    Asset, AssetDraft, ContentUnit, Flashcard, FlashcardDraft, NoteDraft, Persisted, Placeholder,
    QuestionDraft, TestQuestion, UnitKind, UserNote,
};

/// Draft types that mirror one of a unit's child collections.
pub trait Mirrored: Sized {
    type Item: Persisted<Draft = Self>;

    fn items(unit: &ContentUnit, collection: Collection) -> &[Self::Item];
}

impl Mirrored for FlashcardDraft {
    type Item = Flashcard;

    fn items(unit: &ContentUnit, _collection: Collection) -> &[Flashcard] {
        &unit.flashcards
    }
}

impl Mirrored for QuestionDraft {
    type Item = TestQuestion;

    fn items(unit: &ContentUnit, collection: Collection) -> &[TestQuestion] {
        match collection {
            Collection::FinalQuestions => &unit.final_questions,
            _ => &unit.sample_questions,
        }
    }
}

impl Mirrored for AssetDraft {
    type Item = Asset;

    fn items(unit: &ContentUnit, collection: Collection) -> &[Asset] {
        match collection {
            Collection::Presentations => &unit.presentations,
            _ => &unit.audios,
        }
    }
}

impl Mirrored for NoteDraft {
    type Item = UserNote;

    fn items(unit: &ContentUnit, _collection: Collection) -> &[UserNote] {
        &unit.notes
    }
}

/// Dialog state for editing one child collection of a unit.
#[derive(Debug)]
pub struct CollectionEditor<D> {
    kind: UnitKind,
    unit_id: String,
    collection: Collection,
    buffer: PositionalBuffer<D>,
    fields: FieldEditor<D>,
    saving: bool,
    keep_last: bool,
}

pub type FlashcardEditor = CollectionEditor<FlashcardDraft>;
pub type QuestionEditor = CollectionEditor<QuestionDraft>;
pub type AssetEditor = CollectionEditor<AssetDraft>;
pub type NoteEditor = CollectionEditor<NoteDraft>;

impl<D> CollectionEditor<D>
where
    D: Clone + Serialize + Placeholder + Validate + Mirrored + Send + Sync,
{
    pub fn new<T: Persisted<Draft = D>>(
        kind: UnitKind,
        unit_id: impl Into<String>,
        collection: Collection,
        items: &[T],
    ) -> Self {
        Self {
            kind,
            unit_id: unit_id.into(),
            collection,
            buffer: PositionalBuffer::from_existing(items),
            fields: FieldEditor::default(),
            saving: false,
            keep_last: true,
        }
    }

    /// Lets "Delete" remove the last remaining item too.
    pub fn allow_empty(mut self) -> Self {
        self.keep_last = false;
        self
    }

    pub fn buffer(&self) -> &PositionalBuffer<D> {
        &self.buffer
    }

    pub fn current(&self) -> Option<&D> {
        self.buffer.current().map(|s| &s.draft)
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn can_delete(&self) -> bool {
        if self.saving {
            return false;
        }
        if self.keep_last {
            self.buffer.can_remove()
        } else {
            !self.buffer.is_empty()
        }
    }

    /// "Add": appends a placeholder item and shows it.
    pub fn add(&mut self) {
        self.fields.commit(&mut self.buffer);
        self.buffer.append(D::placeholder());
    }

    /// "Delete": removes the shown item unless it is the last one left and
    /// the collection must keep one.
    pub fn delete_current(&mut self) -> bool {
        if !self.can_delete() {
            return false;
        }
        self.fields.cancel();
        self.buffer.remove_current().is_some()
    }

    /// Navigation leaves edit mode, keeping whatever was typed.
    pub fn next(&mut self) -> bool {
        self.fields.commit(&mut self.buffer);
        self.buffer.next()
    }

    pub fn prev(&mut self) -> bool {
        self.fields.commit(&mut self.buffer);
        self.buffer.prev()
    }

    pub fn begin_edit(&mut self, field: Field<D>) -> bool {
        let index = self.buffer.cursor();
        self.fields.begin(&mut self.buffer, field, index)
    }

    pub fn input(&mut self, value: impl Into<String>) {
        self.fields.input(value);
    }

    pub fn commit_edit(&mut self) -> bool {
        self.fields.commit(&mut self.buffer)
    }

    pub fn cancel_edit(&mut self) {
        self.fields.cancel();
    }

    pub fn is_editing(&self, label: &str) -> bool {
        self.fields.is_editing(label, self.buffer.cursor())
    }

    pub fn pending_input(&self) -> Option<&str> {
        self.fields.pending()
    }

    /// Applies `f` to the shown item directly, for non-text edits.
    pub fn update_current<F: FnOnce(&mut D)>(&mut self, f: F) -> bool {
        self.buffer.edit_current(f)
    }

    /// Checks every item; on the first invalid one the cursor jumps to it.
    pub fn validate(&mut self) -> Result<(), PortalError> {
        let invalid = self
            .buffer
            .slots()
            .iter()
            .enumerate()
            .map(|(i, slot)| (i, slot.draft.validate()))
            .find(|(_, report)| !report.passed);
        match invalid {
            Some((index, report)) => {
                self.buffer.set_cursor(index);
                let err = report.into_result().err().unwrap_or_else(|| {
                    PortalError::Validation("Invalid item".to_string())
                });
                Err(PortalError::Validation(format!(
                    "Item {}: {}",
                    index + 1,
                    err.toast_message()
                )))
            }
            None => Ok(()),
        }
    }

    /// Submits every local change as one bulk request.
    ///
    /// On success the local additions and deletions are dropped, the cursor
    /// returns to 0, the unit's queries are invalidated and the unit is
    /// refetched so the buffer mirrors the server again. On failure nothing
    /// local changes, so the user can retry.
    pub async fn save(
        &mut self,
        api: &dyn PortalApi,
        token: &AuthToken,
        cache: &QueryCache,
    ) -> Toast {
        self.fields.commit(&mut self.buffer);
        if let Err(e) = self.validate() {
            return Toast::from(&e);
        }

        let payload = self.buffer.payload();
        let (updated, deleted, created) = (
            payload.items.len(),
            payload.deleted_ids.len(),
            payload.new_items.len(),
        );
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => return Toast::from(&PortalError::Parse(e)),
        };

        self.saving = true;
        let result = api
            .bulk_save(token, self.kind, &self.unit_id, self.collection, body)
            .await;
        self.saving = false;

        match result {
            Ok(reply) => {
                info!(
                    "Saved {} of {} {}: {updated} updated, {deleted} deleted, {created} created",
                    self.collection.segment(),
                    self.kind.label(),
                    self.unit_id
                );
                self.buffer.commit();
                cache
                    .invalidate(&QueryKey::Unit(self.kind, self.unit_id.clone()))
                    .await;
                cache.invalidate(&QueryKey::Units(self.kind)).await;
                match cache.unit(api, token, self.kind, &self.unit_id).await {
                    Ok(unit) => {
                        let collection = self.collection;
                        self.reload(D::items(&unit, collection));
                    }
                    // The save itself went through; only the refetch failed.
                    Err(e) => return Toast::from(&e),
                }
                if reply.message.is_empty() {
                    Toast::success("Saved successfully")
                } else {
                    Toast::success(reply.message)
                }
            }
            Err(e) => {
                warn!(
                    "Saving {} of {} {} failed: {e}",
                    self.collection.segment(),
                    self.kind.label(),
                    self.unit_id
                );
                Toast::from(&e)
            }
        }
    }

    /// Re-mirrors the server collection after a refetch.
    pub fn reload<T: Persisted<Draft = D>>(&mut self, items: &[T]) {
        self.fields.cancel();
        self.buffer.replace_existing(items);
    }
}

impl QuestionEditor {
    pub fn add_answer(&mut self) -> bool {
        self.buffer.edit_current(|q| {
            let n = q.answers.len() + 1;
            q.answers.push(format!("Answer {n}"));
        })
    }

    /// Keeps at least two answers. Removing the correct one leaves the
    /// question without a selected answer.
    pub fn remove_answer(&mut self, index: usize) -> bool {
        self.fields.cancel();
        let mut removed = false;
        self.buffer.edit_current(|q| {
            if q.answers.len() > 2 && index < q.answers.len() {
                let answer = q.answers.remove(index);
                if answer == q.correct_answer {
                    q.correct_answer.clear();
                }
                removed = true;
            }
        });
        removed
    }

    pub fn mark_correct(&mut self, index: usize) -> bool {
        let mut marked = false;
        self.buffer.edit_current(|q| {
            if let Some(answer) = q.answers.get(index) {
                q.correct_answer = answer.clone();
                marked = true;
            }
        });
        marked
    }
}

pub fn flashcard_question() -> Field<FlashcardDraft> {
    Field::new(
        "question",
        |d: &FlashcardDraft| d.question.clone(),
        |d: &mut FlashcardDraft, v| d.question = v,
    )
}

pub fn flashcard_answer() -> Field<FlashcardDraft> {
    Field::new(
        "answer",
        |d: &FlashcardDraft| d.answer.clone(),
        |d: &mut FlashcardDraft, v| d.answer = v,
    )
}

pub fn question_text() -> Field<QuestionDraft> {
    Field::new(
        "question",
        |d: &QuestionDraft| d.question.clone(),
        |d: &mut QuestionDraft, v| d.question = v,
    )
}

/// The `index`-th answer. Renaming the correct answer keeps it correct.
pub fn question_answer(index: usize) -> Field<QuestionDraft> {
    Field::new(
        format!("answer-{index}"),
        move |d: &QuestionDraft| d.answers.get(index).cloned().unwrap_or_default(),
        move |d: &mut QuestionDraft, v: String| {
            if let Some(slot) = d.answers.get_mut(index) {
                if *slot == d.correct_answer {
                    d.correct_answer = v.clone();
                }
                *slot = v;
            }
        },
    )
}

pub fn asset_title() -> Field<AssetDraft> {
    Field::new(
        "title",
        |d: &AssetDraft| d.title.clone(),
        |d: &mut AssetDraft, v| d.title = v,
    )
}

pub fn asset_link() -> Field<AssetDraft> {
    Field::new(
        "link",
        |d: &AssetDraft| d.link.clone(),
        |d: &mut AssetDraft, v| d.link = v,
    )
}

pub fn note_content() -> Field<NoteDraft> {
    Field::new(
        "content",
        |d: &NoteDraft| d.content.clone(),
        |d: &mut NoteDraft, v| d.content = v,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToastKind;
    use crate::models::{Asset, AssetKind, ContentUnit, Flashcard, TestQuestion};
    use crate::test_support::{unit, FakeApi};
    use serde_json::json;

    fn card(id: &str, question: &str) -> Flashcard {
        Flashcard {
            id: id.to_string(),
            question: question.to_string(),
            answer: "answer".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn unit_with_cards(cards: Vec<Flashcard>) -> ContentUnit {
        let mut u = unit("b1", 1);
        u.flashcards = cards;
        u
    }

    #[tokio::test]
    async fn test_three_new_cards_from_empty_set() {
        let api = FakeApi::with_units(UnitKind::Block, vec![unit_with_cards(vec![])]);
        let cache = QueryCache::new();
        let token = AuthToken::bearer("admin");
        let mut editor: FlashcardEditor =
            CollectionEditor::new(UnitKind::Block, "b1", Collection::Flashcards, &[] as &[Flashcard]);

        for text in ["card1", "card2", "card3"] {
            editor.add();
            editor.begin_edit(flashcard_question());
            editor.input(text);
            editor.commit_edit();
        }
        let toast = editor.save(&api, &token, &cache).await;

        assert_eq!(toast.kind, ToastKind::Success);
        let calls = api.bulk_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].unit_id, "b1");
        assert_eq!(calls[0].token, token);
        assert_eq!(calls[0].payload["items"], json!([]));
        assert_eq!(calls[0].payload["deletedIds"], json!([]));
        let questions: Vec<_> = calls[0].payload["newItems"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["question"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(questions, ["card1", "card2", "card3"]);

        let ids: Vec<_> = editor.buffer().slots().iter().filter_map(|s| s.id()).collect();
        assert_eq!(ids, ["gen-1", "gen-2", "gen-3"], "buffer mirrors the refetched unit");
        assert_eq!(editor.buffer().new_len(), 0);
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.current().unwrap().question, "card1");
    }

    #[tokio::test]
    async fn test_save_refetches_unit_into_buffer() {
        let api = FakeApi::with_units(
            UnitKind::Block,
            vec![unit_with_cards(vec![card("f1", "one"), card("f2", "two")])],
        );
        let cache = QueryCache::new();
        let token = AuthToken::bearer("admin");
        let loaded = cache.unit(&api, &token, UnitKind::Block, "b1").await.unwrap();
        cache.units(&api, &token, UnitKind::Block).await.unwrap();
        let mut editor =
            FlashcardEditor::new(UnitKind::Block, "b1", Collection::Flashcards, &loaded.flashcards);

        assert!(editor.delete_current());
        editor.add();
        let toast = editor.save(&api, &token, &cache).await;

        assert!(!toast.is_error(), "{toast:?}");
        assert!(!cache.contains(&QueryKey::Units(UnitKind::Block)).await);
        let cached = cache.unit(&api, &token, UnitKind::Block, "b1").await.unwrap();
        assert_eq!(cached.flashcards.len(), 2);

        let ids: Vec<_> = editor.buffer().slots().iter().map(|s| s.id().unwrap().to_string()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "f2");
        assert!(ids[1].starts_with("gen-"));
        assert!(editor.buffer().deleted_ids().is_empty());
        assert!(!editor.buffer().has_pending_changes());
    }

    #[test]
    fn test_reload_keeps_unsaved_additions() {
        let mut editor =
            FlashcardEditor::new(UnitKind::Block, "b1", Collection::Flashcards, &[card("f1", "one")]);
        editor.add();

        editor.reload(&[card("f1", "one"), card("f9", "from another tab")]);

        assert_eq!(editor.buffer().existing_len(), 2);
        assert_eq!(editor.buffer().new_len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_buffers_for_retry() {
        let api = FakeApi::with_units(
            UnitKind::Week,
            vec![unit_with_cards(vec![card("f1", "one"), card("f2", "two")])],
        );
        let stored = api.stored(UnitKind::Week);
        let cache = QueryCache::new();
        let token = AuthToken::bearer("admin");
        let mut editor =
            FlashcardEditor::new(UnitKind::Week, "b1", Collection::Flashcards, &stored[0].flashcards);
        editor.next();
        editor.delete_current();
        editor.add();
        let before = editor.buffer().clone();

        api.fail_next(500, "Database unavailable");
        let toast = editor.save(&api, &token, &cache).await;

        assert!(toast.is_error());
        assert_eq!(toast.message, "Database unavailable");
        assert_eq!(editor.buffer(), &before);
        assert!(!editor.is_saving());

        let retry = editor.save(&api, &token, &cache).await;
        assert_eq!(retry.kind, ToastKind::Success);
        assert_eq!(api.bulk_calls()[0].payload, api.bulk_calls()[1].payload);
    }

    #[test]
    fn test_cannot_delete_last_item() {
        let mut editor =
            FlashcardEditor::new(UnitKind::Block, "b1", Collection::Flashcards, &[card("f1", "only")]);
        assert!(!editor.can_delete());
        assert!(!editor.delete_current());
        assert_eq!(editor.buffer().len(), 1);
    }

    #[test]
    fn test_allow_empty_deletes_last_item() {
        let mut editor =
            FlashcardEditor::new(UnitKind::Block, "b1", Collection::Flashcards, &[card("f1", "only")])
                .allow_empty();
        assert!(editor.can_delete());
        assert!(editor.delete_current());
        assert!(editor.buffer().is_empty());
        assert_eq!(editor.buffer().payload().deleted_ids, ["f1"]);

        assert!(!editor.can_delete(), "nothing left to delete");
        assert!(!editor.delete_current());
    }

    #[test]
    fn test_keep_last_refuses_deleting_single_item() {
        let mut editor =
            FlashcardEditor::new(UnitKind::Block, "b1", Collection::Flashcards, &[card("f1", "only")]);
        assert!(!editor.delete_current());
        assert!(editor.buffer().payload().deleted_ids.is_empty());

        editor.add();
        assert!(editor.delete_current(), "two items allow one deletion");
        assert_eq!(editor.buffer().len(), 1);
    }

    #[test]
    fn test_navigation_commits_pending_edit() {
        let mut editor = FlashcardEditor::new(
            UnitKind::Block,
            "b1",
            Collection::Flashcards,
            &[card("f1", "one"), card("f2", "two")],
        );
        editor.begin_edit(flashcard_answer());
        editor.input("mitochondria");
        assert!(editor.is_editing("answer"));

        assert!(editor.next());
        assert!(!editor.is_editing("answer"));
        assert_eq!(editor.buffer().get(0).unwrap().draft.answer, "mitochondria");

        assert!(!editor.next(), "already at last index");
        assert!(editor.prev());
        assert!(!editor.prev(), "already at index 0");
    }

    #[tokio::test]
    async fn test_invalid_item_blocks_save_and_is_shown() {
        let api = FakeApi::with_units(UnitKind::Block, vec![unit_with_cards(vec![])]);
        let cache = QueryCache::new();
        let mut editor = FlashcardEditor::new(
            UnitKind::Block,
            "b1",
            Collection::Flashcards,
            &[card("f1", "one"), card("f2", "")],
        );
        editor.add();

        let toast = editor.save(&api, &AuthToken::bearer("admin"), &cache).await;

        assert!(toast.is_error());
        assert_eq!(toast.message, "Item 2: Question is required");
        assert_eq!(editor.cursor(), 1);
        assert!(api.bulk_calls().is_empty());
        assert_eq!(editor.buffer().new_len(), 1);
    }

    #[tokio::test]
    async fn test_week_audio_asset_needs_real_link() {
        let api = FakeApi::with_units(UnitKind::Week, vec![unit("w1", 1)]);
        let cache = QueryCache::new();
        let token = AuthToken::bearer("admin");
        let mut editor: AssetEditor = CollectionEditor::new(
            UnitKind::Week,
            "w1",
            Collection::assets(AssetKind::Audio),
            &[] as &[Asset],
        );

        editor.add();
        assert!(editor.save(&api, &token, &cache).await.is_error());

        editor.begin_edit(asset_link());
        assert_eq!(editor.pending_input(), Some("https://"));
        editor.input("https://cdn.example.com/lecture-1.mp3");
        editor.commit_edit();
        editor.begin_edit(asset_title());
        editor.input("Lecture 1");

        let toast = editor.save(&api, &token, &cache).await;
        assert_eq!(toast, Toast::success("Saved successfully"));

        let audios = &api.stored(UnitKind::Week)[0].audios;
        assert_eq!(audios.len(), 1);
        assert_eq!(audios[0].title, "Lecture 1");
        assert_eq!(audios[0].link, "https://cdn.example.com/lecture-1.mp3");
    }

    fn question(id: &str) -> TestQuestion {
        TestQuestion {
            id: id.to_string(),
            question: "Largest organ?".to_string(),
            answers: vec!["Skin".to_string(), "Liver".to_string(), "Lung".to_string()],
            correct_answer: "Skin".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_renaming_correct_answer_keeps_it_correct() {
        let mut editor =
            QuestionEditor::new(UnitKind::Block, "b1", Collection::SampleQuestions, &[question("q1")]);
        editor.begin_edit(question_answer(0));
        editor.input("The skin");
        editor.commit_edit();

        let q = editor.current().unwrap();
        assert_eq!(q.answers[0], "The skin");
        assert_eq!(q.correct_answer, "The skin");
        assert_eq!(q.correct_index(), Some(0));
    }

    #[test]
    fn test_answer_list_edits() {
        let mut editor =
            QuestionEditor::new(UnitKind::Block, "b1", Collection::FinalQuestions, &[question("q1")]);
        assert!(editor.mark_correct(1));
        assert_eq!(editor.current().unwrap().correct_answer, "Liver");
        assert!(!editor.mark_correct(9));

        assert!(editor.add_answer());
        assert_eq!(editor.current().unwrap().answers.len(), 4);

        assert!(editor.remove_answer(1));
        let q = editor.current().unwrap();
        assert_eq!(q.answers, ["Skin", "Lung", "Answer 4"]);
        assert_eq!(q.correct_index(), None);

        assert!(editor.remove_answer(0));
        assert!(!editor.remove_answer(0), "two answers is the minimum");
    }
}
