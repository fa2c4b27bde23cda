use crate::models::{ContentUnit, Flashcard, QuestionPool, TestQuestion};
use crate::study::audio::{MediaElement, Playlist};
use crate::study::scoring::{score, Score};

pub const EMPTY_QUESTION: &str = "Empty Question";
pub const EMPTY_ANSWER: &str = "No answer available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyDialog {
    Flashcards,
    SampleTest,
    FinalTest,
}

impl StudyDialog {
    pub fn pool(&self) -> Option<QuestionPool> {
        match self {
            Self::Flashcards => None,
            Self::SampleTest => Some(QuestionPool::Sample),
            Self::FinalTest => Some(QuestionPool::Final),
        }
    }
}

/// What a flashcard shows, with placeholders for missing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFace<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub revealed: bool,
}

/// Student view of a block/week/section: guide, audio and three study
/// dialogs that share one question cursor.
pub struct ContentViewer<M> {
    unit: ContentUnit,
    playlist: Playlist<M>,
    dialog: Option<StudyDialog>,
    question_index: usize,
    revealed: bool,
    answers: Vec<Option<String>>,
    results: Option<Score>,
}

impl<M: MediaElement> ContentViewer<M> {
    pub fn new(unit: ContentUnit, element: M) -> Self {
        let playlist = Playlist::new(unit.audios.clone(), element);
        Self {
            unit,
            playlist,
            dialog: None,
            question_index: 0,
            revealed: false,
            answers: Vec::new(),
            results: None,
        }
    }

    pub fn unit(&self) -> &ContentUnit {
        &self.unit
    }

    pub fn description(&self) -> &str {
        &self.unit.description
    }

    /// Guide link and its description, if a guide is attached.
    pub fn guide(&self) -> Option<(&str, &str)> {
        if self.unit.guide_link.trim().is_empty() {
            return None;
        }
        Some((
            self.unit.guide_link.as_str(),
            self.unit.guide_description.as_str(),
        ))
    }

    pub fn playlist(&self) -> &Playlist<M> {
        &self.playlist
    }

    pub fn playlist_mut(&mut self) -> &mut Playlist<M> {
        &mut self.playlist
    }

    pub fn active_dialog(&self) -> Option<StudyDialog> {
        self.dialog
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Opening any dialog rewinds the shared cursor; tests get a fresh
    /// answer sheet sized to their question count.
    pub fn open(&mut self, dialog: StudyDialog) {
        self.dialog = Some(dialog);
        self.question_index = 0;
        self.revealed = false;
        self.reset_answers();
    }

    pub fn close(&mut self) {
        self.dialog = None;
    }

    fn item_count(&self) -> usize {
        match self.dialog {
            Some(StudyDialog::Flashcards) => self.unit.flashcards.len(),
            Some(dialog) => dialog
                .pool()
                .map_or(0, |pool| self.unit.questions(pool).len()),
            None => 0,
        }
    }

    /// Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.question_index + 1 >= self.item_count() {
            return false;
        }
        self.question_index += 1;
        self.revealed = false;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.question_index == 0 {
            return false;
        }
        self.question_index -= 1;
        self.revealed = false;
        true
    }

    pub fn flip(&mut self) {
        if self.dialog == Some(StudyDialog::Flashcards) {
            self.revealed = !self.revealed;
        }
    }

    pub fn current_card(&self) -> Option<CardFace<'_>> {
        if self.dialog != Some(StudyDialog::Flashcards) {
            return None;
        }
        let card: Option<&Flashcard> = self.unit.flashcards.get(self.question_index);
        Some(CardFace {
            question: card
                .map(|c| c.question.as_str())
                .filter(|q| !q.trim().is_empty())
                .unwrap_or(EMPTY_QUESTION),
            answer: card
                .map(|c| c.answer.as_str())
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(EMPTY_ANSWER),
            revealed: self.revealed,
        })
    }

    fn questions(&self) -> &[TestQuestion] {
        match self.dialog.and_then(|d| d.pool()) {
            Some(pool) => self.unit.questions(pool),
            None => &[],
        }
    }

    pub fn current_question(&self) -> Option<&TestQuestion> {
        self.questions().get(self.question_index)
    }

    pub fn question_text(&self) -> &str {
        self.current_question()
            .map(|q| q.question.as_str())
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(EMPTY_QUESTION)
    }

    /// Records the choice for the current question. Ignored once results
    /// are showing or when no test is open.
    pub fn select_answer(&mut self, answer: &str) -> bool {
        if self.results.is_some() || self.current_question().is_none() {
            return false;
        }
        match self.answers.get_mut(self.question_index) {
            Some(slot) => {
                *slot = Some(answer.to_string());
                true
            }
            None => false,
        }
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.answers
            .get(self.question_index)
            .and_then(|a| a.as_deref())
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn is_last_question(&self) -> bool {
        let count = self.questions().len();
        count > 0 && self.question_index == count - 1
    }

    /// "Submit" is offered on the last question once it has an answer.
    pub fn can_submit(&self) -> bool {
        self.results.is_none() && self.is_last_question() && self.selected_answer().is_some()
    }

    /// Scores the test once and keeps the result until "Try Again".
    pub fn submit(&mut self) -> Option<Score> {
        if !self.can_submit() {
            return None;
        }
        let result = score(&self.answers, self.questions());
        self.results = Some(result);
        self.results
    }

    pub fn results(&self) -> Option<&Score> {
        self.results.as_ref()
    }

    pub fn show_results(&self) -> bool {
        self.results.is_some()
    }

    /// Banner wording for the shown results.
    pub fn verdict(&self) -> Option<&'static str> {
        let pool = self.dialog.and_then(|d| d.pool())?;
        self.results.map(|s| s.verdict(pool))
    }

    pub fn try_again(&mut self) {
        self.question_index = 0;
        self.reset_answers();
    }

    fn reset_answers(&mut self) {
        self.answers = vec![None; self.questions().len()];
        self.results = None;
    }
}
