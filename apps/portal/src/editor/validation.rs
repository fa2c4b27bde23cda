use serde::Serialize;
use url::Url;

use crate::errors::PortalError;
use crate::models::{AssetDraft, FlashcardDraft, NoteDraft, QuestionDraft, UnitDraft};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of checking a form before it is submitted.
///
/// `warnings` describe states the backend accepts but the UI renders oddly;
/// they never block a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Vec<FieldError>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            passed: true,
            ..Self::default()
        }
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.passed = false;
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn require(&mut self, field: &str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.error(field, format!("{label} is required"));
        }
    }

    fn link(&mut self, field: &str, label: &str, value: &str, required: bool) {
        if value.trim().is_empty() {
            if required {
                self.error(field, format!("{label} is required"));
            }
            return;
        }
        if !is_web_url(value) {
            self.error(field, format!("{label} must be a valid http(s) URL"));
        }
    }

    pub fn into_result(self) -> Result<Self, PortalError> {
        if self.passed {
            return Ok(self);
        }
        let message = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Err(PortalError::Validation(message))
    }
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Title is required; the guide link is optional but must be a URL if set.
pub fn validate_unit(draft: &UnitDraft) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.require("title", "Title", &draft.title);
    report.link("guideLink", "Guide link", &draft.guide_link, false);
    if draft.order < 0 {
        report.error("order", "Order cannot be negative");
    }
    report
}

pub fn validate_asset(draft: &AssetDraft) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.require("title", "Title", &draft.title);
    report.link("link", "Link", &draft.link, true);
    report
}

pub fn validate_flashcard(draft: &FlashcardDraft) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.require("question", "Question", &draft.question);
    report.require("answer", "Answer", &draft.answer);
    report
}

pub fn validate_question(draft: &QuestionDraft) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.require("question", "Question", &draft.question);
    if draft.answers.len() < 2 {
        report.error("answers", "At least two answers are required");
    }
    if draft.answers.iter().any(|a| a.trim().is_empty()) {
        report.error("answers", "Answers cannot be empty");
    }
    if draft.correct_index().is_none() {
        report
            .warnings
            .push("No correct answer is selected".to_string());
    }
    report
}

pub fn validate_note(draft: &NoteDraft) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.require("content", "Note", &draft.content);
    report
}

/// Drafts that can be checked before a bulk save.
pub trait Validate {
    fn validate(&self) -> ValidationReport;
}

impl Validate for FlashcardDraft {
    fn validate(&self) -> ValidationReport {
        validate_flashcard(self)
    }
}

impl Validate for QuestionDraft {
    fn validate(&self) -> ValidationReport {
        validate_question(self)
    }
}

impl Validate for AssetDraft {
    fn validate(&self) -> ValidationReport {
        validate_asset(self)
    }
}

impl Validate for NoteDraft {
    fn validate(&self) -> ValidationReport {
        validate_note(self)
    }
}

impl Validate for UnitDraft {
    fn validate(&self) -> ValidationReport {
        validate_unit(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Placeholder, UnitKind};

    #[test]
    fn test_placeholder_unit_is_valid() {
        let report = validate_unit(&UnitDraft::placeholder(UnitKind::Block, 1));
        assert!(report.passed, "{report:?}");
    }

    #[test]
    fn test_unit_requires_title_and_web_link() {
        let mut draft = UnitDraft::placeholder(UnitKind::Week, 1);
        draft.title = "   ".to_string();
        draft.guide_link = "ftp://files.example.com/guide.pdf".to_string();

        let report = validate_unit(&draft);
        assert!(!report.passed);
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "guideLink"]);
    }

    #[test]
    fn test_asset_link_required() {
        let draft = AssetDraft {
            title: "Lecture 1".to_string(),
            link: String::new(),
        };
        let err = validate_asset(&draft).into_result().unwrap_err();
        assert_eq!(err.toast_message(), "Link is required");
    }

    #[test]
    fn test_placeholder_asset_link_is_rejected() {
        // "https://" alone has no host
        assert!(!validate_asset(&AssetDraft::placeholder()).passed);
    }

    #[test]
    fn test_flashcard_requires_both_sides() {
        let draft = FlashcardDraft {
            question: "Define osmosis".to_string(),
            answer: String::new(),
        };
        let report = validate_flashcard(&draft);
        assert!(!report.passed);
        assert_eq!(report.errors[0].field, "answer");
    }

    #[test]
    fn test_missing_correct_answer_only_warns() {
        let draft = QuestionDraft {
            question: "Pick one".to_string(),
            answers: vec!["A".to_string(), "B".to_string()],
            correct_answer: "Z".to_string(),
        };
        let report = validate_question(&draft);
        assert!(report.passed);
        assert_eq!(report.warnings, ["No correct answer is selected"]);
    }

    #[test]
    fn test_question_needs_two_answers() {
        let draft = QuestionDraft {
            question: "Pick one".to_string(),
            answers: vec!["A".to_string()],
            correct_answer: "A".to_string(),
        };
        assert!(!validate_question(&draft).passed);
    }
}
