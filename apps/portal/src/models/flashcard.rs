use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Persisted, Placeholder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDraft {
    pub question: String,
    pub answer: String,
}

impl Persisted for Flashcard {
    type Draft = FlashcardDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> FlashcardDraft {
        FlashcardDraft {
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

impl Placeholder for FlashcardDraft {
    fn placeholder() -> Self {
        Self {
            question: "New Question".to_string(),
            answer: "New Answer".to_string(),
        }
    }
}
