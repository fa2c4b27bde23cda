use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Asset, AssetKind, Flashcard, Persisted, QuestionPool, TestQuestion, UserNote};

/// Block, Week and Section name the same curriculum unit at different
/// points of the product's history; only the REST collection differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Block,
    Week,
    Section,
}

impl UnitKind {
    /// REST collection segment, e.g. `/blocks`.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Block => "blocks",
            Self::Week => "weeks",
            Self::Section => "sections",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Block => "Block",
            Self::Week => "Week",
            Self::Section => "Section",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUnit {
    pub id: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guide_link: String,
    #[serde(default)]
    pub guide_description: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub sample_questions: Vec<TestQuestion>,
    #[serde(default)]
    pub final_questions: Vec<TestQuestion>,
    #[serde(default)]
    pub audios: Vec<Asset>,
    #[serde(default)]
    pub presentations: Vec<Asset>,
    #[serde(default)]
    pub notes: Vec<UserNote>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentUnit {
    pub fn questions(&self, pool: QuestionPool) -> &[TestQuestion] {
        match pool {
            QuestionPool::Sample => &self.sample_questions,
            QuestionPool::Final => &self.final_questions,
        }
    }

    pub fn assets(&self, kind: AssetKind) -> &[Asset] {
        match kind {
            AssetKind::Audio => &self.audios,
            AssetKind::Presentation => &self.presentations,
        }
    }
}

/// Editable scalar fields of a unit; child collections are saved through
/// their own bulk endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDraft {
    pub order: i32,
    pub title: String,
    pub description: String,
    pub guide_link: String,
    pub guide_description: String,
}

impl UnitDraft {
    pub fn placeholder(kind: UnitKind, order: i32) -> Self {
        Self {
            order,
            title: format!("New {}", kind.label()),
            description: String::new(),
            guide_link: String::new(),
            guide_description: String::new(),
        }
    }
}

impl Persisted for ContentUnit {
    type Draft = UnitDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> UnitDraft {
        UnitDraft {
            order: self.order,
            title: self.title.clone(),
            description: self.description.clone(),
            guide_link: self.guide_link.clone(),
            guide_description: self.guide_description.clone(),
        }
    }
}
