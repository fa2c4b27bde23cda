use crate::models::{AssetKind, QuestionPool, UnitKind};

/// Child collections saved through `PUT /{unit}/{id}/{collection}/bulk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Flashcards,
    SampleQuestions,
    FinalQuestions,
    Audios,
    Presentations,
    Notes,
}

impl Collection {
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::SampleQuestions => "sample-questions",
            Self::FinalQuestions => "final-questions",
            Self::Audios => "audios",
            Self::Presentations => "presentations",
            Self::Notes => "notes",
        }
    }

    pub fn questions(pool: QuestionPool) -> Self {
        match pool {
            QuestionPool::Sample => Self::SampleQuestions,
            QuestionPool::Final => Self::FinalQuestions,
        }
    }

    pub fn assets(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Audio => Self::Audios,
            AssetKind::Presentation => Self::Presentations,
        }
    }
}

pub fn units(kind: UnitKind) -> Vec<&'static str> {
    vec![kind.collection()]
}

pub fn unit(kind: UnitKind, id: &str) -> Vec<&str> {
    vec![kind.collection(), id]
}

pub fn bulk(kind: UnitKind, id: &str, collection: Collection) -> Vec<&str> {
    vec![kind.collection(), id, collection.segment(), "bulk"]
}
