use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Persisted, Placeholder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Audio,
    Presentation,
}

/// Audio lecture or presentation attached to a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDraft {
    pub title: String,
    pub link: String,
}

impl Persisted for Asset {
    type Draft = AssetDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> AssetDraft {
        AssetDraft {
            title: self.title.clone(),
            link: self.link.clone(),
        }
    }
}

impl Placeholder for AssetDraft {
    fn placeholder() -> Self {
        Self {
            title: "New Title".to_string(),
            link: "https://".to_string(),
        }
    }
}
