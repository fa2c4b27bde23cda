use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Persisted, Placeholder};

/// Freeform per-user annotation on a content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNote {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub content: String,
    /// Local id carried until the backend assigns a real one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Millisecond timestamp used as a note id before it is persisted.
/// Two notes created in the same millisecond collide; nothing guards that.
pub fn local_note_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

impl Persisted for UserNote {
    type Draft = NoteDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            content: self.content.clone(),
            client_id: None,
        }
    }
}

impl Placeholder for NoteDraft {
    fn placeholder() -> Self {
        Self {
            content: String::new(),
            client_id: Some(local_note_id()),
        }
    }
}
