//! Entity shapes as the portal consumes them.
//!
//! The backend owns the authoritative schema; these types are read-only
//! mirrors plus the editable "draft" half of each entity (everything except
//! the id and timestamps).

#![allow(dead_code)]

pub mod asset;
pub mod flashcard;
pub mod note;
pub mod question;
pub mod unit;

pub use asset::{Asset, AssetDraft, AssetKind};
pub use flashcard::{Flashcard, FlashcardDraft};
pub use note::{NoteDraft, UserNote};
pub use question::{QuestionDraft, QuestionPool, TestQuestion};
pub use unit::{ContentUnit, UnitDraft, UnitKind};

/// A server record that can be mirrored into a local editing buffer.
pub trait Persisted {
    type Draft: Clone;

    fn id(&self) -> &str;
    fn to_draft(&self) -> Self::Draft;
}

/// Client-assigned starting content for a freshly added item.
pub trait Placeholder {
    fn placeholder() -> Self;
}
