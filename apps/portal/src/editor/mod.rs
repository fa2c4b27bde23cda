//! Admin-side editing.
//!
//! Server collections are mirrored into a [`buffer::PositionalBuffer`],
//! edited field by field through a [`field::FieldEditor`] and submitted as
//! one bulk upsert by a [`collection::CollectionEditor`]. Units themselves
//! go through plain create/update/delete in [`unit::UnitEditor`].

#![allow(dead_code)]

pub mod buffer;
pub mod bulk;
pub mod collection;
pub mod field;
pub mod unit;
pub mod validation;
