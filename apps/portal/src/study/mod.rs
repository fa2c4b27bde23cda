// Student-facing view-models: content viewer, test scoring, audio transport
// and personal notes. Rendering lives elsewhere; these types hold the state.

#![allow(dead_code)]

pub mod audio;
pub mod notes;
pub mod scoring;
pub mod viewer;
