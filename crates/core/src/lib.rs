//! Core types for quill
//!
//! This crate defines the domain model shared by every other quill crate:
//! - Record types: `Workspace` and `Post`, plus their creation drafts
//! - Identifier and timestamp helpers
//! - The error taxonomy (`Error`, `Result`)

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    new_record_id, now, Post, PostDraft, Workspace, WorkspaceDraft, DEFAULT_WORKSPACE_ID,
};
