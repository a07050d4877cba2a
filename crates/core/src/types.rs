//! Domain record types
//!
//! - `Workspace`: a named grouping of posts
//! - `Post`: a titled rich-text document belonging to one workspace
//! - `WorkspaceDraft` / `PostDraft`: caller-supplied fields for creation;
//!   the store generates the id and stamps both timestamps
//!
//! Serialized field names are camelCase to match the persisted schema
//! (`workspaceId`, `createdAt`, `updatedAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the distinguished workspace that always exists after first
/// initialization and is never deleted by the normal deletion flow.
pub const DEFAULT_WORKSPACE_ID: &str = "default";

/// Generate a fresh record id (UUID v4, immutable once assigned).
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current timestamp used for `created_at` / `updated_at` stamping.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A named grouping of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique stable identifier, generated at creation
    pub id: String,
    /// Display name, user-editable, no uniqueness constraint
    pub name: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Build the distinguished default workspace.
    pub fn default_workspace() -> Self {
        let ts = now();
        Workspace {
            id: DEFAULT_WORKSPACE_ID.to_string(),
            name: "Default Workspace".to_string(),
            description: Some("Your default workspace".to_string()),
            created_at: ts,
            updated_at: ts,
        }
    }

    /// True for the distinguished default workspace.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_WORKSPACE_ID
    }
}

/// Caller-supplied fields for workspace creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A titled rich-text document belonging to one workspace.
///
/// `content` is a serialized HTML fragment; it may be model-generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique stable identifier, generated at creation
    pub id: String,
    pub title: String,
    /// Serialized rich-text markup (HTML fragment)
    pub content: String,
    /// Foreign reference to exactly one workspace
    pub workspace_id: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Caller-supplied fields for post creation.
///
/// An empty `workspace_id` assigns the post to the default workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
