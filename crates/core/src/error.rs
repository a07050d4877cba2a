//! Error taxonomy for quill
//!
//! Four families, matching how failures surface to callers:
//! - Configuration: `MissingCredential` (fatal to the AI path only)
//! - Input: `EmptyPrompt`, `NotFound`, `WorkspaceNotFound`, `DefaultWorkspaceImmutable`
//! - Storage: `Storage`, `Io` (engine-level failures, whole batch aborted)
//! - Transport/provider: `Provider` (AI call failure, message best-effort)

use thiserror::Error;

/// Unified error type for all quill operations.
///
/// Every failure from the store, the entity stores, and the AI gateway is one
/// of these variants. Entity stores record `Display` output of the variant as
/// their error flag and re-raise the error itself.
#[derive(Debug, Error)]
pub enum Error {
    /// The AI provider credential is not configured.
    ///
    /// Distinct from `Provider` so callers can tell a deployment problem from
    /// a transient provider failure.
    #[error("AI provider API key is not configured")]
    MissingCredential,

    /// The caller supplied an empty prompt. Rejected before any network I/O.
    #[error("prompt is required")]
    EmptyPrompt,

    /// A record with the given id does not exist in the named collection.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Collection name ("workspace" or "post")
        entity: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// A post referenced a workspace id that does not resolve.
    ///
    /// Referential integrity is enforced at write time; see DESIGN.md.
    #[error("workspace not found: {id}")]
    WorkspaceNotFound { id: String },

    /// The default workspace cannot be deleted.
    #[error("the default workspace cannot be deleted")]
    DefaultWorkspaceImmutable,

    /// Storage-engine failure (corrupt snapshot, encode/decode error).
    ///
    /// Any write batch that hits this is aborted as a whole; no partial
    /// writes are observable.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O failure while reading or writing the snapshot file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport or model-provider failure during an AI call.
    ///
    /// The message is not guaranteed to be actionable. No retry is performed.
    #[error("failed to generate content: {0}")]
    Provider(String),
}

/// Result alias used across all quill crates.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors a caller caused (bad input), as opposed to
    /// environment/storage/provider failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyPrompt
                | Error::NotFound { .. }
                | Error::WorkspaceNotFound { .. }
                | Error::DefaultWorkspaceImmutable
        )
    }
}
