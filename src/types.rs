//! Public types for the quill unified API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Domain records and drafts
pub use quill_core::{Post, PostDraft, Workspace, WorkspaceDraft, DEFAULT_WORKSPACE_ID};

// Error taxonomy
pub use quill_core::{Error, Result};

// Local store
pub use quill_store::{Context, Database, SeedSource, StoreConfig, SCHEMA_VERSION};

// AI gateway
pub use quill_gateway::{GatewayClient, GatewayConfig, QuickAction, BLOG_TOPICS};

// Entity stores
pub use quill_state::{
    AiState, AiStore, EditFlusher, PostState, PostStore, SubscriptionId, UiState, UiStore,
    WorkspaceState, WorkspaceStore,
};
