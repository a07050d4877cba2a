//! Entity stores for quill
//!
//! Observable in-memory caches between the presentation layer and the local
//! store. Every mutating operation follows the same contract: raise the
//! loading flag and clear the previous error, perform the store call, merge
//! the cache on success (append / replace-by-id / remove-by-id), record the
//! error message on failure, and in both cases notify subscribers and
//! return the result to the caller.
//!
//! The stores never coordinate transactionally with each other; a workspace
//! deletion's post reassignment becomes visible to `PostStore` only on the
//! next explicit fetch.

pub mod ai;
pub mod flusher;
pub mod post;
pub mod subscription;
pub mod ui;
pub mod workspace;

pub use ai::{AiState, AiStore};
pub use flusher::EditFlusher;
pub use post::{PostState, PostStore};
pub use subscription::{Subscribers, SubscriptionId};
pub use ui::{UiState, UiStore};
pub use workspace::{WorkspaceState, WorkspaceStore};
