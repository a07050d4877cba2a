//! quill: embedded data layer for a local-first blog authoring tool
//!
//! Three layers, wired by the caller:
//! - the Local Store (`quill-store`): durable workspaces and posts with a
//!   `by-workspace` index, explicit open/close, one-time seeding
//! - the AI gateway (`quill-gateway`): a single-call client for a hosted
//!   text-generation endpoint, plus the editor's quick-action prompts
//! - the entity stores (`quill-state`): observable caches the presentation
//!   layer subscribes to
//!
//! # Example
//!
//! ```ignore
//! use quill::{Context, StoreConfig, GatewayClient, GatewayConfig};
//! use quill::{PostStore, WorkspaceStore};
//! use std::sync::Arc;
//!
//! let ctx = Context::new(StoreConfig::at("blog.qsnp"));
//! let db = ctx.open()?;
//!
//! let gateway = Arc::new(GatewayClient::new(GatewayConfig::from_env()));
//! db.initialize(gateway.as_ref())?;
//!
//! let workspaces = WorkspaceStore::new(Arc::clone(&db));
//! let posts = PostStore::new(Arc::clone(&db));
//! workspaces.fetch_all()?;
//! posts.fetch_all()?;
//! ```

pub mod types;

pub use types::*;
