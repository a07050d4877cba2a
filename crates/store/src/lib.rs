//! Local Store for quill
//!
//! Durable, versioned storage of workspaces and posts:
//! - `database`: the embedded document store (two collections, one
//!   `by-workspace` secondary index, atomic write batches)
//! - `snapshot`: the on-disk snapshot format (framed, checksummed)
//! - `context`: process-wide handle owner with idempotent open / explicit close
//! - `seed`: the `SeedSource` capability used for one-time content seeding

pub mod context;
pub mod database;
pub mod seed;
pub mod snapshot;

pub use context::{Context, StoreConfig};
pub use database::Database;
pub use seed::SeedSource;
pub use snapshot::SCHEMA_VERSION;
