//! Seed-content capability
//!
//! The store seeds two posts on first-ever initialization. Content comes from
//! whoever can generate it (in production, the AI gateway), injected behind a
//! trait so the store has no HTTP dependency.

use quill_core::Result;

/// Source of generated seed content.
///
/// Injected into `Database::initialize` by the caller. Implemented by the AI
/// gateway client in production and by deterministic fakes in tests.
pub trait SeedSource: Send + Sync {
    /// Produce one `(title, content)` pair for a seed post.
    ///
    /// `content` is an HTML fragment. Failures are tolerated by the store:
    /// seeding is best-effort and never blocks initialization.
    fn generate_seed_post(&self) -> Result<(String, String)>;
}
