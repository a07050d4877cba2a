//! AI gateway client for quill
//!
//! One blocking request/response round trip to a hosted text-generation
//! endpoint, plus the prompt builders layered on top of it:
//! - `client`: `GatewayClient` and its configuration
//! - `prompts`: quick-action templates, the default system instruction, and
//!   the seed-topic list
//!
//! No retry, no streaming; a single call per invocation.

pub mod client;
pub mod prompts;

pub use client::{GatewayClient, GatewayConfig};
pub use prompts::{QuickAction, BLOG_TOPICS};
