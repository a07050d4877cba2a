//! Prompt construction
//!
//! Fixed templates for the editor's quick actions, the default system
//! instruction, and the topic list used by the one-time seed step. All of
//! these produce plain strings; the client owns the network call.

use once_cell::sync::Lazy;
use quill_core::{Error, Result};

/// Default system instruction: semantic-HTML output, 150-word cap.
pub static DEFAULT_SYSTEM: Lazy<String> = Lazy::new(|| {
    [
        "You are an expert essay writer and content creator with extensive \
         experience in various topics.",
        "Always structure your response using proper semantic HTML. You can use \
         any valid HTML tags that best represent the content structure and \
         meaning, including headings (<h1> through <h6>), text content tags \
         (<p>, <pre>, <blockquote>), lists (<ul>, <ol>, <li>, <dl>, <dt>, <dd>), \
         text semantics (<strong>, <em>, <mark>, <cite>, <code>, <time>, <abbr>), \
         links and references (<a>, <sup>, <sub>), and code blocks (<code>, <pre>).",
        "You only need to return necessary tags and do not need to return a \
         complete HTML document. Word count should never exceed 150.",
    ]
    .join("\n")
});

/// Topics drawn from uniformly at random when seeding a fresh store.
pub const BLOG_TOPICS: [&str; 8] = [
    "The Future of Artificial Intelligence",
    "Blockchain Technology Trends",
    "Cybersecurity Best Practices",
    "Cloud Computing Evolution",
    "Machine Learning Applications",
    "DevOps Culture and Practices",
    "Sustainable Technology",
    "5G and IoT Revolution",
];

/// Prompt template for a seed post about `topic`.
pub fn seed_prompt(topic: &str) -> String {
    format!(
        "Write a comprehensive blog post about \"{topic}\". Include an \
         introduction, main points, and a conclusion. There should be no more \
         than 150 words"
    )
}

/// Editor quick actions, each a fixed prompt template.
///
/// `Expand` and `Improve` operate on the current selection and require it to
/// be non-empty; the others operate on the whole document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Outline,
    Expand,
    Improve,
    Summarize,
    Conclusion,
}

impl QuickAction {
    /// True when the action transforms a text selection rather than the
    /// whole document.
    pub fn requires_selection(&self) -> bool {
        matches!(self, QuickAction::Expand | QuickAction::Improve)
    }

    /// Build this action's prompt around `text` (the selection for
    /// selection-based actions, the document text otherwise).
    ///
    /// Selection-based actions reject empty text; `Outline` falls back to a
    /// generic topic instead.
    pub fn prompt(&self, text: &str) -> Result<String> {
        if self.requires_selection() && text.trim().is_empty() {
            return Err(Error::EmptyPrompt);
        }
        Ok(match self {
            QuickAction::Outline => {
                let topic = if text.trim().is_empty() {
                    "the current topic"
                } else {
                    text
                };
                format!("Generate an outline for a blog post about: {topic}")
            }
            QuickAction::Expand => format!("Expand on this text: {text}"),
            QuickAction::Improve => {
                format!("Improve this text and make it more engaging: {text}")
            }
            QuickAction::Summarize => {
                format!("Summarize this text into a concise paragraph: {text}")
            }
            QuickAction::Conclusion => {
                format!("Write a compelling conclusion for this blog post: {text}")
            }
        })
    }
}
