//! Code block routing
//!
//! Every code node, inline or block, maps to exactly one [`CodeRoute`].
//! Inline spans are always [`CodeRoute::Inline`]. For blocks, the language
//! tag is the leading run of word characters of the fence info string; the
//! configured diagram tag selects diagram rendering.

use std::sync::OnceLock;

use regex::Regex;

/// Where a code node is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeRoute {
    /// Inline code span; plain inline text
    Inline { source: String },
    /// Fenced or indented block without a language tag; verbatim
    Plain { source: String },
    /// Tagged block; syntax highlighted with line numbers
    Highlighted { language: String, source: String },
    /// Block tagged with the diagram tag
    Diagram { source: String },
}

impl CodeRoute {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            CodeRoute::Inline { .. } => "inline",
            CodeRoute::Plain { .. } => "plain",
            CodeRoute::Highlighted { .. } => "highlighted",
            CodeRoute::Diagram { .. } => "diagram",
        }
    }
}

fn language_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+").ok())
        .as_ref()
}

/// Language tag of a fence info string, if any.
pub fn language_tag(info: &str) -> Option<&str> {
    let info = info.trim_start();
    language_pattern()?.find(info).map(|m| m.as_str())
}

/// Drop the single newline that closes a fenced block's content.
fn strip_fence_newline(literal: &str) -> String {
    literal.strip_suffix('\n').unwrap_or(literal).to_string()
}

/// Route a code block by its info string.
pub fn route_block(info: &str, literal: &str, diagram_tag: &str) -> CodeRoute {
    match language_tag(info) {
        None => CodeRoute::Plain {
            source: literal.to_string(),
        },
        Some(tag) if tag == diagram_tag => CodeRoute::Diagram {
            source: strip_fence_newline(literal),
        },
        Some(tag) => CodeRoute::Highlighted {
            language: tag.to_string(),
            source: strip_fence_newline(literal),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
