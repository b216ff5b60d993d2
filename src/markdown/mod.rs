//! Markdown parsing and code highlighting
//!
//! This module provides markdown parsing using the comrak library, a
//! CommonMark + GFM compatible parser, and syntax highlighting for code
//! blocks using syntect.
//!
//! # Features
//! - Parse markdown text to an owned AST
//! - GitHub Flavored Markdown (tables, strikethrough, autolinks, task lists)
//! - Line-numbered syntax highlighting with plain-text fallback
//!
//! # Example
//! ```
//! use slidemark::markdown::{parse_markdown, highlight_code};
//!
//! let doc = parse_markdown("# Hello\n\nThis is **bold** text.").unwrap();
//! assert_eq!(doc.root.children.len(), 2);
//!
//! let highlighted = highlight_code("fn main() {}", "rust", "base16-ocean.dark", true);
//! assert!(highlighted.is_styled());
//! ```

mod parser;
pub mod syntax;

pub use parser::{
    parse_markdown, parse_markdown_with_options, HeadingLevel, ListType, MarkdownDocument,
    MarkdownNode, MarkdownNodeType, MarkdownOptions, TableAlignment, MAX_NESTING_DEPTH,
};
pub use syntax::{highlight_code, HighlightedCode, HighlightedLine, HighlightedSegment, Rgba};
