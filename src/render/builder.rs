//! Render tree construction
//!
//! Walks a parsed document and produces the render tree, sending each code
//! node through [`dispatch::route_block`]. Highlighting happens inline; diagram
//! blocks are handed to the caller, which owns their lifecycle and returns
//! a view to place in the tree.

use log::debug;

use super::dispatch::{self, CodeRoute};
use super::tree::{RenderKind, RenderNode};
use crate::config::Settings;
use crate::diagram::DiagramView;
use crate::markdown::{highlight_code, MarkdownDocument, MarkdownNode, MarkdownNodeType};

/// Per-pass settings for tree construction.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub diagram_tag: &'a str,
    pub syntax_theme: &'a str,
    pub dark_mode: bool,
}

impl<'a> RenderOptions<'a> {
    pub fn from_settings(settings: &'a Settings) -> Self {
        Self {
            diagram_tag: &settings.diagram_tag,
            syntax_theme: &settings.syntax_theme,
            dark_mode: settings.theme.is_dark(),
        }
    }
}

/// Counts of what one render pass dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub inline_spans: usize,
    pub plain_blocks: usize,
    pub highlight_calls: usize,
    pub diagram_blocks: usize,
}

/// Build the render tree for `document`.
///
/// `mount_diagram` is called once per diagram block, in document order.
pub fn build_render_tree(
    document: &MarkdownDocument,
    options: &RenderOptions<'_>,
    mount_diagram: &mut dyn FnMut(&str) -> DiagramView,
) -> (RenderNode, RenderStats) {
    let mut builder = TreeBuilder {
        options,
        mount_diagram,
        stats: RenderStats::default(),
    };
    let tree = builder.build(&document.root);
    debug!("Render pass: {:?}", builder.stats);
    (tree, builder.stats)
}

struct TreeBuilder<'o, 'm> {
    options: &'o RenderOptions<'o>,
    mount_diagram: &'m mut dyn FnMut(&str) -> DiagramView,
    stats: RenderStats,
}

impl TreeBuilder<'_, '_> {
    fn build(&mut self, node: &MarkdownNode) -> RenderNode {
        let kind = match &node.kind {
            MarkdownNodeType::Code(source) => {
                let route = CodeRoute::Inline {
                    source: source.clone(),
                };
                return RenderNode::new(self.render_code(route));
            }
            MarkdownNodeType::CodeBlock { info, literal, .. } => {
                let route = dispatch::route_block(info, literal, self.options.diagram_tag);
                return RenderNode::new(self.render_code(route));
            }
            MarkdownNodeType::Document => RenderKind::Document,
            MarkdownNodeType::BlockQuote => RenderKind::BlockQuote,
            MarkdownNodeType::List { list_type, .. } => RenderKind::List(*list_type),
            MarkdownNodeType::Item => RenderKind::ListItem { checked: None },
            MarkdownNodeType::TaskItem { checked } => RenderKind::ListItem {
                checked: Some(*checked),
            },
            MarkdownNodeType::HtmlBlock(html) | MarkdownNodeType::HtmlInline(html) => {
                RenderKind::Html(html.clone())
            }
            MarkdownNodeType::Paragraph => RenderKind::Paragraph,
            MarkdownNodeType::Heading { level } => RenderKind::Heading(*level),
            MarkdownNodeType::ThematicBreak => RenderKind::ThematicBreak,
            MarkdownNodeType::Table { alignments } => RenderKind::Table {
                alignments: alignments.clone(),
            },
            MarkdownNodeType::TableRow { header } => RenderKind::TableRow { header: *header },
            MarkdownNodeType::TableCell => RenderKind::TableCell,
            MarkdownNodeType::Text(text) => RenderKind::Text(text.clone()),
            MarkdownNodeType::SoftBreak => RenderKind::SoftBreak,
            MarkdownNodeType::LineBreak => RenderKind::LineBreak,
            MarkdownNodeType::Emphasis => RenderKind::Emphasis,
            MarkdownNodeType::Strong => RenderKind::Strong,
            MarkdownNodeType::Strikethrough => RenderKind::Strikethrough,
            MarkdownNodeType::Superscript => RenderKind::Superscript,
            MarkdownNodeType::Link { url, title } => RenderKind::Link {
                url: url.clone(),
                title: title.clone(),
            },
            MarkdownNodeType::Image { url, title } => RenderKind::Image {
                url: url.clone(),
                title: title.clone(),
            },
            MarkdownNodeType::FootnoteReference(name) => {
                RenderKind::FootnoteReference(name.clone())
            }
            MarkdownNodeType::FootnoteDefinition(name) => {
                RenderKind::FootnoteDefinition(name.clone())
            }
        };

        let children = node.children.iter().map(|child| self.build(child)).collect();
        RenderNode::with_children(kind, children)
    }

    fn render_code(&mut self, route: CodeRoute) -> RenderKind {
        debug!("Routing code node as {}", route.label());
        match route {
            CodeRoute::Inline { source } => {
                self.stats.inline_spans += 1;
                RenderKind::InlineCode(source)
            }
            CodeRoute::Plain { source } => {
                self.stats.plain_blocks += 1;
                RenderKind::PlainCode { source }
            }
            CodeRoute::Highlighted { language, source } => {
                self.stats.highlight_calls += 1;
                RenderKind::HighlightedCode(highlight_code(
                    &source,
                    &language,
                    self.options.syntax_theme,
                    self.options.dark_mode,
                ))
            }
            CodeRoute::Diagram { source } => {
                self.stats.diagram_blocks += 1;
                RenderKind::Diagram((self.mount_diagram)(&source))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
