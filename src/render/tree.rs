//! Render tree
//!
//! The output of one slide render pass: an owned tree of display nodes with
//! code already dispatched. Diagram nodes hold a read-only view that
//! reflects their conversion as it settles.

use crate::diagram::DiagramView;
use crate::markdown::{HeadingLevel, HighlightedCode, ListType, TableAlignment};

/// Kind of a render node.
#[derive(Debug, Clone)]
pub enum RenderKind {
    Document,
    Heading(HeadingLevel),
    Paragraph,
    BlockQuote,
    List(ListType),
    /// `checked` is `Some` for task list items
    ListItem { checked: Option<bool> },
    Table { alignments: Vec<TableAlignment> },
    TableRow { header: bool },
    TableCell,
    ThematicBreak,
    Text(String),
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Link { url: String, title: String },
    Image { url: String, title: String },
    /// Inline code span, shown as plain text
    InlineCode(String),
    SoftBreak,
    LineBreak,
    /// Raw HTML from the source; exported escaped
    Html(String),
    FootnoteReference(String),
    FootnoteDefinition(String),
    /// Untagged code block, verbatim
    PlainCode { source: String },
    HighlightedCode(HighlightedCode),
    Diagram(DiagramView),
}

/// A node in the render tree.
#[derive(Debug, Clone)]
pub struct RenderNode {
    pub kind: RenderKind,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(kind: RenderKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: RenderKind, children: Vec<RenderNode>) -> Self {
        Self { kind, children }
    }

    /// Displayed text of this node and its descendants. Code blocks
    /// contribute exactly their source.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.kind {
            RenderKind::Text(t) | RenderKind::InlineCode(t) | RenderKind::Html(t) => {
                output.push_str(t)
            }
            RenderKind::PlainCode { source } => output.push_str(source),
            RenderKind::HighlightedCode(code) => output.push_str(&code.text_content()),
            RenderKind::Diagram(view) => output.push_str(&view.source()),
            RenderKind::SoftBreak => output.push(' '),
            RenderKind::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }

    /// Visit this node and every descendant in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Views of every diagram in document order.
    pub fn diagrams(&self) -> Vec<DiagramView> {
        let mut views = Vec::new();
        self.walk(&mut |node| {
            if let RenderKind::Diagram(view) = &node.kind {
                views.push(view.clone());
            }
        });
        views
    }

    /// Highlighted code blocks in document order.
    pub fn highlighted_blocks(&self) -> Vec<&HighlightedCode> {
        let mut blocks = Vec::new();
        self.walk(&mut |node| {
            if let RenderKind::HighlightedCode(code) = &node.kind {
                blocks.push(code);
            }
        });
        blocks
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_joins_inline_text() {
        let paragraph = RenderNode::with_children(
            RenderKind::Paragraph,
            vec![
                RenderNode::new(RenderKind::Text("Call ".to_string())),
                RenderNode::new(RenderKind::InlineCode("x++".to_string())),
                RenderNode::new(RenderKind::SoftBreak),
                RenderNode::with_children(
                    RenderKind::Strong,
                    vec![RenderNode::new(RenderKind::Text("now".to_string()))],
                ),
            ],
        );
        assert_eq!(paragraph.text_content(), "Call x++ now");
    }

    #[test]
    fn test_plain_code_is_verbatim() {
        let node = RenderNode::new(RenderKind::PlainCode {
            source: "  keep\n\tthis\n".to_string(),
        });
        assert_eq!(node.text_content(), "  keep\n\tthis\n");
    }

    #[test]
    fn test_no_diagrams_in_plain_tree() {
        let node = RenderNode::new(RenderKind::Paragraph);
        assert!(node.diagrams().is_empty());
        assert!(node.highlighted_blocks().is_empty());
    }
}
