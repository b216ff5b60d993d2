//! Slide markdown to an owned tree
//!
//! comrak parses into an arena that cannot outlive the call, so the result
//! is lowered into [`MarkdownNode`]s before returning. Lowering is pure and
//! deterministic. Documents nested deeper than [`MAX_NESTING_DEPTH`] are
//! rejected; the slide shows them as literal text instead.

use comrak::nodes::{
    AstNode, ListDelimType, ListType as ComrakListType, NodeList, NodeValue,
    TableAlignment as ComrakTableAlignment,
};
use comrak::{parse_document, Arena, Options};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Deepest container nesting accepted before the slide falls back to literal text
pub const MAX_NESTING_DEPTH: usize = 256;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Which markdown extensions are recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Pipe tables with alignment rows
    pub tables: bool,
    /// `~~struck~~` text
    pub strikethrough: bool,
    /// Bare URLs and emails become links
    pub autolink: bool,
    /// `- [ ]` and `- [x]` list items
    pub tasklist: bool,
    /// `^raised^` text
    pub superscript: bool,
    /// `[^ref]` references and their definitions
    pub footnotes: bool,
    /// Drop `javascript:`-style link and image targets at render time
    pub safe_urls: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            superscript: false,
            footnotes: true,
            safe_urls: true,
        }
    }
}

impl From<&MarkdownOptions> for Options {
    fn from(opts: &MarkdownOptions) -> Self {
        let mut options = Options::default();
        let ext = &mut options.extension;
        ext.table = opts.tables;
        ext.strikethrough = opts.strikethrough;
        ext.autolink = opts.autolink;
        ext.tasklist = opts.tasklist;
        ext.superscript = opts.superscript;
        ext.footnotes = opts.footnotes;
        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node payloads
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

impl From<u8> for HeadingLevel {
    /// Out-of-range levels clamp into 1..=6.
    fn from(level: u8) -> Self {
        const LEVELS: [HeadingLevel; 6] = [
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H4,
            HeadingLevel::H5,
            HeadingLevel::H6,
        ];
        LEVELS[usize::from(level.clamp(1, 6)) - 1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    /// `delimiter` is `.` or `)`
    Ordered { start: u32, delimiter: char },
}

impl From<&NodeList> for ListType {
    fn from(list: &NodeList) -> Self {
        match list.list_type {
            ComrakListType::Bullet => ListType::Bullet,
            ComrakListType::Ordered => ListType::Ordered {
                start: u32::try_from(list.start).unwrap_or(u32::MAX),
                delimiter: match list.delimiter {
                    ListDelimType::Period => '.',
                    ListDelimType::Paren => ')',
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree
// ─────────────────────────────────────────────────────────────────────────────

/// Node kinds kept from the comrak tree.
///
/// Container kinds carry no payload; their content is in the children.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    // blocks
    Document,
    BlockQuote,
    List { list_type: ListType, tight: bool },
    Item,
    TaskItem { checked: bool },
    Paragraph,
    Heading { level: HeadingLevel },
    ThematicBreak,
    Table { alignments: Vec<TableAlignment> },
    TableRow { header: bool },
    TableCell,
    HtmlBlock(String),
    FootnoteDefinition(String),
    /// `info` is the fence info string exactly as written, empty when untagged
    CodeBlock {
        info: String,
        literal: String,
        fenced: bool,
    },

    // inlines
    Text(String),
    Code(String),
    SoftBreak,
    LineBreak,
    HtmlInline(String),
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Link { url: String, title: String },
    Image { url: String, title: String },
    FootnoteReference(String),
}

impl MarkdownNodeType {
    fn lower(value: &NodeValue) -> Self {
        use MarkdownNodeType as K;
        match value {
            NodeValue::Document => K::Document,
            NodeValue::BlockQuote => K::BlockQuote,
            NodeValue::List(list) => K::List {
                list_type: ListType::from(list),
                tight: list.tight,
            },
            NodeValue::Item(_) => K::Item,
            NodeValue::TaskItem(mark) => K::TaskItem {
                checked: matches!(mark, Some('x' | 'X')),
            },
            NodeValue::Paragraph => K::Paragraph,
            NodeValue::Heading(heading) => K::Heading {
                level: heading.level.into(),
            },
            NodeValue::ThematicBreak => K::ThematicBreak,
            NodeValue::Table(table) => K::Table {
                alignments: table.alignments.iter().copied().map(Into::into).collect(),
            },
            NodeValue::TableRow(header) => K::TableRow { header: *header },
            NodeValue::TableCell => K::TableCell,
            NodeValue::HtmlBlock(block) => K::HtmlBlock(block.literal.clone()),
            NodeValue::FootnoteDefinition(def) => K::FootnoteDefinition(def.name.clone()),
            NodeValue::CodeBlock(block) => K::CodeBlock {
                info: block.info.clone(),
                literal: block.literal.clone(),
                fenced: block.fenced,
            },
            NodeValue::Text(text) => K::Text(text.clone()),
            NodeValue::Code(code) => K::Code(code.literal.clone()),
            NodeValue::SoftBreak => K::SoftBreak,
            NodeValue::LineBreak => K::LineBreak,
            NodeValue::HtmlInline(html) => K::HtmlInline(html.clone()),
            NodeValue::Emph => K::Emphasis,
            NodeValue::Strong => K::Strong,
            NodeValue::Strikethrough => K::Strikethrough,
            NodeValue::Superscript => K::Superscript,
            NodeValue::Link(link) => K::Link {
                url: link.url.clone(),
                title: link.title.clone(),
            },
            NodeValue::Image(image) => K::Image {
                url: image.url.clone(),
                title: image.title.clone(),
            },
            NodeValue::FootnoteReference(reference) => K::FootnoteReference(reference.name.clone()),
            // extensions that are never switched on
            _ => K::Text(String::new()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownNode {
    pub kind: MarkdownNodeType,
    /// Child nodes in source order
    pub children: Vec<MarkdownNode>,
    /// 1-based source line where the node starts
    pub start_line: usize,
    /// 1-based source line where the node ends, inclusive
    pub end_line: usize,
}

impl MarkdownNode {
    fn leaf(kind: MarkdownNodeType, start_line: usize, end_line: usize) -> Self {
        Self {
            kind,
            children: Vec::new(),
            start_line,
            end_line,
        }
    }

    /// Concatenated text of this subtree; soft breaks read as spaces.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.walk(&mut |node| match &node.kind {
            MarkdownNodeType::Text(s) | MarkdownNodeType::Code(s) => text.push_str(s),
            MarkdownNodeType::CodeBlock { literal, .. } => text.push_str(literal),
            MarkdownNodeType::SoftBreak => text.push(' '),
            MarkdownNodeType::LineBreak => text.push('\n'),
            _ => {}
        });
        text
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MarkdownNode)) {
        visit(self);
        self.children.iter().for_each(|child| child.walk(visit));
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    /// Always a `Document` node
    pub root: MarkdownNode,
}

impl MarkdownDocument {
    /// Wrap `markdown` unparsed in a single paragraph.
    pub fn literal(markdown: &str) -> Self {
        let last = markdown.lines().count().max(1);
        let text = MarkdownNode::leaf(MarkdownNodeType::Text(markdown.to_owned()), 1, last);
        let mut paragraph = MarkdownNode::leaf(MarkdownNodeType::Paragraph, 1, last);
        paragraph.children.push(text);
        let mut root = MarkdownNode::leaf(MarkdownNodeType::Document, 1, last);
        root.children.push(paragraph);
        Self { root }
    }

    /// Fenced and indented code blocks, in document order.
    pub fn code_blocks(&self) -> Vec<&MarkdownNode> {
        let mut found = Vec::new();
        self.root.walk(&mut |node| {
            if let MarkdownNodeType::CodeBlock { .. } = node.kind {
                found.push(node);
            }
        });
        found
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse with the default extension set.
///
/// ```
/// use slidemark::markdown::parse_markdown;
///
/// let doc = parse_markdown("# Hello\n\nWorld").unwrap();
/// assert_eq!(doc.root.children.len(), 2);
/// ```
pub fn parse_markdown(markdown: &str) -> Result<MarkdownDocument> {
    parse_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Parse with an explicit extension set.
///
/// Fails with [`Error::MarkdownParse`] when the tree nests deeper than
/// [`MAX_NESTING_DEPTH`].
pub fn parse_markdown_with_options(
    markdown: &str,
    options: &MarkdownOptions,
) -> Result<MarkdownDocument> {
    let arena = Arena::new();
    let ast = parse_document(&arena, markdown, &Options::from(options));
    Ok(MarkdownDocument {
        root: lower_tree(ast, 0)?,
    })
}

fn lower_tree<'a>(ast: &'a AstNode<'a>, depth: usize) -> Result<MarkdownNode> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::MarkdownParse(format!(
            "nesting deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }

    let mut node = {
        let data = ast.data.borrow();
        let pos = data.sourcepos;
        MarkdownNode::leaf(MarkdownNodeType::lower(&data.value), pos.start.line, pos.end.line)
    };
    node.children = ast
        .children()
        .map(|child| lower_tree(child, depth + 1))
        .collect::<Result<_>>()?;
    Ok(node)
}
