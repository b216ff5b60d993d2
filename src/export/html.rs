//! HTML Export Generation
//!
//! This module turns render trees into HTML: one fragment per slide, and a
//! standalone deck document with inlined CSS for viewing without any other
//! assets.


use crate::config::{Settings, Theme};
use crate::diagram::{DiagramStatus, DiagramView};
use crate::markdown::{HighlightedCode, HighlightedSegment, ListType, TableAlignment};
use crate::render::{RenderKind, RenderNode};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options for fragment rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentOptions {
    /// Mark highlighted blocks for the line-number gutter
    pub show_line_numbers: bool,
    /// Drop `javascript:`, `vbscript:` and non-image `data:` URLs
    pub safe_urls: bool,
}

impl Default for FragmentOptions {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            safe_urls: true,
        }
    }
}

impl FragmentOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_line_numbers: settings.show_line_numbers,
            safe_urls: settings.markdown.safe_urls,
        }
    }
}

/// Document-level metadata for the deck page.
#[derive(Debug, Clone, Copy)]
pub struct DeckPage<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub theme: Theme,
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Render one slide's tree as an HTML fragment.
///
/// Diagrams are emitted according to their status at call time, so settle
/// the slide first to capture finished graphics.
pub fn render_slide_fragment(tree: &RenderNode, options: &FragmentOptions) -> String {
    let mut writer = HtmlWriter {
        out: String::new(),
        options,
        alignments: Vec::new(),
        header_row: false,
        cell_index: 0,
    };
    writer.node(tree);
    writer.out
}

/// Lay out a title slide: the rendered heading fragment, then the
/// presenter and date lines under their own classes.
pub fn render_title_slide(fragment: &str, presenter: Option<&str>, date: Option<&str>) -> String {
    let mut html = String::from("<div class=\"title-slide\">\n");
    html.push_str(fragment);
    for (class, value) in [("presenter", presenter), ("date", date)] {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            html.push_str(&format!("<p class=\"{}\">{}</p>\n", class, html_escape(value)));
        }
    }
    html.push_str("</div>\n");
    html
}

/// Generate a complete HTML document from rendered slide fragments.
///
/// Each fragment is wrapped in its own `<section class="slide">`.
pub fn generate_deck_document(page: &DeckPage<'_>, fragments: &[String]) -> String {
    let mut slides = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        slides.push_str(&format!(
            "<section class=\"slide\" id=\"slide-{}\">\n{}</section>\n",
            index + 1,
            fragment
        ));
    }

    let description = page
        .description
        .map(|text| {
            format!(
                "\n    <meta name=\"description\" content=\"{}\">",
                html_escape(text)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="slidemark">{description}
    <title>{title}</title>
    <style>
{base_css}

{theme_css}
    </style>
</head>
<body>
<main class="deck">
{slides}</main>
</body>
</html>"#,
        description = description,
        title = html_escape(page.title),
        base_css = BASE_CSS,
        theme_css = generate_theme_css(page.theme),
        slides = slides,
    )
}

struct HtmlWriter<'o> {
    out: String,
    options: &'o FragmentOptions,
    alignments: Vec<TableAlignment>,
    header_row: bool,
    cell_index: usize,
}

impl HtmlWriter<'_> {
    fn node(&mut self, node: &RenderNode) {
        match &node.kind {
            RenderKind::Document => self.children(node),
            RenderKind::Heading(level) => {
                let level = *level as u8;
                self.out.push_str(&format!("<h{}>", level));
                self.children(node);
                self.out.push_str(&format!("</h{}>\n", level));
            }
            RenderKind::Paragraph => self.wrap(node, "<p>", "</p>\n"),
            RenderKind::BlockQuote => self.wrap(node, "<blockquote>\n", "</blockquote>\n"),
            RenderKind::List(ListType::Bullet) => {
                let is_task_list = node
                    .children
                    .iter()
                    .any(|child| matches!(child.kind, RenderKind::ListItem { checked: Some(_) }));
                if is_task_list {
                    self.wrap(node, "<ul class=\"contains-task-list\">\n", "</ul>\n")
                } else {
                    self.wrap(node, "<ul>\n", "</ul>\n")
                }
            }
            RenderKind::List(ListType::Ordered { start, .. }) => {
                if *start == 1 {
                    self.out.push_str("<ol>\n");
                } else {
                    self.out.push_str(&format!("<ol start=\"{}\">\n", start));
                }
                self.children(node);
                self.out.push_str("</ol>\n");
            }
            RenderKind::ListItem { checked: None } => self.wrap(node, "<li>", "</li>\n"),
            RenderKind::ListItem {
                checked: Some(checked),
            } => {
                self.out.push_str(&format!(
                    "<li class=\"task-list-item\"><input type=\"checkbox\" disabled{}> ",
                    if *checked { " checked" } else { "" }
                ));
                self.children(node);
                self.out.push_str("</li>\n");
            }
            RenderKind::Table { alignments } => {
                let saved = std::mem::replace(&mut self.alignments, alignments.clone());
                self.wrap(node, "<table>\n", "</table>\n");
                self.alignments = saved;
            }
            RenderKind::TableRow { header } => {
                self.header_row = *header;
                self.cell_index = 0;
                self.wrap(node, "<tr>\n", "</tr>\n");
            }
            RenderKind::TableCell => {
                let tag = if self.header_row { "th" } else { "td" };
                match self.alignments.get(self.cell_index).and_then(alignment_css) {
                    Some(align) => {
                        self.out.push_str(&format!("<{} style=\"text-align: {}\">", tag, align));
                    }
                    None => {
                        self.out.push_str(&format!("<{}>", tag));
                    }
                }
                self.cell_index += 1;
                self.children(node);
                self.out.push_str(&format!("</{}>\n", tag));
            }
            RenderKind::ThematicBreak => self.out.push_str("<hr>\n"),
            RenderKind::Text(text) => self.out.push_str(&html_escape(text)),
            RenderKind::Emphasis => self.wrap(node, "<em>", "</em>"),
            RenderKind::Strong => self.wrap(node, "<strong>", "</strong>"),
            RenderKind::Strikethrough => self.wrap(node, "<del>", "</del>"),
            RenderKind::Superscript => self.wrap(node, "<sup>", "</sup>"),
            RenderKind::Link { url, title } => {
                if self.options.safe_urls && !is_safe_url(url, false) {
                    self.children(node);
                    return;
                }
                self.out.push_str(&format!("<a href=\"{}\"", html_escape(url)));
                if !title.is_empty() {
                    self.out.push_str(&format!(" title=\"{}\"", html_escape(title)));
                }
                self.out.push('>');
                self.children(node);
                self.out.push_str("</a>");
            }
            RenderKind::Image { url, title } => {
                if self.options.safe_urls && !is_safe_url(url, true) {
                    return;
                }
                self.out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"",
                    html_escape(url),
                    html_escape(&node.text_content())
                ));
                if !title.is_empty() {
                    self.out.push_str(&format!(" title=\"{}\"", html_escape(title)));
                }
                self.out.push('>');
            }
            RenderKind::InlineCode(code) => {
                self.out.push_str(&format!("<code>{}</code>", html_escape(code)));
            }
            RenderKind::SoftBreak => self.out.push('\n'),
            RenderKind::LineBreak => self.out.push_str("<br>\n"),
            RenderKind::Html(raw) => self.out.push_str(&html_escape(raw)),
            RenderKind::FootnoteReference(name) => {
                let name = html_escape(name);
                self.out.push_str(&format!(
                    "<sup class=\"footnote-ref\"><a href=\"#fn-{0}\">{0}</a></sup>",
                    name
                ));
            }
            RenderKind::FootnoteDefinition(name) => {
                self.out.push_str(&format!(
                    "<div class=\"footnote\" id=\"fn-{}\">\n",
                    html_escape(name)
                ));
                self.children(node);
                self.out.push_str("</div>\n");
            }
            RenderKind::PlainCode { source } => {
                self.out.push_str(&format!("<pre><code>{}</code></pre>\n", html_escape(source)));
            }
            RenderKind::HighlightedCode(code) => self.highlighted(code),
            RenderKind::Diagram(view) => self.diagram(view),
        }
    }

    fn children(&mut self, node: &RenderNode) {
        for child in &node.children {
            self.node(child);
        }
    }

    fn wrap(&mut self, node: &RenderNode, open: &str, close: &str) {
        self.out.push_str(open);
        self.children(node);
        self.out.push_str(close);
    }

    /// Lines are separated by bare newlines so the element's text equals
    /// the source; numbers come from CSS counters.
    fn highlighted(&mut self, code: &HighlightedCode) {
        let mut classes = String::from("highlighted");
        if self.options.show_line_numbers {
            classes.push_str(" line-numbers");
        }
        if !code.is_styled() {
            classes.push_str(" plain");
        }
        self.out.push_str(&format!("<pre class=\"{}\"", classes));
        if let Some(background) = code.background {
            self.out.push_str(&format!(" style=\"background-color: {}\"", background.to_css()));
        }
        self.out.push_str(&format!(
            "><code class=\"language-{}\" style=\"color: {}\">",
            html_escape(&code.language),
            code.foreground.to_css()
        ));

        for (index, line) in code.lines.iter().enumerate() {
            if index > 0 {
                self.out.push('\n');
            }
            self.out.push_str(&format!("<span class=\"line\" data-line=\"{}\">", line.number));
            for segment in &line.segments {
                self.segment(segment, code.is_styled());
            }
            self.out.push_str("</span>");
        }
        self.out.push_str("</code></pre>\n");
    }

    fn segment(&mut self, segment: &HighlightedSegment, styled: bool) {
        if !styled {
            self.out.push_str(&html_escape(&segment.text));
            return;
        }
        let mut style = format!("color: {}", segment.foreground.to_css());
        if segment.bold {
            style.push_str("; font-weight: bold");
        }
        if segment.italic {
            style.push_str("; font-style: italic");
        }
        if segment.underline {
            style.push_str("; text-decoration: underline");
        }
        self.out.push_str(&format!(
            "<span style=\"{}\">{}</span>",
            style,
            html_escape(&segment.text)
        ));
    }

    fn diagram(&mut self, view: &DiagramView) {
        let id = view.id();
        let graphic = match view.status() {
            DiagramStatus::Rendered => view.graphic(),
            DiagramStatus::Pending => {
                self.out.push_str(&format!(
                    "<div class=\"diagram diagram-pending\" id=\"{}\"></div>\n",
                    id
                ));
                return;
            }
            DiagramStatus::Failed => None,
        };

        match graphic {
            Some(graphic) => {
                self.out.push_str(&format!(
                    "<figure class=\"diagram\" id=\"{}\">\n{}\n</figure>\n",
                    id,
                    graphic.svg()
                ));
            }
            None => {
                self.out.push_str(&format!(
                    "<div class=\"diagram diagram-failed\" id=\"{}\" aria-hidden=\"true\"></div>\n",
                    id
                ));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for slide rendering (layout, typography).
const BASE_CSS: &str = r#"
/* Reset and base styles */
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 20px;
    line-height: 1.6;
}

/* Slides */
.deck {
    display: flex;
    flex-direction: column;
    gap: 48px;
    padding: 48px 24px;
}

.slide {
    max-width: 1100px;
    min-height: 600px;
    width: 100%;
    margin: 0 auto;
    padding: 48px 64px;
    border-radius: 8px;
}

/* Headings */
.slide h1,
.slide h2,
.slide h3,
.slide h4,
.slide h5,
.slide h6 {
    margin-top: 0;
    margin-bottom: 24px;
    font-weight: 600;
    line-height: 1.25;
}

.slide h1 { font-size: 2.2em; }
.slide h2 { font-size: 1.6em; }
.slide h3 { font-size: 1.25em; }
.slide h4 { font-size: 1em; }
.slide h5 { font-size: 0.875em; }
.slide h6 { font-size: 0.85em; }

/* Title slide */
.slide .title-slide {
    display: flex;
    flex-direction: column;
    justify-content: center;
    min-height: 500px;
    text-align: center;
}

.slide .title-slide .presenter {
    margin-top: 32px;
    font-size: 1.2em;
    font-weight: 600;
}

.slide .title-slide .date {
    opacity: 0.7;
}

/* Paragraphs */
.slide p {
    margin-top: 0;
    margin-bottom: 16px;
}

/* Links */
.slide a {
    text-decoration: none;
}

.slide a:hover {
    text-decoration: underline;
}

/* Lists */
.slide ul,
.slide ol {
    margin-top: 0;
    margin-bottom: 16px;
    padding-left: 2em;
}

.slide li + li {
    margin-top: 4px;
}

/* Task lists */
.slide ul.contains-task-list {
    list-style-type: none;
    padding-left: 0;
}

.slide .task-list-item input[type="checkbox"] {
    margin-right: 0.5em;
}

/* Blockquotes */
.slide blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    border-left: 4px solid;
}

/* Code */
.slide code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    font-size: 0.85em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
}

.slide pre {
    margin-top: 0;
    margin-bottom: 16px;
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    line-height: 1.45;
}

.slide pre code {
    padding: 0;
    background: transparent;
    border-radius: 0;
}

/* Line numbers */
.slide pre.line-numbers code {
    counter-reset: line;
}

.slide pre.line-numbers .line::before {
    counter-increment: line;
    content: counter(line);
    display: inline-block;
    width: 2.5em;
    margin-right: 1em;
    text-align: right;
    opacity: 0.5;
    user-select: none;
}

/* Diagrams */
.slide .diagram {
    margin: 0 0 16px 0;
    text-align: center;
}

.slide .diagram svg {
    max-width: 100%;
    height: auto;
}

.slide .diagram-pending {
    min-height: 120px;
    border: 1px dashed;
    border-radius: 6px;
    opacity: 0.4;
}

.slide .diagram-failed {
    display: none;
}

/* Tables */
.slide table {
    border-collapse: collapse;
    width: 100%;
    margin-bottom: 16px;
}

.slide th,
.slide td {
    padding: 8px 12px;
    border: 1px solid;
}

.slide th {
    font-weight: 600;
    text-align: left;
}

/* Horizontal rule */
.slide hr {
    height: 2px;
    margin: 24px 0;
    border: none;
}

/* Images */
.slide img {
    max-width: 100%;
    height: auto;
    border-radius: 4px;
}

/* Strikethrough */
.slide del {
    text-decoration: line-through;
}
"#;

struct ThemePalette {
    page: &'static str,
    slide: &'static str,
    text: &'static str,
    heading: &'static str,
    link: &'static str,
    border: &'static str,
    code_bg: &'static str,
}

const LIGHT_PALETTE: ThemePalette = ThemePalette {
    page: "#e5e7eb",
    slide: "#ffffff",
    text: "#1f2937",
    heading: "#111827",
    link: "#2563eb",
    border: "#d1d5db",
    code_bg: "#f3f4f6",
};

const DARK_PALETTE: ThemePalette = ThemePalette {
    page: "#020617",
    slide: "#0f172a",
    text: "#e2e8f0",
    heading: "#f8fafc",
    link: "#7dd3fc",
    border: "#334155",
    code_bg: "#1e293b",
};

/// Generate theme-specific CSS.
fn generate_theme_css(theme: Theme) -> String {
    let colors = if theme.is_dark() {
        &DARK_PALETTE
    } else {
        &LIGHT_PALETTE
    };

    format!(
        r#"
/* Theme colors */
:root {{
    color-scheme: {color_scheme};
}}

body {{
    background-color: {page};
    color: {text};
}}

.slide {{
    background-color: {slide};
    border: 1px solid {border};
}}

.slide h1, .slide h2, .slide h3, .slide h4, .slide h5, .slide h6 {{
    color: {heading};
}}

.slide a {{
    color: {link};
}}

.slide blockquote {{
    border-left-color: {border};
}}

.slide code, .slide pre {{
    background-color: {code_bg};
}}

.slide th, .slide td {{
    border-color: {border};
}}

.slide hr {{
    background-color: {border};
}}
"#,
        color_scheme = if theme.is_dark() { "dark" } else { "light" },
        page = colors.page,
        slide = colors.slide,
        text = colors.text,
        heading = colors.heading,
        link = colors.link,
        border = colors.border,
        code_bg = colors.code_bg,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility Functions
// ─────────────────────────────────────────────────────────────────────────────

fn alignment_css(alignment: &TableAlignment) -> Option<&'static str> {
    match alignment {
        TableAlignment::None => None,
        TableAlignment::Left => Some("left"),
        TableAlignment::Center => Some("center"),
        TableAlignment::Right => Some("right"),
    }
}

/// Whether a link or image URL may be emitted.
fn is_safe_url(url: &str, image: bool) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("vbscript:") {
        return false;
    }
    if lower.starts_with("data:") {
        return image && lower.starts_with("data:image/") && !lower.starts_with("data:image/svg");
    }
    true
}

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{highlight_code, parse_markdown, HeadingLevel};
    use crate::render::{build_render_tree, RenderOptions};

    fn fragment(markdown: &str) -> String {
        let settings = Settings::default();
        let document = parse_markdown(markdown).unwrap();
        let (tree, _) = build_render_tree(
            &document,
            &RenderOptions::from_settings(&settings),
            &mut |_| panic!("no diagram expected"),
        );
        render_slide_fragment(&tree, &FragmentOptions::default())
    }

    /// Strip tags and unescape, approximating the browser's text content.
    fn visible_text(html: &str) -> String {
        let mut text = String::new();
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                c if !in_tag => text.push(c),
                _ => {}
            }
        }
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_basic_blocks() {
        let html = fragment("# Hello\n\nSome **bold** and *italic* and ~~gone~~.\n\n---\n");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<hr>"));
    }

    #[test]
    fn test_inline_code_is_escaped() {
        let html = fragment("Use `a<b>` here");
        assert!(html.contains("<code>a&lt;b&gt;</code>"));
    }

    #[test]
    fn test_table_alignment_and_header() {
        let html = fragment("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        assert!(html.contains("<th style=\"text-align: left\">a</th>"));
        assert!(html.contains("<td style=\"text-align: right\">2</td>"));
    }

    #[test]
    fn test_task_list() {
        let html = fragment("- [x] done\n- [ ] todo\n");
        assert!(html.contains("contains-task-list"));
        assert!(html.contains("disabled checked>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = fragment("<script>alert(1)</script>\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unsafe_link_dropped() {
        let html = fragment("[click](javascript:alert(1)) and [ok](https://example.com)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));
        assert!(html.contains("<a href=\"https://example.com\">ok</a>"));
    }

    #[test]
    fn test_highlighted_block_text_equals_source() {
        let source = "fn main() {\n    let a = 1 < 2;\n\n\tprintln!(\"{}\", a);\n}";
        let html = fragment(&format!("```rust\n{}\n```\n", source));
        assert!(html.contains("line-numbers"));
        assert!(html.contains("data-line=\"5\""));
        assert_eq!(visible_text(&html).trim_end_matches('\n'), source);
    }

    #[test]
    fn test_line_numbers_can_be_disabled() {
        let code = highlight_code("x = 1", "python", "base16-ocean.dark", true);
        let tree = RenderNode::new(RenderKind::HighlightedCode(code));
        let html = render_slide_fragment(
            &tree,
            &FragmentOptions {
                show_line_numbers: false,
                safe_urls: true,
            },
        );
        assert!(!html.contains("line-numbers"));
    }

    #[test]
    fn test_plain_block_is_verbatim() {
        let html = fragment("```\n  a < b\n```\n");
        assert!(html.contains("<pre><code>  a &lt; b\n</code></pre>"));
    }

    #[test]
    fn test_generate_deck_document() {
        let heading = RenderNode::with_children(
            RenderKind::Heading(HeadingLevel::H1),
            vec![RenderNode::new(RenderKind::Text("Intro".to_string()))],
        );
        let fragment = render_slide_fragment(&heading, &FragmentOptions::default());
        let html = generate_deck_document(
            &DeckPage {
                title: "Orleans & Grains",
                description: Some("A tour"),
                theme: Theme::Light,
            },
            &[fragment.clone(), fragment],
        );

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>Orleans &amp; Grains</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"A tour\">"));
        assert!(html.contains("color-scheme: light"));
        assert!(html.contains("id=\"slide-2\""));
        assert_eq!(html.matches("<section class=\"slide\"").count(), 2);
    }

    #[test]
    fn test_title_slide_layout() {
        let html = render_title_slide(
            "<h1>Virtual Actors</h1>\n",
            Some("Webinar <Maker>"),
            Some(" "),
        );
        assert!(html.starts_with("<div class=\"title-slide\">\n<h1>Virtual Actors</h1>"));
        assert!(html.contains("<p class=\"presenter\">Webinar &lt;Maker&gt;</p>"));
        assert!(!html.contains("class=\"date\""));
        assert!(html.ends_with("</div>\n"));
    }

    #[test]
    fn test_is_safe_url() {
        assert!(is_safe_url("https://example.com", false));
        assert!(is_safe_url("#section", false));
        assert!(!is_safe_url(" JavaScript:alert(1)", false));
        assert!(!is_safe_url("data:text/html,x", false));
        assert!(is_safe_url("data:image/png;base64,AAAA", true));
        assert!(!is_safe_url("data:image/png;base64,AAAA", false));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello"), "Hello");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_theme_css() {
        assert!(generate_theme_css(Theme::Light).contains("color-scheme: light"));
        assert!(generate_theme_css(Theme::Dark).contains("color-scheme: dark"));
    }
}
