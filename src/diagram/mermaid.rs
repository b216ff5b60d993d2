//! Built-in Mermaid engine
//!
//! Wraps `mermaid-rs-renderer`. The library call runs behind
//! `catch_unwind`, so a panic inside it fails one diagram instead of the
//! slide. Every element id in the returned SVG is prefixed with the
//! diagram's identity, which keeps ids unique when a deck shows the same
//! diagram more than once.

use std::any::Any;
use std::cell::OnceCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use async_trait::async_trait;
use log::debug;
use mermaid_rs_renderer::{LayoutConfig, RenderOptions, Theme};
use regex::{Captures, Regex};

use super::engine::{DiagramEngine, DiagramError, RenderedGraphic};
use super::instance::DiagramId;
use crate::config::DiagramSettings;

/// Header keywords of the diagram kinds Mermaid defines.
const DIAGRAM_KEYWORDS: &[&str] = &[
    "flowchart",
    "graph",
    "sequenceDiagram",
    "classDiagram",
    "classDiagram-v2",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "gitGraph",
    "mindmap",
    "timeline",
    "quadrantChart",
    "requirementDiagram",
    "xychart-beta",
    "sankey-beta",
    "block-beta",
    "packet-beta",
    "kanban",
];

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Mermaid engine configured from [`DiagramSettings`].
#[derive(Debug)]
pub struct MermaidEngine {
    settings: DiagramSettings,
    /// `settings` with blank colors and fonts restored to defaults
    resolved: OnceCell<DiagramSettings>,
}

impl MermaidEngine {
    pub fn new(settings: DiagramSettings) -> Self {
        Self {
            settings,
            resolved: OnceCell::new(),
        }
    }

    fn resolved(&self) -> &DiagramSettings {
        self.resolved.get_or_init(|| {
            let defaults = DiagramSettings::default();
            let pick = |value: &str, fallback: String| match value.trim() {
                "" => fallback,
                trimmed => trimmed.to_string(),
            };
            DiagramSettings {
                font_family: pick(&self.settings.font_family, defaults.font_family),
                node_fill: pick(&self.settings.node_fill, defaults.node_fill),
                node_stroke: pick(&self.settings.node_stroke, defaults.node_stroke),
                edge_color: pick(&self.settings.edge_color, defaults.edge_color),
                text_color: pick(&self.settings.text_color, defaults.text_color),
                cluster_fill: pick(&self.settings.cluster_fill, defaults.cluster_fill),
                ..self.settings.clone()
            }
        })
    }

    fn options(&self) -> RenderOptions {
        let s = self.resolved();
        let theme = Theme {
            background: "#00000000".to_string(),
            font_family: s.font_family.clone(),
            font_size: s.font_size.into(),
            primary_color: s.node_fill.clone(),
            primary_text_color: s.text_color.clone(),
            primary_border_color: s.node_stroke.clone(),
            line_color: s.edge_color.clone(),
            cluster_background: s.cluster_fill.clone(),
            cluster_border: s.node_stroke.clone(),
            edge_label_background: s.cluster_fill.clone(),
            text_color: s.text_color.clone(),
            ..Theme::modern()
        };
        let layout = LayoutConfig {
            node_spacing: s.node_spacing.into(),
            rank_spacing: s.rank_spacing.into(),
            ..LayoutConfig::default()
        };
        RenderOptions { theme, layout }
    }

    /// Synchronous conversion used by [`DiagramEngine::convert`].
    pub fn render(&self, id: DiagramId, source: &str) -> Result<RenderedGraphic, DiagramError> {
        check_header(source)?;

        let options = self.options();
        let markup = panic::catch_unwind(AssertUnwindSafe(|| {
            mermaid_rs_renderer::render_with_options(source, options)
        }))
        .map_err(|payload| DiagramError::EngineFault(panic_payload_to_string(payload.as_ref())))?
        .map_err(|err| DiagramError::Syntax(err.to_string()))?;

        let markup = match markup.find("<svg") {
            Some(start) => &markup[start..],
            None => markup.as_str(),
        };
        let (width, height) = svg_size(markup).unwrap_or((0.0, 0.0));
        debug!("{} converted to {:.0}x{:.0} SVG", id, width, height);
        Ok(RenderedGraphic::new(
            scope_ids(markup, &format!("{id}-")),
            width,
            height,
        ))
    }
}

#[async_trait(?Send)]
impl DiagramEngine for MermaidEngine {
    fn name(&self) -> &str {
        "mermaid"
    }

    fn initialize(&self) {
        self.resolved();
    }

    async fn convert(&self, id: DiagramId, source: &str) -> Result<RenderedGraphic, DiagramError> {
        // Let the rest of the slide mount before doing the work.
        tokio::task::yield_now().await;
        self.render(id, source)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Source and Output Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Reject empty sources and unknown diagram kinds before calling the library.
///
/// Blank lines, `%%` comments and init directives, and a `---` front-matter
/// block may precede the header.
fn check_header(source: &str) -> Result<(), DiagramError> {
    let mut in_front_matter = false;
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line == "---" && (index == 0 || in_front_matter) {
            in_front_matter = !in_front_matter;
            continue;
        }
        if in_front_matter || line.is_empty() || line.starts_with("%%") {
            continue;
        }
        let keyword = line.split_whitespace().next().unwrap_or_default();
        return if DIAGRAM_KEYWORDS.contains(&keyword) {
            Ok(())
        } else {
            Err(DiagramError::UnsupportedDiagram(keyword.to_string()))
        };
    }
    Err(DiagramError::EmptySource)
}

fn pattern(cell: &'static OnceLock<Option<Regex>>, expr: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(expr).ok()).as_ref()
}

/// Prefix every `id` attribute and every `#id` reference with `prefix`.
fn scope_ids(svg: &str, prefix: &str) -> String {
    static IDS: OnceLock<Option<Regex>> = OnceLock::new();
    static URLS: OnceLock<Option<Regex>> = OnceLock::new();
    static HREFS: OnceLock<Option<Regex>> = OnceLock::new();

    let mut scoped = svg.to_string();
    if let Some(ids) = pattern(&IDS, r#"(\s)id="([^"]+)""#) {
        scoped = ids
            .replace_all(&scoped, |c: &Captures| format!("{}id=\"{prefix}{}\"", &c[1], &c[2]))
            .into_owned();
    }
    if let Some(urls) = pattern(&URLS, r"url\(#([^)]+)\)") {
        scoped = urls
            .replace_all(&scoped, |c: &Captures| format!("url(#{prefix}{})", &c[1]))
            .into_owned();
    }
    if let Some(hrefs) = pattern(&HREFS, r##"href="#([^"]+)""##) {
        scoped = hrefs
            .replace_all(&scoped, |c: &Captures| format!("href=\"#{prefix}{}\"", &c[1]))
            .into_owned();
    }
    scoped
}

/// Size of the root `<svg>` element, from `viewBox` or `width`/`height`.
fn svg_size(svg: &str) -> Option<(f32, f32)> {
    static ROOT: OnceLock<Option<Regex>> = OnceLock::new();
    static VIEW_BOX: OnceLock<Option<Regex>> = OnceLock::new();
    static LENGTH: OnceLock<Option<Regex>> = OnceLock::new();

    let root = pattern(&ROOT, r"<svg\b[^>]*>")?.find(svg)?.as_str();

    let from_view_box = pattern(&VIEW_BOX, r#"viewBox="([^"]+)""#)
        .and_then(|re| re.captures(root))
        .and_then(|caps| {
            let numbers: Vec<f32> = caps[1]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse().ok())
                .collect();
            match numbers.as_slice() {
                [_, _, width, height] => Some((*width, *height)),
                _ => None,
            }
        });
    if from_view_box.is_some() {
        return from_view_box;
    }

    let lengths = pattern(&LENGTH, r#"\s(width|height)="([0-9]*\.?[0-9]+)"#)?;
    let mut width = None;
    let mut height = None;
    for caps in lengths.captures_iter(root) {
        let value = caps[2].parse::<f32>().ok();
        match &caps[1] {
            "width" => width = value,
            _ => height = value,
        }
    }
    Some((width?, height?))
}

fn panic_payload_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
