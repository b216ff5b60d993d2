//! Rendering settings for slidemark
//!
//! This module defines the `Settings` struct that holds every user-configurable
//! rendering option, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

use crate::markdown::MarkdownOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Color theme for rendered slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Whether this theme uses a dark background.
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagram Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Layout and styling options for the diagram engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    /// Gap between nodes sharing a rank, in pixels
    pub node_spacing: f32,
    /// Gap between consecutive ranks, in pixels
    pub rank_spacing: f32,
    /// Label font size, in pixels
    pub font_size: f32,
    /// Label font family
    pub font_family: String,
    /// Node fill color
    pub node_fill: String,
    /// Node border color
    pub node_stroke: String,
    /// Edge and arrowhead color
    pub edge_color: String,
    /// Label text color
    pub text_color: String,
    /// Subgraph background color
    pub cluster_fill: String,
    /// Upper bound on a single conversion; 0 disables the limit
    pub timeout_ms: u64,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            node_spacing: 40.0,
            rank_spacing: 60.0,
            font_size: 14.0,
            font_family: String::from("Helvetica, Arial, sans-serif"),
            node_fill: String::from("#1e293b"),
            node_stroke: String::from("#7dd3fc"),
            edge_color: String::from("#94a3b8"),
            text_color: String::from("#e2e8f0"),
            cluster_fill: String::from("#0f172a"),
            timeout_ms: 5_000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Rendering preferences, stored as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light or dark)
    pub theme: Theme,

    /// syntect theme for code blocks
    pub syntax_theme: String,

    /// Whether highlighted code blocks carry a line-number gutter
    pub show_line_numbers: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Content Pipeline
    // ─────────────────────────────────────────────────────────────────────────
    /// Fence language tag that marks diagram source
    pub diagram_tag: String,

    /// Markdown extensions
    pub markdown: MarkdownOptions,

    /// Diagram engine options
    pub diagram: DiagramSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            syntax_theme: String::from(Self::DEFAULT_SYNTAX_THEME),
            show_line_numbers: true,
            diagram_tag: String::from(Self::DEFAULT_DIAGRAM_TAG),
            markdown: MarkdownOptions::default(),
            diagram: DiagramSettings::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Default fence tag for diagrams.
    pub const DEFAULT_DIAGRAM_TAG: &'static str = "mermaid";
    /// Default syntect theme.
    pub const DEFAULT_SYNTAX_THEME: &'static str = "base16-ocean.dark";
    /// Minimum diagram font size.
    pub const MIN_FONT_SIZE: f32 = 6.0;
    /// Maximum diagram font size.
    pub const MAX_FONT_SIZE: f32 = 48.0;
    /// Minimum node/rank spacing.
    pub const MIN_SPACING: f32 = 8.0;
    /// Maximum node/rank spacing.
    pub const MAX_SPACING: f32 = 400.0;
    /// Maximum conversion timeout.
    pub const MAX_TIMEOUT_MS: u64 = 120_000;

    /// Clamp numeric fields into range and restore blank strings to defaults.
    pub fn sanitize(&mut self) {
        self.diagram.font_size = self
            .diagram
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
        self.diagram.node_spacing = self
            .diagram
            .node_spacing
            .clamp(Self::MIN_SPACING, Self::MAX_SPACING);
        self.diagram.rank_spacing = self
            .diagram
            .rank_spacing
            .clamp(Self::MIN_SPACING, Self::MAX_SPACING);
        self.diagram.timeout_ms = self.diagram.timeout_ms.min(Self::MAX_TIMEOUT_MS);

        // An empty tag would route every untagged fence to the diagram engine
        let tag = self.diagram_tag.trim();
        if tag.is_empty() {
            self.diagram_tag = String::from(Self::DEFAULT_DIAGRAM_TAG);
        } else if tag.len() != self.diagram_tag.len() {
            self.diagram_tag = tag.to_string();
        }

        if self.syntax_theme.trim().is_empty() {
            self.syntax_theme = String::from(Self::DEFAULT_SYNTAX_THEME);
        }
    }

    /// Deserialize and [`sanitize`](Self::sanitize).
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
