//! Diagram engine seam
//!
//! A diagram engine turns diagram source text into a graphic. Conversion is
//! asynchronous so a slow engine never holds up the rest of a slide; the
//! engine itself holds no per-diagram state.

use std::fmt;

use async_trait::async_trait;

use super::instance::DiagramId;

// ─────────────────────────────────────────────────────────────────────────────
// Rendered Graphic
// ─────────────────────────────────────────────────────────────────────────────

/// Vector markup produced by a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGraphic {
    svg: String,
    width: f32,
    height: f32,
}

impl RenderedGraphic {
    pub fn new(svg: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            svg: svg.into(),
            width,
            height,
        }
    }

    /// The SVG markup.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Reject output that cannot stand in for a placeholder.
    pub fn validate(self) -> Result<Self, DiagramError> {
        let trimmed = self.svg.trim_start();
        if trimmed.is_empty() {
            return Err(DiagramError::InvalidOutput("empty graphic".to_string()));
        }
        if !trimmed.starts_with("<svg") {
            return Err(DiagramError::InvalidOutput(
                "graphic is not SVG markup".to_string(),
            ));
        }
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(DiagramError::InvalidOutput(format!(
                "degenerate size {}x{}",
                self.width, self.height
            )));
        }
        Ok(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Why a diagram could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramError {
    /// Source contains nothing but whitespace and comments
    EmptySource,
    /// First statement names a diagram type the engine does not draw
    UnsupportedDiagram(String),
    /// The engine rejected the source
    Syntax(String),
    /// The engine returned something that is not a usable graphic
    InvalidOutput(String),
    /// Conversion took longer than the configured limit
    Timeout { millis: u64 },
    /// The engine failed internally
    EngineFault(String),
}

impl fmt::Display for DiagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramError::EmptySource => write!(f, "Diagram source is empty"),
            DiagramError::UnsupportedDiagram(kind) => {
                write!(f, "Unsupported diagram type '{}'", kind)
            }
            DiagramError::Syntax(message) => write!(f, "Diagram syntax error: {}", message),
            DiagramError::InvalidOutput(msg) => write!(f, "Invalid diagram output: {}", msg),
            DiagramError::Timeout { millis } => {
                write!(f, "Diagram conversion timed out after {} ms", millis)
            }
            DiagramError::EngineFault(msg) => write!(f, "Diagram engine fault: {}", msg),
        }
    }
}

impl std::error::Error for DiagramError {}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Converts diagram source into a graphic.
///
/// Engines run on the single-threaded slide scheduler, so neither the
/// engine nor its futures need to be `Send`.
#[async_trait(?Send)]
pub trait DiagramEngine {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Prepare shared engine configuration.
    ///
    /// Called through [`RenderContext::ensure_initialized`], which guarantees
    /// a single call per context.
    ///
    /// [`RenderContext::ensure_initialized`]: super::RenderContext::ensure_initialized
    fn initialize(&self) {}

    /// Convert `source` into a graphic for the instance `id`.
    ///
    /// Element ids inside the graphic must be derived from `id`, so that
    /// several graphics can share one HTML document.
    async fn convert(&self, id: DiagramId, source: &str) -> Result<RenderedGraphic, DiagramError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
