//! Diagram rendering
//!
//! Diagram code blocks are converted asynchronously by a [`DiagramEngine`].
//! A [`RenderContext`] owns the engine and hands out identities; each
//! mounted [`DiagramBlock`] owns one conversion task and cancels it when
//! unmounted.

mod context;
mod engine;
mod instance;
mod mermaid;
mod renderer;

pub use context::RenderContext;
pub use engine::{DiagramEngine, DiagramError, RenderedGraphic};
pub use instance::{DiagramId, DiagramInstance, DiagramStatus, DiagramView};
pub use mermaid::MermaidEngine;
pub use renderer::DiagramBlock;
