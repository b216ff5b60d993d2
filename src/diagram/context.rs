//! Rendering context
//!
//! The context owns everything diagram blocks share: the settings, the
//! diagram engine and the identity counter. It is created once by the host
//! and passed by reference to every slide.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

use log::info;

use super::engine::DiagramEngine;
use super::instance::DiagramId;
use super::mermaid::MermaidEngine;
use crate::config::Settings;

/// Shared state for all slides rendered by one host.
pub struct RenderContext {
    settings: Settings,
    engine: Rc<dyn DiagramEngine>,
    next_id: Cell<u64>,
    initialized: OnceCell<()>,
    conversions_started: Cell<usize>,
}

impl RenderContext {
    /// Create a context around an explicit engine.
    pub fn new(settings: Settings, engine: Rc<dyn DiagramEngine>) -> Self {
        Self {
            settings,
            engine,
            next_id: Cell::new(1),
            initialized: OnceCell::new(),
            conversions_started: Cell::new(0),
        }
    }

    /// Create a context using the built-in Mermaid engine.
    pub fn with_default_engine(settings: Settings) -> Self {
        let engine = Rc::new(MermaidEngine::new(settings.diagram.clone()));
        Self::new(settings, engine)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one-time engine setup. Later calls do nothing.
    pub fn ensure_initialized(&self) {
        self.initialized.get_or_init(|| {
            info!("Initializing diagram engine '{}'", self.engine.name());
            self.engine.initialize();
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }

    /// Hand out the next diagram identity. Identities never repeat within a
    /// context, including across unmounts and remounts.
    pub(crate) fn next_identity(&self) -> DiagramId {
        let value = self.next_id.get();
        self.next_id.set(value + 1);
        DiagramId::new(value)
    }

    pub(crate) fn engine(&self) -> Rc<dyn DiagramEngine> {
        Rc::clone(&self.engine)
    }

    pub(crate) fn record_conversion(&self) {
        self.conversions_started
            .set(self.conversions_started.get() + 1);
    }

    /// Number of conversions started through this context.
    pub fn conversions_started(&self) -> usize {
        self.conversions_started.get()
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("engine", &self.engine.name())
            .field("next_id", &self.next_id.get())
            .field("initialized", &self.is_initialized())
            .field("conversions_started", &self.conversions_started.get())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
