//! Diagram instance identity and state
//!
//! A diagram instance is one conversion attempt for one mounted diagram
//! block. It starts `Pending` and settles exactly once, into `Rendered` or
//! `Failed`; neither terminal state ever changes again.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use super::engine::{DiagramError, RenderedGraphic};

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a diagram instance, unique within its rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramId(u64);

impl DiagramId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "diagram-{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramStatus {
    Pending,
    Rendered,
    Failed,
}

impl DiagramStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DiagramStatus::Pending)
    }
}

#[derive(Debug)]
enum DiagramState {
    Pending,
    Rendered(RenderedGraphic),
    Failed(DiagramError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Instance
// ─────────────────────────────────────────────────────────────────────────────

/// One diagram conversion attempt.
#[derive(Debug)]
pub struct DiagramInstance {
    id: DiagramId,
    source: String,
    state: DiagramState,
}

impl DiagramInstance {
    pub(crate) fn new(id: DiagramId, source: &str) -> Self {
        Self {
            id,
            source: source.to_string(),
            state: DiagramState::Pending,
        }
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn status(&self) -> DiagramStatus {
        match self.state {
            DiagramState::Pending => DiagramStatus::Pending,
            DiagramState::Rendered(_) => DiagramStatus::Rendered,
            DiagramState::Failed(_) => DiagramStatus::Failed,
        }
    }

    /// The graphic, once rendered.
    pub fn graphic(&self) -> Option<&RenderedGraphic> {
        match &self.state {
            DiagramState::Rendered(graphic) => Some(graphic),
            _ => None,
        }
    }

    /// The failure, once failed.
    pub fn error(&self) -> Option<&DiagramError> {
        match &self.state {
            DiagramState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Settle a pending instance. Returns `false` and changes nothing if the
    /// instance has already settled.
    pub(crate) fn resolve(&mut self, outcome: Result<RenderedGraphic, DiagramError>) -> bool {
        if self.status().is_terminal() {
            debug!("{} already settled, ignoring late outcome", self.id);
            return false;
        }
        self.state = match outcome {
            Ok(graphic) => DiagramState::Rendered(graphic),
            Err(err) => DiagramState::Failed(err),
        };
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Read-only View
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only handle the render tree keeps for a diagram block.
///
/// The view observes the instance as its conversion settles; it cannot
/// change it.
#[derive(Clone)]
pub struct DiagramView(Rc<RefCell<DiagramInstance>>);

impl DiagramView {
    pub(crate) fn new(instance: Rc<RefCell<DiagramInstance>>) -> Self {
        Self(instance)
    }

    pub fn id(&self) -> DiagramId {
        self.0.borrow().id()
    }

    pub fn status(&self) -> DiagramStatus {
        self.0.borrow().status()
    }

    pub fn source(&self) -> String {
        self.0.borrow().source().to_string()
    }

    pub fn graphic(&self) -> Option<RenderedGraphic> {
        self.0.borrow().graphic().cloned()
    }

    pub fn error(&self) -> Option<DiagramError> {
        self.0.borrow().error().cloned()
    }
}

impl fmt::Debug for DiagramView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = self.0.borrow();
        f.debug_struct("DiagramView")
            .field("id", &instance.id())
            .field("status", &instance.status())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn graphic() -> RenderedGraphic {
        RenderedGraphic::new("<svg></svg>", 10.0, 10.0)
    }

    #[test]
    fn test_new_instance_is_pending() {
        let instance = DiagramInstance::new(DiagramId::new(1), "flowchart LR\nA-->B");
        assert_eq!(instance.status(), DiagramStatus::Pending);
        assert!(instance.graphic().is_none());
        assert!(instance.error().is_none());
    }

    #[test]
    fn test_rendered_is_terminal() {
        let mut instance = DiagramInstance::new(DiagramId::new(1), "x");
        assert!(instance.resolve(Ok(graphic())));
        assert!(!instance.resolve(Err(DiagramError::EmptySource)));

        assert_eq!(instance.status(), DiagramStatus::Rendered);
        assert_eq!(instance.graphic(), Some(&graphic()));
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut instance = DiagramInstance::new(DiagramId::new(2), "x");
        assert!(instance.resolve(Err(DiagramError::EmptySource)));
        assert!(!instance.resolve(Ok(graphic())));

        assert_eq!(instance.status(), DiagramStatus::Failed);
        assert_eq!(instance.error(), Some(&DiagramError::EmptySource));
    }

    #[test]
    fn test_view_observes_settlement() {
        let instance = Rc::new(RefCell::new(DiagramInstance::new(DiagramId::new(7), "x")));
        let view = DiagramView::new(Rc::clone(&instance));
        assert_eq!(view.status(), DiagramStatus::Pending);

        instance.borrow_mut().resolve(Ok(graphic()));
        assert_eq!(view.status(), DiagramStatus::Rendered);
        assert_eq!(view.id().to_string(), "diagram-7");
    }
}
