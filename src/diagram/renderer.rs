//! Diagram block lifecycle
//!
//! Each mounted diagram block owns one [`DiagramInstance`] and the local task
//! converting it. The block's cancellation token is a child of the owning
//! slide's lifetime token, so tearing down the slide (or just the block)
//! stops the conversion and guarantees its outcome is never applied.
//!
//! Conversion tasks are spawned with [`tokio::task::spawn_local`], so blocks
//! must be mounted from inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::context::RenderContext;
use super::engine::{DiagramEngine, DiagramError, RenderedGraphic};
use super::instance::{DiagramId, DiagramInstance, DiagramView};

/// A mounted diagram block.
pub struct DiagramBlock {
    instance: Rc<RefCell<DiagramInstance>>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DiagramBlock {
    /// Mount a block for `source` and start its conversion.
    ///
    /// Allocates a fresh identity; the conversion runs once for this
    /// identity and never again.
    pub fn mount(ctx: &RenderContext, source: &str, lifetime: &CancellationToken) -> Self {
        ctx.ensure_initialized();

        let id = ctx.next_identity();
        let instance = Rc::new(RefCell::new(DiagramInstance::new(id, source)));
        let token = lifetime.child_token();

        ctx.record_conversion();
        let task = spawn_conversion(
            ctx.engine(),
            ctx.settings().diagram.timeout_ms,
            Rc::downgrade(&instance),
            token.clone(),
            id,
            source.to_string(),
        );
        debug!("Mounted {} ({} bytes of source)", id, source.len());

        Self {
            instance,
            token,
            task: Some(task),
        }
    }

    /// Reconcile the block with new source.
    ///
    /// Unchanged source keeps the current instance and starts nothing.
    /// Changed source tears the old instance down and mounts a new one with
    /// a new identity. Returns `true` when a new instance was mounted.
    pub fn update(&mut self, ctx: &RenderContext, source: &str, lifetime: &CancellationToken) -> bool {
        if self.instance.borrow().source() == source {
            return false;
        }
        debug!("Source of {} changed, remounting", self.id());
        *self = DiagramBlock::mount(ctx, source, lifetime);
        true
    }

    pub fn id(&self) -> DiagramId {
        self.instance.borrow().id()
    }

    /// Read-only view for the render tree.
    pub fn view(&self) -> DiagramView {
        DiagramView::new(Rc::clone(&self.instance))
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the conversion task has finished.
    ///
    /// Returns immediately if the block was unmounted or already settled.
    pub async fn settle(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(err) = task.await {
            if err.is_panic() {
                warn!("Conversion task for {} panicked", self.id());
            }
        }
    }

    /// Stop the conversion. Any outcome that arrives afterwards is dropped.
    pub fn unmount(&mut self) {
        if !self.token.is_cancelled() {
            debug!("Unmounting {}", self.id());
            self.token.cancel();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for DiagramBlock {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for DiagramBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramBlock")
            .field("instance", &self.instance.borrow())
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion Task
// ─────────────────────────────────────────────────────────────────────────────

fn spawn_conversion(
    engine: Rc<dyn DiagramEngine>,
    timeout_ms: u64,
    instance: Weak<RefCell<DiagramInstance>>,
    token: CancellationToken,
    id: DiagramId,
    source: String,
) -> JoinHandle<()> {
    tokio::task::spawn_local(async move {
        let mut guard = SettleGuard {
            instance: instance.clone(),
            token: token.clone(),
            armed: true,
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => {
                guard.armed = false;
                debug!("{} cancelled before conversion finished", id);
                return;
            }
            outcome = convert_bounded(engine.as_ref(), id, &source, timeout_ms) => outcome,
        };
        guard.armed = false;

        apply_outcome(&instance, &token, id, outcome.and_then(RenderedGraphic::validate));
    })
}

async fn convert_bounded(
    engine: &dyn DiagramEngine,
    id: DiagramId,
    source: &str,
    timeout_ms: u64,
) -> Result<RenderedGraphic, DiagramError> {
    let conversion = engine.convert(id, source);
    if timeout_ms == 0 {
        return conversion.await;
    }
    match tokio::time::timeout(Duration::from_millis(timeout_ms), conversion).await {
        Ok(outcome) => outcome,
        Err(_) => Err(DiagramError::Timeout { millis: timeout_ms }),
    }
}

fn apply_outcome(
    instance: &Weak<RefCell<DiagramInstance>>,
    token: &CancellationToken,
    id: DiagramId,
    outcome: Result<RenderedGraphic, DiagramError>,
) {
    if token.is_cancelled() {
        debug!("Discarding outcome for unmounted {}", id);
        return;
    }
    let Some(instance) = instance.upgrade() else {
        debug!("Discarding outcome for dropped {}", id);
        return;
    };
    match &outcome {
        Ok(graphic) => debug!(
            "Rendered {} ({:.0}x{:.0})",
            id,
            graphic.width(),
            graphic.height()
        ),
        Err(err) => warn!("Diagram {} failed: {}", id, err),
    }
    instance.borrow_mut().resolve(outcome);
}

/// Fails a still-pending instance if its task ends without an outcome,
/// which only happens when the engine panics.
struct SettleGuard {
    instance: Weak<RefCell<DiagramInstance>>,
    token: CancellationToken,
    armed: bool,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.armed || self.token.is_cancelled() {
            return;
        }
        if let Some(instance) = self.instance.upgrade() {
            if let Ok(mut instance) = instance.try_borrow_mut() {
                warn!("Conversion of {} ended without a result", instance.id());
                instance.resolve(Err(DiagramError::EngineFault(
                    "conversion ended without a result".to_string(),
                )));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::diagram::instance::DiagramStatus;
    use async_trait::async_trait;
    use std::cell::Cell;
    use tokio::sync::Notify;
    use tokio::task::LocalSet;

    struct CountingEngine {
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl DiagramEngine for CountingEngine {
        fn name(&self) -> &str {
            "counting"
        }

        async fn convert(&self, _id: DiagramId, source: &str) -> Result<RenderedGraphic, DiagramError> {
            self.calls.set(self.calls.get() + 1);
            if source.contains("broken") {
                return Err(DiagramError::Syntax("broken".to_string()));
            }
            Ok(RenderedGraphic::new("<svg></svg>", 10.0, 10.0))
        }
    }

    struct GatedEngine {
        gate: Rc<Notify>,
        finished: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl DiagramEngine for GatedEngine {
        fn name(&self) -> &str {
            "gated"
        }

        async fn convert(&self, _id: DiagramId, _source: &str) -> Result<RenderedGraphic, DiagramError> {
            self.gate.notified().await;
            self.finished.set(self.finished.get() + 1);
            Ok(RenderedGraphic::new("<svg></svg>", 10.0, 10.0))
        }
    }

    struct PanickingEngine;

    #[async_trait(?Send)]
    impl DiagramEngine for PanickingEngine {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn convert(&self, _id: DiagramId, _source: &str) -> Result<RenderedGraphic, DiagramError> {
            panic!("engine exploded");
        }
    }

    struct BogusOutputEngine;

    #[async_trait(?Send)]
    impl DiagramEngine for BogusOutputEngine {
        fn name(&self) -> &str {
            "bogus"
        }

        async fn convert(&self, _id: DiagramId, _source: &str) -> Result<RenderedGraphic, DiagramError> {
            Ok(RenderedGraphic::new("", 10.0, 10.0))
        }
    }

    fn counting() -> (Rc<CountingEngine>, RenderContext) {
        let engine = Rc::new(CountingEngine {
            calls: Cell::new(0),
        });
        let ctx = RenderContext::new(Settings::default(), engine.clone());
        (engine, ctx)
    }

    #[tokio::test]
    async fn test_conversion_runs_once_per_identity() {
        LocalSet::new()
            .run_until(async {
                let (engine, ctx) = counting();
                let lifetime = CancellationToken::new();
                let mut block = DiagramBlock::mount(&ctx, "flowchart LR\nA-->B", &lifetime);

                block.settle().await;
                block.settle().await;
                assert!(!block.update(&ctx, "flowchart LR\nA-->B", &lifetime));
                block.settle().await;

                assert_eq!(engine.calls.get(), 1);
                assert_eq!(ctx.conversions_started(), 1);
                assert_eq!(block.view().status(), DiagramStatus::Rendered);
            })
            .await;
    }

    #[tokio::test]
    async fn test_changed_source_gets_new_identity() {
        LocalSet::new()
            .run_until(async {
                let (engine, ctx) = counting();
                let lifetime = CancellationToken::new();
                let mut block = DiagramBlock::mount(&ctx, "flowchart LR\nA-->B", &lifetime);
                let first = block.id();
                block.settle().await;

                assert!(block.update(&ctx, "flowchart LR\nA-->C", &lifetime));
                block.settle().await;

                assert_ne!(block.id(), first);
                assert!(block.id() > first);
                assert_eq!(engine.calls.get(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        LocalSet::new()
            .run_until(async {
                let (_engine, ctx) = counting();
                let lifetime = CancellationToken::new();
                let mut bad = DiagramBlock::mount(&ctx, "broken", &lifetime);
                let mut good = DiagramBlock::mount(&ctx, "fine", &lifetime);

                bad.settle().await;
                good.settle().await;

                assert_eq!(bad.view().status(), DiagramStatus::Failed);
                assert!(bad.view().graphic().is_none());
                assert_eq!(good.view().status(), DiagramStatus::Rendered);
            })
            .await;
    }

    #[tokio::test]
    async fn test_unmount_mid_conversion_discards_outcome() {
        LocalSet::new()
            .run_until(async {
                let gate = Rc::new(Notify::new());
                let engine = Rc::new(GatedEngine {
                    gate: gate.clone(),
                    finished: Cell::new(0),
                });
                let ctx = RenderContext::new(Settings::default(), engine.clone());
                let lifetime = CancellationToken::new();

                let mut block = DiagramBlock::mount(&ctx, "flowchart LR\nA-->B", &lifetime);
                let view = block.view();

                // Let the task start and park on the gate.
                tokio::task::yield_now().await;
                block.unmount();
                gate.notify_waiters();
                tokio::task::yield_now().await;
                block.settle().await;

                assert!(block.is_cancelled());
                assert_eq!(view.status(), DiagramStatus::Pending);
                assert_eq!(engine.finished.get(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_parent_lifetime_cancels_block() {
        LocalSet::new()
            .run_until(async {
                let gate = Rc::new(Notify::new());
                let engine = Rc::new(GatedEngine {
                    gate: gate.clone(),
                    finished: Cell::new(0),
                });
                let ctx = RenderContext::new(Settings::default(), engine);
                let lifetime = CancellationToken::new();
                let mut block = DiagramBlock::mount(&ctx, "x", &lifetime);

                tokio::task::yield_now().await;
                lifetime.cancel();
                block.settle().await;
                gate.notify_waiters();

                assert!(block.is_cancelled());
                assert_eq!(block.view().status(), DiagramStatus::Pending);
            })
            .await;
    }

    #[tokio::test]
    async fn test_dropping_block_mid_conversion_is_silent() {
        LocalSet::new()
            .run_until(async {
                let gate = Rc::new(Notify::new());
                let engine = Rc::new(GatedEngine {
                    gate: gate.clone(),
                    finished: Cell::new(0),
                });
                let ctx = RenderContext::new(Settings::default(), engine.clone());
                let lifetime = CancellationToken::new();

                let block = DiagramBlock::mount(&ctx, "x", &lifetime);
                tokio::task::yield_now().await;
                drop(block);
                gate.notify_waiters();
                tokio::task::yield_now().await;

                assert_eq!(engine.finished.get(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_timeout_fails_instance() {
        LocalSet::new()
            .run_until(async {
                let engine = Rc::new(GatedEngine {
                    gate: Rc::new(Notify::new()),
                    finished: Cell::new(0),
                });
                let mut settings = Settings::default();
                settings.diagram.timeout_ms = 20;
                let ctx = RenderContext::new(settings, engine);
                let lifetime = CancellationToken::new();

                let mut block = DiagramBlock::mount(&ctx, "x", &lifetime);
                block.settle().await;

                assert_eq!(block.view().status(), DiagramStatus::Failed);
                assert_eq!(
                    block.view().error(),
                    Some(DiagramError::Timeout { millis: 20 })
                );
            })
            .await;
    }

    #[tokio::test]
    async fn test_engine_panic_fails_instance() {
        LocalSet::new()
            .run_until(async {
                let ctx = RenderContext::new(Settings::default(), Rc::new(PanickingEngine));
                let lifetime = CancellationToken::new();

                let mut block = DiagramBlock::mount(&ctx, "x", &lifetime);
                block.settle().await;

                assert_eq!(block.view().status(), DiagramStatus::Failed);
                assert!(matches!(
                    block.view().error(),
                    Some(DiagramError::EngineFault(_))
                ));
            })
            .await;
    }

    #[tokio::test]
    async fn test_invalid_output_fails_instance() {
        LocalSet::new()
            .run_until(async {
                let ctx = RenderContext::new(Settings::default(), Rc::new(BogusOutputEngine));
                let lifetime = CancellationToken::new();

                let mut block = DiagramBlock::mount(&ctx, "x", &lifetime);
                block.settle().await;

                assert!(matches!(
                    block.view().error(),
                    Some(DiagramError::InvalidOutput(_))
                ));
            })
            .await;
    }
}
