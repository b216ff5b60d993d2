//! Slide component
//!
//! A [`SlideComponent`] runs parse, dispatch and render for one slide's
//! Markdown and owns the mount lifetime its diagram blocks are bound to.
//! Unmounting (explicitly or by drop) cancels every conversion still in
//! flight.

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::diagram::{DiagramBlock, RenderContext};
use crate::markdown::{parse_markdown_with_options, MarkdownDocument};
use crate::render::{build_render_tree, RenderKind, RenderNode, RenderOptions, RenderStats};

/// One mounted slide.
///
/// Must be mounted inside a [`tokio::task::LocalSet`] when its content
/// contains diagram blocks.
pub struct SlideComponent {
    content: String,
    lifetime: CancellationToken,
    diagrams: Vec<DiagramBlock>,
    tree: RenderNode,
    stats: RenderStats,
}

impl SlideComponent {
    /// Mount a slide and render its content.
    pub fn mount(ctx: &RenderContext, content: impl Into<String>) -> Self {
        let mut slide = Self {
            content: content.into(),
            lifetime: CancellationToken::new(),
            diagrams: Vec::new(),
            tree: RenderNode::new(RenderKind::Document),
            stats: RenderStats::default(),
        };
        slide.render(ctx);
        slide
    }

    /// Replace the slide's content and re-run the pipeline.
    ///
    /// Returns `false` (and does nothing) when the content is unchanged or
    /// the slide is unmounted.
    pub fn set_content(&mut self, ctx: &RenderContext, content: &str) -> bool {
        if self.content == content || !self.is_mounted() {
            return false;
        }
        self.content = content.to_string();
        self.render(ctx);
        true
    }

    /// Re-run the pipeline over the current content.
    ///
    /// Diagram blocks whose source is unchanged keep their identity and
    /// are not converted again.
    pub fn rerender(&mut self, ctx: &RenderContext) {
        self.render(ctx);
    }

    fn render(&mut self, ctx: &RenderContext) {
        if !self.is_mounted() {
            debug!("Skipping render of unmounted slide");
            return;
        }

        let settings = ctx.settings();
        let document = parse_markdown_with_options(&self.content, &settings.markdown)
            .unwrap_or_else(|err| {
                warn!("Rendering slide as literal text: {}", err);
                MarkdownDocument::literal(&self.content)
            });
        let options = RenderOptions::from_settings(settings);

        // Blocks are matched to the new pass by position.
        let mut previous = std::mem::take(&mut self.diagrams).into_iter();
        let mut mounted = Vec::new();
        let lifetime = &self.lifetime;
        let (tree, stats) = build_render_tree(&document, &options, &mut |source| {
            let block = match previous.next() {
                Some(mut block) => {
                    block.update(ctx, source, lifetime);
                    block
                }
                None => DiagramBlock::mount(ctx, source, lifetime),
            };
            let view = block.view();
            mounted.push(block);
            view
        });

        for mut surplus in previous {
            surplus.unmount();
        }

        self.diagrams = mounted;
        self.tree = tree;
        self.stats = stats;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The render tree of the latest pass.
    pub fn tree(&self) -> &RenderNode {
        &self.tree
    }

    /// Dispatch counts of the latest pass.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn diagrams(&self) -> &[DiagramBlock] {
        &self.diagrams
    }

    pub fn is_mounted(&self) -> bool {
        !self.lifetime.is_cancelled()
    }

    /// Wait for every diagram conversion on this slide to finish.
    pub async fn settle(&mut self) {
        for block in &mut self.diagrams {
            block.settle().await;
        }
    }

    /// Tear the slide down. Pending conversions are cancelled and their
    /// outcomes discarded.
    pub fn unmount(&mut self) {
        if self.lifetime.is_cancelled() {
            return;
        }
        debug!("Unmounting slide with {} diagram(s)", self.diagrams.len());
        self.lifetime.cancel();
        for block in &mut self.diagrams {
            block.unmount();
        }
    }
}

impl Drop for SlideComponent {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for SlideComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideComponent")
            .field("content_len", &self.content.len())
            .field("mounted", &self.is_mounted())
            .field("diagrams", &self.diagrams)
            .field("stats", &self.stats)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
