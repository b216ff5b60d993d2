//! Slide deck shell
//!
//! Loads a deck from TOML, composes each slide's Markdown, and presents one
//! [`SlideComponent`] at a time against a shared [`RenderContext`].
//!
//! ```toml
//! title = "Virtual actors"
//! description = "Orleans from first principles"
//!
//! [[slides]]
//! title = "Virtual actors"
//! subtitle = "A short tour"
//! presenter = "Jane Doe"
//! date = "2025-08-19"
//!
//! [[slides]]
//! title = "Grains"
//! body = """
//! - one activation per identity
//! """
//! ```

use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::component::SlideComponent;
use crate::config::Settings;
use crate::diagram::{DiagramEngine, RenderContext};
use crate::error::{Error, Result};
use crate::export::{
    generate_deck_document, render_slide_fragment, render_title_slide, DeckPage, FragmentOptions,
};

// ─────────────────────────────────────────────────────────────────────────────
// Deck Model
// ─────────────────────────────────────────────────────────────────────────────

/// One authored slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSource {
    pub title: String,
    /// Markdown body
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub presenter: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SlideSource {
    /// A title slide carries a subtitle, presenter or date instead of a body.
    pub fn is_title_slide(&self) -> bool {
        self.body.is_none()
            && (self.subtitle.is_some() || self.presenter.is_some() || self.date.is_some())
    }

    /// The Markdown rendered for this slide.
    ///
    /// Title slides yield only their headings; presenter and date are laid
    /// out by [`render_title_slide`] around the rendered fragment.
    pub fn markdown(&self) -> String {
        let mut parts = vec![format!("# {}", self.title.trim())];
        if self.is_title_slide() {
            parts.extend(self.subtitle.iter().map(|sub| format!("## {}", sub.trim())));
        } else if let Some(body) = &self.body {
            parts.push(body.clone());
        }
        parts.join("\n\n")
    }
}

/// A deck of slides with page metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slides: Vec<SlideSource>,
}

impl Deck {
    /// Parse a deck from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let deck: Deck = toml::from_str(text)?;
        if deck.slides.is_empty() {
            return Err(Error::DeckParse {
                message: "deck has no slides".to_string(),
                source: None,
            });
        }
        Ok(deck)
    }

    /// Load a deck file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::DeckLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let deck = Self::from_toml(&text)?;
        info!("Loaded deck '{}' with {} slides", deck.title, deck.len());
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presenter
// ─────────────────────────────────────────────────────────────────────────────

/// Presents a deck one slide at a time.
///
/// Showing a slide unmounts the previous one first, so at most one slide's
/// diagram conversions are ever in flight.
pub struct DeckPresenter {
    deck: Deck,
    ctx: RenderContext,
    current: Option<(usize, SlideComponent)>,
}

impl DeckPresenter {
    pub fn new(deck: Deck, ctx: RenderContext) -> Self {
        Self {
            deck,
            ctx,
            current: None,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Mount slide `index` (zero-based).
    ///
    /// Showing the slide that is already mounted keeps it as is.
    pub fn show(&mut self, index: usize) -> Result<&mut SlideComponent> {
        let Some(source) = self.deck.slides.get(index) else {
            return Err(Error::SlideOutOfRange {
                index: index + 1,
                len: self.deck.len(),
            });
        };

        let already_shown = matches!(&self.current, Some((shown, _)) if *shown == index);
        if !already_shown {
            if let Some((previous, mut slide)) = self.current.take() {
                debug!("Leaving slide {}", previous + 1);
                slide.unmount();
            }
            debug!("Showing slide {}: {}", index + 1, source.title);
            let slide = SlideComponent::mount(&self.ctx, source.markdown());
            self.current = Some((index, slide));
        }

        match &mut self.current {
            Some((_, slide)) => Ok(slide),
            None => Err(Error::Application("no slide mounted".to_string())),
        }
    }

    /// Advance to the next slide. Stays put on the last one.
    pub fn next(&mut self) -> Result<&mut SlideComponent> {
        let index = match self.current_index() {
            Some(index) => (index + 1).min(self.deck.len().saturating_sub(1)),
            None => 0,
        };
        self.show(index)
    }

    /// Go back one slide. Stays put on the first one.
    pub fn previous(&mut self) -> Result<&mut SlideComponent> {
        let index = self
            .current_index()
            .map(|index| index.saturating_sub(1))
            .unwrap_or(0);
        self.show(index)
    }

    pub fn current(&self) -> Option<&SlideComponent> {
        self.current.as_ref().map(|(_, slide)| slide)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().map(|(index, _)| *index)
    }

    /// Show slide `index`, wait for its diagrams, and render it to HTML.
    pub async fn render_fragment(&mut self, index: usize) -> Result<String> {
        let options = FragmentOptions::from_settings(self.ctx.settings());
        let byline = self
            .deck
            .slides
            .get(index)
            .filter(|source| source.is_title_slide())
            .map(|source| (source.presenter.clone(), source.date.clone()));

        let slide = self.show(index)?;
        slide.settle().await;
        let fragment = render_slide_fragment(slide.tree(), &options);
        Ok(match byline {
            Some((presenter, date)) => {
                render_title_slide(&fragment, presenter.as_deref(), date.as_deref())
            }
            None => fragment,
        })
    }

    /// Unmount the current slide.
    pub fn close(&mut self) {
        if let Some((_, mut slide)) = self.current.take() {
            slide.unmount();
        }
    }

    fn page(&self) -> DeckPage<'_> {
        DeckPage {
            title: &self.deck.title,
            description: self.deck.description.as_deref(),
            theme: self.ctx.settings().theme,
        }
    }
}

impl std::fmt::Debug for DeckPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckPresenter")
            .field("title", &self.deck.title)
            .field("slides", &self.deck.len())
            .field("current", &self.current_index())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deck Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render every slide of `deck` into one standalone HTML document.
///
/// Must run inside a [`tokio::task::LocalSet`].
pub async fn render_deck_html(
    deck: Deck,
    settings: Settings,
    engine: Rc<dyn DiagramEngine>,
) -> Result<String> {
    let indices: Vec<usize> = (0..deck.len()).collect();
    render_document(deck, settings, engine, &indices).await
}

/// Render a single slide (zero-based) as a standalone HTML document.
pub async fn render_slide_html(
    deck: Deck,
    settings: Settings,
    engine: Rc<dyn DiagramEngine>,
    index: usize,
) -> Result<String> {
    render_document(deck, settings, engine, &[index]).await
}

async fn render_document(
    deck: Deck,
    settings: Settings,
    engine: Rc<dyn DiagramEngine>,
    indices: &[usize],
) -> Result<String> {
    let mut presenter = DeckPresenter::new(deck, RenderContext::new(settings, engine));

    let mut fragments = Vec::with_capacity(indices.len());
    for &index in indices {
        fragments.push(presenter.render_fragment(index).await?);
    }
    presenter.close();

    info!(
        "Rendered {} slide(s), {} diagram conversion(s)",
        fragments.len(),
        presenter.context().conversions_started()
    );
    Ok(generate_deck_document(&presenter.page(), &fragments))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{DiagramStatus, MermaidEngine};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::task::LocalSet;

    const DECK: &str = r#"
title = "Virtual Actors & You"
description = "Orleans from first principles"

[[slides]]
title = "Virtual Actors"
subtitle = "An introduction"
presenter = "Webinar Maker"
date = "2025-08-19"

[[slides]]
title = "Grains"
body = """
- One activation per identity

```csharp
var counter = client.GetGrain<ICounterGrain>("account:42");
```

```mermaid
flowchart LR
  Client --> Silo
```
"""

[[slides]]
title = "Broken"
body = """
```mermaid
not a diagram @@@
```

Still here with `x++`.
"""
"#;

    fn engine() -> Rc<dyn DiagramEngine> {
        Rc::new(MermaidEngine::new(Settings::default().diagram))
    }

    #[test]
    fn test_parse_deck() {
        let deck = Deck::from_toml(DECK).unwrap();
        assert_eq!(deck.len(), 3);
        assert!(deck.slides[0].is_title_slide());
        assert!(!deck.slides[1].is_title_slide());
        assert_eq!(
            deck.description.as_deref(),
            Some("Orleans from first principles")
        );
    }

    #[test]
    fn test_title_slide_markdown() {
        let deck = Deck::from_toml(DECK).unwrap();
        assert_eq!(
            deck.slides[0].markdown(),
            "# Virtual Actors\n\n## An introduction"
        );
        assert!(deck.slides[1].markdown().starts_with("# Grains\n\n- One activation"));
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let err = Deck::from_toml("title = \"Empty\"").unwrap_err();
        assert!(matches!(err, Error::DeckParse { .. }));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = Deck::from_toml("title = ").unwrap_err();
        assert!(matches!(err, Error::DeckParse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DECK.as_bytes()).unwrap();
        let deck = Deck::load(file.path()).unwrap();
        assert_eq!(deck.title, "Virtual Actors & You");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Deck::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::DeckLoad { .. }));
    }

    #[tokio::test]
    async fn test_presenter_navigation() {
        LocalSet::new()
            .run_until(async {
                let deck = Deck::from_toml(DECK).unwrap();
                let ctx = RenderContext::new(Settings::default(), engine());
                let mut presenter = DeckPresenter::new(deck, ctx);
                assert!(presenter.current().is_none());

                presenter.next().unwrap();
                assert_eq!(presenter.current_index(), Some(0));
                presenter.next().unwrap();
                presenter.next().unwrap();
                presenter.next().unwrap();
                assert_eq!(presenter.current_index(), Some(2));
                presenter.previous().unwrap();
                assert_eq!(presenter.current_index(), Some(1));

                let err = presenter.show(7).unwrap_err();
                assert!(matches!(err, Error::SlideOutOfRange { index: 8, len: 3 }));
                assert_eq!(presenter.current_index(), Some(1));
            })
            .await;
    }

    #[tokio::test]
    async fn test_switching_slides_unmounts_previous() {
        LocalSet::new()
            .run_until(async {
                let deck = Deck::from_toml(DECK).unwrap();
                let ctx = RenderContext::new(Settings::default(), engine());
                let mut presenter = DeckPresenter::new(deck, ctx);

                let view = presenter.show(1).unwrap().tree().diagrams()[0].clone();
                presenter.show(2).unwrap();
                tokio::task::yield_now().await;

                assert_eq!(view.status(), DiagramStatus::Pending);
                presenter.close();
                assert!(presenter.current().is_none());
            })
            .await;
    }

    #[tokio::test]
    async fn test_revisiting_slide_gets_fresh_identities() {
        LocalSet::new()
            .run_until(async {
                let deck = Deck::from_toml(DECK).unwrap();
                let ctx = RenderContext::new(Settings::default(), engine());
                let mut presenter = DeckPresenter::new(deck, ctx);

                let first = presenter.show(1).unwrap().diagrams()[0].id();
                presenter.show(0).unwrap();
                let second = presenter.show(1).unwrap().diagrams()[0].id();
                assert_ne!(first, second);
            })
            .await;
    }

    #[tokio::test]
    async fn test_render_deck_html() {
        let deck = Deck::from_toml(DECK).unwrap();
        let html = LocalSet::new()
            .run_until(render_deck_html(deck, Settings::default(), engine()))
            .await
            .unwrap();

        assert!(html.contains("<title>Virtual Actors &amp; You</title>"));
        assert_eq!(html.matches("<section class=\"slide\"").count(), 3);
        assert!(html.contains("<div class=\"title-slide\">\n<h1>Virtual Actors</h1>\n<h2>An introduction</h2>"));
        assert!(html.contains("<p class=\"presenter\">Webinar Maker</p>"));
        assert!(html.contains("<p class=\"date\">2025-08-19</p>"));
        assert_eq!(html.matches("class=\"title-slide\"").count(), 1);
        assert!(html.contains("<figure class=\"diagram\""));
        assert!(html.contains("<svg"));
        assert!(html.contains("diagram-failed"));
        assert!(!html.contains("diagram-pending\""));
        assert!(html.contains("<code>x++</code>"));
    }

    #[tokio::test]
    async fn test_demo_deck_settles_every_diagram() {
        let deck = Deck::from_toml(include_str!("../../demos/deck.toml")).unwrap();
        assert_eq!(deck.len(), 7);

        LocalSet::new()
            .run_until(async {
                let ctx = RenderContext::new(Settings::default(), engine());
                let mut presenter = DeckPresenter::new(deck, ctx);
                for index in 1..7 {
                    let slide = presenter.show(index).unwrap();
                    slide.settle().await;
                    assert_eq!(slide.stats().highlight_calls, 1);
                    let views = slide.tree().diagrams();
                    assert_eq!(views.len(), 1, "slide {}", index + 1);
                    assert!(views[0].status().is_terminal(), "slide {}", index + 1);
                }
                assert_eq!(presenter.context().conversions_started(), 6);

                // The closing slide is a plain top-down chain.
                let last = presenter.show(6).unwrap();
                last.settle().await;
                let views = last.tree().diagrams();
                assert_eq!(views[0].status(), DiagramStatus::Rendered, "{:?}", views[0].error());
            })
            .await;
    }

    #[tokio::test]
    async fn test_repeated_diagram_keeps_element_ids_unique() {
        let deck = Deck::from_toml(
            r#"
title = "Twice"

[[slides]]
title = "First"
body = """
```mermaid
flowchart LR
A-->B
```
"""

[[slides]]
title = "Second"
body = """
```mermaid
flowchart LR
A-->B
```
"""
"#,
        )
        .unwrap();
        let html = LocalSet::new()
            .run_until(render_deck_html(deck, Settings::default(), engine()))
            .await
            .unwrap();

        assert_eq!(html.matches("<figure class=\"diagram\"").count(), 2);
        let ids: Vec<&str> = html
            .split(" id=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect();
        let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len(), "duplicate element ids: {:?}", ids);
        assert!(unique.contains("diagram-1") && unique.contains("diagram-2"));
    }

    #[tokio::test]
    async fn test_render_single_slide() {
        let deck = Deck::from_toml(DECK).unwrap();
        let html = LocalSet::new()
            .run_until(render_slide_html(deck.clone(), Settings::default(), engine(), 2))
            .await
            .unwrap();
        assert_eq!(html.matches("<section class=\"slide\"").count(), 1);
        assert!(html.contains("Still here with"));

        let err = LocalSet::new()
            .run_until(render_slide_html(deck, Settings::default(), engine(), 9))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SlideOutOfRange { .. }));
    }
}
