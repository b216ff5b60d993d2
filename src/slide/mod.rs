//! Slides
//!
//! [`SlideComponent`] renders one slide and owns the lifetime its diagram
//! conversions are bound to. The deck shell loads a deck and keeps exactly
//! one slide mounted at a time.

mod component;
mod deck;

pub use component::SlideComponent;
pub use deck::{render_deck_html, render_slide_html, Deck, DeckPresenter, SlideSource};
