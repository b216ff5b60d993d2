//! Slide Export Module
//!
//! This module renders slide trees to HTML: per-slide fragments and a
//! standalone deck document with inlined theme CSS.
//!
//! # Architecture
//!
//! - `html.rs` - Fragment rendering, deck document generation, CSS

pub mod html;

pub use html::{
    generate_deck_document, render_slide_fragment, render_title_slide, DeckPage, FragmentOptions,
};
