//! slidemark
//!
//! Renders Markdown slides into HTML. Fenced code is routed to plain,
//! syntax-highlighted, or diagram rendering; diagrams convert asynchronously
//! on a single-threaded runtime, each bound to the lifetime of the slide
//! that mounted it.

pub mod cli;
pub mod config;
pub mod diagram;
pub mod error;
pub mod export;
pub mod markdown;
pub mod render;
pub mod slide;
