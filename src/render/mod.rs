//! Slide render pipeline
//!
//! Turns a parsed Markdown document into a render tree. Code nodes are
//! routed by [`dispatch`] into exactly one of inline text, plain block,
//! highlighted block, or diagram; [`builder`] applies the route.

mod builder;
mod dispatch;
mod tree;

pub use builder::{build_render_tree, RenderOptions, RenderStats};
pub use dispatch::{language_tag, route_block, CodeRoute};
pub use tree::{RenderKind, RenderNode};
