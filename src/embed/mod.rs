//! Embed resolution: anchor extraction and recursive inlining.

mod anchor;
mod resolver;

pub use anchor::{extract, extract_block, extract_heading};
pub use resolver::{EmbedResolver, MAX_EMBED_DEPTH, ResolveError};
