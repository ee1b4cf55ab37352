//! Core types: Document, EmbedReference, Anchor, Stage, PipelineState

mod document;
mod embed;
mod stage;

pub use document::{Document, DocumentKind};
pub use embed::{Anchor, EmbedReference};
pub use stage::{PipelineState, Stage, StageEvent, StageStatus};
