//! Export of a single note to a PDF delivered by mail.
//!
//! The pipeline runs four stages in order: embed resolution, HTML
//! conversion, PDF rendering and delivery. Rendering and delivery are
//! traits so the pipeline can run against fakes.

mod deliver;
mod html;
mod pipeline;
mod render;
mod template;
mod theme;
mod transform;

pub use deliver::{Delivery, DeliveryError, Parcel, SMTPS_PORT, SmtpCredentials, SmtpMailer};
pub use html::{CmarkRenderer, MarkdownRenderer};
pub use pipeline::{
    Assembled, DeliverySettings, ExportError, ExportGuard, ExportLock, ExportReceipt, Exporter,
    NoopReporter, ProgressReporter, Route, StageError, assemble,
};
pub use render::{ChromeRenderer, DEFAULT_SETTLE, RENDER_TIMEOUT, RenderError, Renderer};
pub use template::{DOCUMENT_TEMPLATE, render_document};
pub use theme::{FontSize, stylesheet};
pub use transform::{HtmlDocument, PAGE_BREAK, TransformError, TransformOptions, sanitize, transform};
