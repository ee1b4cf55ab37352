//! The staged export pipeline: resolve, convert, render, deliver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use serde::Serialize;
use thiserror::Error;
use tokio::task::yield_now;
use tracing::{error, info, warn};

use super::deliver::{Delivery, DeliveryError, Parcel, SmtpCredentials};
use super::html::CmarkRenderer;
use super::render::{RenderError, Renderer};
use super::transform::{TransformError, TransformOptions, transform};
use crate::domain::{Document, PipelineState, Stage, StageEvent};
use crate::embed::{EmbedResolver, ResolveError};
use crate::infra::{attachment_name, frontmatter_title, split_frontmatter};
use crate::vault::Vault;

static GLOBAL_LOCK: LazyLock<ExportLock> = LazyLock::new(ExportLock::new);

/// Error raised inside a stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Deliver(#[from] DeliveryError),
}

/// Why an export did not complete.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Another export holds the lock. The running export is unaffected.
    #[error("an export is already in progress")]
    Busy,

    #[error("missing setting '{0}'; add it to the config file")]
    MissingSetting(&'static str),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("only markdown notes can be exported: {0}")]
    NotMarkdown(String),

    #[error("Failed to send to Kindle: {cause}")]
    Stage { stage: Stage, cause: StageError },
}

impl ExportError {
    /// The stage that failed, for stage errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ExportError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Receives the pipeline state after every transition.
pub trait ProgressReporter {
    fn on_update(&mut self, state: &PipelineState);
}

/// A reporter that ignores all updates.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_update(&mut self, _state: &PipelineState) {}
}

/// Records every published state, oldest first.
impl ProgressReporter for Vec<PipelineState> {
    fn on_update(&mut self, state: &PipelineState) {
        self.push(*state);
    }
}

/// The in-flight flag that allows one export at a time.
///
/// Clones share the same flag. The CLI uses [`ExportLock::global`] so every
/// export in the process contends for one flag.
#[derive(Debug, Clone, Default)]
pub struct ExportLock {
    in_flight: Arc<AtomicBool>,
}

impl ExportLock {
    /// Creates an independent, unheld lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide lock.
    pub fn global() -> Self {
        GLOBAL_LOCK.clone()
    }

    /// True while an export holds the lock.
    pub fn is_held(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Takes the lock, or returns `None` if it is already held.
    pub fn try_acquire(&self) -> Option<ExportGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }
}

/// Releases the [`ExportLock`] on drop.
#[derive(Debug)]
pub struct ExportGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Addresses and SMTP login, as configured. Every field is required.
#[derive(Debug, Clone, Default)]
pub struct DeliverySettings {
    pub sender: Option<String>,
    pub device: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

/// Validated delivery settings.
#[derive(Debug, Clone)]
pub struct Route {
    pub from: String,
    pub to: String,
    pub credentials: SmtpCredentials,
}

impl DeliverySettings {
    /// Checks that every setting is present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::MissingSetting` naming the first missing field.
    pub fn validate(&self) -> Result<Route, ExportError> {
        fn required(value: &Option<String>, name: &'static str) -> Result<String, ExportError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ExportError::MissingSetting(name))
        }

        let from = required(&self.sender, "sender")?;
        let to = required(&self.device, "device")?;
        let host = required(&self.smtp_host, "smtp.host")?;
        let port = self
            .smtp_port
            .filter(|p| *p != 0)
            .ok_or(ExportError::MissingSetting("smtp.port"))?;
        let user = required(&self.smtp_user, "smtp.user")?;
        // Passwords may legitimately contain surrounding spaces
        let password = self
            .smtp_password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(ExportError::MissingSetting("smtp.password"))?;

        Ok(Route {
            from,
            to,
            credentials: SmtpCredentials {
                host,
                port,
                user,
                password,
            },
        })
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    pub title: String,
    pub filename: String,
    pub bytes: usize,
    pub recipient: String,
}

/// A note's body with embeds resolved, plus its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub title: String,
    pub markdown: String,
}

/// Reads `document` and resolves all of its embeds.
///
/// The title comes from a frontmatter `title` field when present, else the
/// file name without extension.
pub fn assemble<V: Vault + ?Sized>(
    vault: &V,
    document: &Document,
) -> Result<Assembled, ResolveError> {
    let text = vault.read_text(document)?;
    let (frontmatter, body) = split_frontmatter(&text);
    let title = frontmatter
        .and_then(frontmatter_title)
        .unwrap_or_else(|| document.basename().to_string());

    let markdown = EmbedResolver::new(vault).resolve(body, document)?;
    Ok(Assembled { title, markdown })
}

/// Tracks one run's state and publishes every change.
struct RunState<'p, P: ?Sized> {
    state: PipelineState,
    progress: &'p mut P,
}

impl<P: ProgressReporter + ?Sized> RunState<'_, P> {
    fn apply(&mut self, event: StageEvent) {
        self.state = self.state.apply(event);
        self.progress.on_update(&self.state);
    }

    /// Moves to the next stage and lets pending output flush.
    async fn enter_next(&mut self) {
        self.apply(StageEvent::Advance);
        yield_now().await;
    }
}

/// Runs exports of vault notes to a device.
///
/// # Example
///
/// ```no_run
/// use vellum::export::{ChromeRenderer, DeliverySettings, Exporter, NoopReporter, SmtpMailer};
/// use vellum::vault::FsVault;
///
/// # async fn run() -> anyhow::Result<()> {
/// let vault = FsVault::open("notes")?;
/// let settings = DeliverySettings {
///     sender: Some("me@example.com".into()),
///     device: Some("me@kindle.com".into()),
///     smtp_host: Some("smtp.example.com".into()),
///     smtp_port: Some(587),
///     smtp_user: Some("me".into()),
///     smtp_password: Some("secret".into()),
/// };
/// let exporter = Exporter::new(&vault, ChromeRenderer::new(), SmtpMailer).with_settings(settings);
/// let receipt = exporter.export("Reading.md", &mut NoopReporter).await?;
/// println!("sent {}", receipt.filename);
/// # Ok(())
/// # }
/// ```
pub struct Exporter<'a, V: ?Sized, R, D> {
    vault: &'a V,
    renderer: R,
    delivery: D,
    options: TransformOptions,
    settings: DeliverySettings,
    lock: ExportLock,
}

impl<'a, V, R, D> Exporter<'a, V, R, D>
where
    V: Vault + ?Sized,
    R: Renderer,
    D: Delivery,
{
    /// Creates an exporter with default options, empty settings and the
    /// process-wide lock.
    pub fn new(vault: &'a V, renderer: R, delivery: D) -> Self {
        Self {
            vault,
            renderer,
            delivery,
            options: TransformOptions::default(),
            settings: DeliverySettings::default(),
            lock: ExportLock::global(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_settings(mut self, settings: DeliverySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_lock(mut self, lock: ExportLock) -> Self {
        self.lock = lock;
        self
    }

    /// Exports the note at `path` and mails it to the configured device.
    ///
    /// Preconditions (lock, settings, document) are checked before any stage
    /// starts; their failures never publish a state. After that, `progress`
    /// sees every stage transition. The first stage error stops the run, marks
    /// that stage failed and is returned as `ExportError::Stage`.
    pub async fn export<P: ProgressReporter + ?Sized>(
        &self,
        path: &str,
        progress: &mut P,
    ) -> Result<ExportReceipt, ExportError> {
        let Some(_guard) = self.lock.try_acquire() else {
            warn!(path, "export requested while another is running");
            return Err(ExportError::Busy);
        };

        let route = self.settings.validate()?;
        let document = self
            .vault
            .resolve_path(path)
            .ok_or_else(|| ExportError::DocumentNotFound(path.to_string()))?;
        if !document.is_markdown() {
            return Err(ExportError::NotMarkdown(document.path().to_string()));
        }

        info!(document = %document, to = %route.to, "starting export");
        let mut run = RunState {
            state: PipelineState::new(),
            progress,
        };
        run.progress.on_update(&run.state);
        yield_now().await;

        match self.run_stages(&document, &route, &mut run).await {
            Ok(receipt) => {
                run.apply(StageEvent::Finish);
                info!(file = %receipt.filename, bytes = receipt.bytes, "export complete");
                Ok(receipt)
            }
            Err(cause) => {
                let stage = run.state.active().unwrap_or(Stage::ResolvingEmbeds);
                run.apply(StageEvent::Fail);
                error!(%stage, error = %cause, "export failed");
                Err(ExportError::Stage { stage, cause })
            }
        }
    }

    async fn run_stages<P: ProgressReporter + ?Sized>(
        &self,
        document: &Document,
        route: &Route,
        run: &mut RunState<'_, P>,
    ) -> Result<ExportReceipt, StageError> {
        run.enter_next().await;
        let assembled = assemble(self.vault, document)?;
        yield_now().await;

        run.enter_next().await;
        let html = transform(
            &assembled.markdown,
            &assembled.title,
            &self.options,
            &CmarkRenderer,
        )?;
        yield_now().await;

        run.enter_next().await;
        let pdf = self.renderer.render(&html).await?;
        yield_now().await;

        run.enter_next().await;
        let parcel = Parcel {
            filename: attachment_name(&assembled.title),
            subject: assembled.title.clone(),
            from: route.from.clone(),
            to: route.to.clone(),
            bytes: pdf,
        };
        self.delivery.send(&parcel, &route.credentials).await?;

        Ok(ExportReceipt {
            title: assembled.title,
            filename: parcel.filename,
            bytes: parcel.bytes.len(),
            recipient: parcel.to,
        })
    }
}
