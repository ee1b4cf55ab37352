//! HTML to PDF rendering through a headless browser.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use super::transform::HtmlDocument;

/// Upper bound on a single render.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time given to embedded images and fonts to finish loading.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(2000);

/// Browsers tried, in order, when none is configured.
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

/// Errors while rendering a PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no headless browser found; set `browser` in the config file")]
    BrowserNotFound,

    #[error("failed to launch {browser}: {source}")]
    Launch {
        browser: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load document: {0}")]
    Load(String),

    #[error("rendering timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("scratch file I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Turns an HTML document into PDF bytes.
pub trait Renderer {
    fn render(
        &self,
        document: &HtmlDocument,
    ) -> impl Future<Output = Result<Vec<u8>, RenderError>>;
}

impl<T: Renderer + ?Sized> Renderer for &T {
    fn render(
        &self,
        document: &HtmlDocument,
    ) -> impl Future<Output = Result<Vec<u8>, RenderError>> {
        (**self).render(document)
    }
}

/// Renders with a Chromium-family browser in headless print-to-pdf mode.
///
/// Each render writes the HTML into its own scratch directory, which is
/// removed when the render finishes, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    browser: Option<PathBuf>,
    settle: Duration,
    timeout: Duration,
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self {
            browser: None,
            settle: DEFAULT_SETTLE,
            timeout: RENDER_TIMEOUT,
        }
    }
}

impl ChromeRenderer {
    /// Creates a renderer that looks for a browser on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific browser executable.
    pub fn with_browser(mut self, browser: impl Into<PathBuf>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    /// Sets the settle delay passed as the browser's virtual time budget.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Overrides the render timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn browser(&self) -> Result<PathBuf, RenderError> {
        match &self.browser {
            Some(browser) => Ok(browser.clone()),
            None => find_on_path(BROWSER_CANDIDATES).ok_or(RenderError::BrowserNotFound),
        }
    }

    async fn print_to_pdf(&self, browser: &Path, scratch: &Path) -> Result<Vec<u8>, RenderError> {
        let input = scratch.join("document.html");
        let output = scratch.join("document.pdf");

        let mut command = Command::new(browser);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-pdf-header-footer")
            .arg(format!("--virtual-time-budget={}", self.settle.as_millis()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(browser = %browser.display(), "launching headless browser");
        let child = command.spawn().map_err(|source| RenderError::Launch {
            browser: browser.to_path_buf(),
            source,
        })?;

        let finished = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(RenderError::Load(format!(
                "browser exited with {}: {}",
                finished.status,
                stderr.trim()
            )));
        }

        match std::fs::read(&output) {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            Ok(_) => Err(RenderError::Load("browser produced an empty PDF".into())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(RenderError::Load("browser produced no PDF".into()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Renderer for ChromeRenderer {
    async fn render(&self, document: &HtmlDocument) -> Result<Vec<u8>, RenderError> {
        let browser = self.browser()?;
        // Dropping the TempDir removes it; removal errors are ignored
        let scratch = tempfile::Builder::new().prefix("vellum-").tempdir()?;
        std::fs::write(scratch.path().join("document.html"), &document.html)?;

        let result = self.print_to_pdf(&browser, scratch.path()).await;
        cleanup(scratch);

        if let Ok(bytes) = &result {
            info!(title = %document.title, bytes = bytes.len(), "rendered PDF");
        }
        result
    }
}

fn cleanup(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        debug!(path = %path.display(), error = %e, "could not remove scratch directory");
    }
}

/// First of `names` found as an executable file on `PATH`.
fn find_on_path(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}
