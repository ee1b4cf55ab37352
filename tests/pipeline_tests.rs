//! Export pipeline tests against in-memory collaborators.

use std::cell::RefCell;

use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use vellum::domain::{PipelineState, Stage, StageStatus};
use vellum::export::{
    Delivery, DeliveryError, DeliverySettings, ExportError, ExportLock, Exporter, HtmlDocument,
    Parcel, RenderError, Renderer, SmtpCredentials,
};
use vellum::vault::MemoryVault;

/// Renderer that parks until released, signalling when it starts.
#[derive(Default)]
struct GatedRenderer {
    started: Notify,
    release: Notify,
    html: RefCell<Option<String>>,
}

impl Renderer for GatedRenderer {
    async fn render(&self, document: &HtmlDocument) -> Result<Vec<u8>, RenderError> {
        self.html.replace(Some(document.html.clone()));
        self.started.notify_one();
        self.release.notified().await;
        Ok(b"%PDF-1.7".to_vec())
    }
}

#[derive(Default)]
struct RecordingDelivery {
    sent: RefCell<Vec<Parcel>>,
}

impl Delivery for RecordingDelivery {
    async fn send(
        &self,
        parcel: &Parcel,
        _credentials: &SmtpCredentials,
    ) -> Result<(), DeliveryError> {
        self.sent.borrow_mut().push(parcel.clone());
        Ok(())
    }
}

fn settings() -> DeliverySettings {
    DeliverySettings {
        sender: Some("me@example.com".into()),
        device: Some("reader@kindle.com".into()),
        smtp_host: Some("smtp.example.com".into()),
        smtp_port: Some(465),
        smtp_user: Some("me".into()),
        smtp_password: Some("pw".into()),
    }
}

fn vault() -> MemoryVault {
    MemoryVault::new()
        .with_note(
            "Reading/Essay.md",
            "---\ntitle: \"On Notes: Part 1\"\n---\nIntro\n![[Quotes#^q1]]\n%%draft%%",
        )
        .with_note("Quotes.md", "Noise\nKeep this line ^q1\nMore")
        .with_links("Reading/Essay.md", ["Quotes.md"])
}

#[tokio::test]
async fn second_export_is_rejected_while_first_runs() {
    let vault = vault();
    let renderer = GatedRenderer::default();
    let delivery = RecordingDelivery::default();
    let exporter = Exporter::new(&vault, &renderer, &delivery)
        .with_settings(settings())
        .with_lock(ExportLock::new());

    let mut first_states: Vec<PipelineState> = Vec::new();
    let mut second_states: Vec<PipelineState> = Vec::new();

    let first = exporter.export("Reading/Essay.md", &mut first_states);
    let second = async {
        renderer.started.notified().await;
        let result = exporter.export("Reading/Essay.md", &mut second_states).await;
        renderer.release.notify_one();
        result
    };

    let (first, second) = tokio::join!(first, second);

    assert!(matches!(second, Err(ExportError::Busy)));
    assert!(second_states.is_empty(), "no state machine for a rejected run");

    let receipt = first.unwrap();
    assert_eq!(receipt.filename, "On Notes Part 1.pdf");
    assert!(first_states.last().unwrap().is_complete());

    // The rejected attempt happened while the first run sat in GeneratingPdf
    let generating = first_states
        .iter()
        .filter(|s| s.active() == Some(Stage::GeneratingPdf))
        .count();
    assert_eq!(generating, 1);
    assert_eq!(delivery.sent.borrow().len(), 1);
}

#[tokio::test]
async fn lock_is_free_after_rejection_and_completion() {
    let vault = vault();
    let renderer = GatedRenderer::default();
    let delivery = RecordingDelivery::default();
    let lock = ExportLock::new();
    let exporter = Exporter::new(&vault, &renderer, &delivery)
        .with_settings(settings())
        .with_lock(lock.clone());

    let mut states: Vec<PipelineState> = Vec::new();
    let run = exporter.export("Reading/Essay.md", &mut states);
    let release = async {
        renderer.started.notified().await;
        assert!(lock.is_held());
        renderer.release.notify_one();
    };
    let (result, ()) = tokio::join!(run, release);

    assert!(result.is_ok());
    assert!(!lock.is_held());
}

#[tokio::test]
async fn export_assembles_and_transforms_before_rendering() {
    let vault = vault();
    let renderer = GatedRenderer::default();
    let delivery = RecordingDelivery::default();
    let exporter = Exporter::new(&vault, &renderer, &delivery)
        .with_settings(settings())
        .with_lock(ExportLock::new());

    let mut states: Vec<PipelineState> = Vec::new();
    let run = exporter.export("Reading/Essay.md", &mut states);
    let release = async {
        renderer.started.notified().await;
        renderer.release.notify_one();
    };
    let (result, ()) = tokio::join!(run, release);
    result.unwrap();

    let html = renderer.html.borrow().clone().unwrap();
    assert!(html.contains("<title>On Notes: Part 1</title>"));
    assert!(html.contains("Keep this line"));
    assert!(!html.contains("Noise"));
    assert!(!html.contains("draft"));

    let sent = delivery.sent.borrow();
    assert_eq!(sent[0].subject, "On Notes: Part 1");
    assert_eq!(sent[0].to, "reader@kindle.com");
    assert_eq!(sent[0].bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn every_transition_is_published_in_order() {
    let vault = vault();
    let renderer = GatedRenderer::default();
    let delivery = RecordingDelivery::default();
    let exporter = Exporter::new(&vault, &renderer, &delivery)
        .with_settings(settings())
        .with_lock(ExportLock::new());

    let mut states: Vec<PipelineState> = Vec::new();
    let run = exporter.export("Reading/Essay.md", &mut states);
    let release = async {
        renderer.started.notified().await;
        renderer.release.notify_one();
    };
    let (result, ()) = tokio::join!(run, release);
    result.unwrap();

    // Each state has at most one active stage and earlier stages are done
    for state in &states {
        let statuses: Vec<StageStatus> = state.iter().map(|(_, s)| s).collect();
        let active = statuses.iter().filter(|s| **s == StageStatus::Active).count();
        assert!(active <= 1);
        if let Some(stage) = state.active() {
            assert!(statuses[..stage.index()].iter().all(|s| *s == StageStatus::Done));
            assert!(
                statuses[stage.index() + 1..]
                    .iter()
                    .all(|s| *s == StageStatus::Pending)
            );
        }
    }
    assert_eq!(states.len(), 6);
}
