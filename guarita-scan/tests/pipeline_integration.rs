// guarita-scan/tests/pipeline_integration.rs
// End-to-end pipeline behavior with fake seams

use guarita_client::resolve::resolve_response;
use guarita_client::{ClientError, ClientResult, PrintableImage, Resolution};
use guarita_printer::{
    DiscoveredPrinter, PingReport, PrintBridge, PrintError, PrintOutcome, PrintRequest, PrintResult,
};
use guarita_scan::{
    CameraAccess, CycleOutcome, ImageMaterializer, NoHaptics, PrintPipeline, ScanEvent, ScanKind,
    ScanSession, Stage, TicketResolver, drive,
};
use shared::models::{PrinterSettings, TicketRecord};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Granted;

#[async_trait::async_trait]
impl CameraAccess for Granted {
    async fn has_permission(&self) -> bool {
        true
    }
    async fn request_permission(&self) -> bool {
        true
    }
}

/// Replays a canned API body through the real extraction chain.
struct FakeResolver {
    base_url: String,
    body: Option<String>,
    calls: AtomicUsize,
}

impl FakeResolver {
    fn with_body(body: &str) -> Self {
        Self {
            base_url: "http://10.0.0.1".into(),
            body: Some(body.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn not_found() -> Self {
        Self {
            base_url: "http://10.0.0.1".into(),
            body: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TicketResolver for &FakeResolver {
    async fn resolve(&self, code: &str) -> ClientResult<Resolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => {
                let response = serde_json::from_str(body)
                    .map_err(|_| ClientError::InvalidResponse("bad canned body".into()))?;
                Ok(resolve_response(&self.base_url, &response, code))
            }
            None => Ok(Resolution::NotFound),
        }
    }
}

/// Fails every resolve with an API error carrying a secret.
struct FailingResolver;

#[async_trait::async_trait]
impl TicketResolver for FailingResolver {
    async fn resolve(&self, _code: &str) -> ClientResult<Resolution> {
        Err(ClientError::Status {
            status: 500,
            // pre-sanitization happens in the real client; the pipeline
            // must still sanitize whatever reaches it
            body: format!("leaked {}", "Z".repeat(40)),
        })
    }
}

/// Passes URLs through untouched, like the no-token fallback.
struct PassthroughMaterializer;

#[async_trait::async_trait]
impl ImageMaterializer for PassthroughMaterializer {
    async fn materialize(&self, url: &str, _key: &str) -> ClientResult<PrintableImage> {
        Ok(PrintableImage::Remote(url.to_string()))
    }
}

/// Simulates a download rejected by the server.
struct RejectedDownload;

#[async_trait::async_trait]
impl ImageMaterializer for RejectedDownload {
    async fn materialize(&self, _url: &str, _key: &str) -> ClientResult<PrintableImage> {
        Err(ClientError::ImageUnavailable("Download status 403".into()))
    }
}

/// Records every print request.
#[derive(Default)]
struct RecordingBridge {
    requests: Mutex<Vec<PrintRequest>>,
}

impl RecordingBridge {
    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_uri(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.image_uri.clone())
    }
}

#[async_trait::async_trait]
impl PrintBridge for &RecordingBridge {
    async fn print_image(&self, request: &PrintRequest) -> PrintResult<PrintOutcome> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(PrintOutcome::success("Print job completed successfully"))
    }

    async fn ping_printer(&self, ip_address: &str) -> PingReport {
        PingReport {
            available: true,
            ip_address: Some(ip_address.to_string()),
            error: None,
        }
    }

    async fn discover_printers(&self, _timeout: Duration) -> PrintResult<Vec<DiscoveredPrinter>> {
        Ok(Vec::new())
    }
}

/// Bridge that always fails.
struct BrokenBridge;

#[async_trait::async_trait]
impl PrintBridge for BrokenBridge {
    async fn print_image(&self, _request: &PrintRequest) -> PrintResult<PrintOutcome> {
        Err(PrintError::Connection("192.168.0.90:9100: refused".into()))
    }

    async fn ping_printer(&self, _ip: &str) -> PingReport {
        PingReport {
            available: false,
            ip_address: None,
            error: Some("broken".into()),
        }
    }

    async fn discover_printers(&self, _timeout: Duration) -> PrintResult<Vec<DiscoveredPrinter>> {
        Ok(Vec::new())
    }
}

fn settings() -> PrinterSettings {
    PrinterSettings {
        ip_address: "192.168.0.90".into(),
        ..Default::default()
    }
}

async fn open_session() -> ScanSession {
    let mut session = ScanSession::new();
    session.open(&Granted).await.unwrap();
    session
}

#[tokio::test]
async fn test_scan_scenario_prints_render_url_once() {
    let resolver = FakeResolver::with_body(r#"{"ingresso":{"_id":"t1","evento_id":"e1"}}"#);
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(
        &resolver,
        PassthroughMaterializer,
        &bridge,
        settings(),
        NoHaptics,
    );
    let mut session = open_session().await;

    let outcome = pipeline
        .process(&mut session, ScanEvent::new("abc123", ScanKind::Qr))
        .await;

    let CycleOutcome::Printed { ticket, message } = outcome else {
        panic!("expected Printed, got {:?}", outcome);
    };
    assert_eq!(ticket.ingresso_id.as_deref(), Some("t1"));
    assert_eq!(message, "Print job completed successfully");
    assert_eq!(bridge.count(), 1);
    assert_eq!(
        bridge.last_uri().as_deref(),
        Some("http://10.0.0.1/api/bilheteria/render/abc123?evento_id=e1")
    );
}

#[tokio::test]
async fn test_duplicate_scan_resolves_once() {
    let resolver = FakeResolver::with_body(r#"{"ingresso":{"_id":"t1","evento_id":"e1"}}"#);
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(
        &resolver,
        PassthroughMaterializer,
        &bridge,
        settings(),
        NoHaptics,
    );
    let mut session = open_session().await;

    // the same code twice within one second
    let first = pipeline
        .process(&mut session, ScanEvent::new("abc123", ScanKind::Qr))
        .await;
    let second = pipeline
        .process(&mut session, ScanEvent::new("abc123", ScanKind::Qr))
        .await;

    assert!(matches!(first, CycleOutcome::Printed { .. }));
    assert!(matches!(second, CycleOutcome::Ignored(_)));
    assert_eq!(resolver.calls(), 1);
    assert_eq!(bridge.count(), 1);
}

#[tokio::test]
async fn test_rejected_download_never_reaches_bridge() {
    let resolver = FakeResolver::with_body(r#"{"ingresso":{"_id":"t1","evento_id":"e1"}}"#);
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(&resolver, RejectedDownload, &bridge, settings(), NoHaptics);
    let mut session = open_session().await;

    let outcome = pipeline
        .process(&mut session, ScanEvent::new("abc123", ScanKind::Qr))
        .await;

    let CycleOutcome::Failed { stage, .. } = outcome else {
        panic!("expected Failed");
    };
    assert_eq!(stage, Stage::Materialize);
    assert_eq!(bridge.count(), 0);
    // scanning is re-enabled after the failure
    assert_eq!(session.state(), guarita_scan::SessionState::Scanning);
}

#[tokio::test]
async fn test_ticket_without_image_is_informational() {
    // ticket found, but no ids to build any render URL from
    let resolver = FakeResolver::with_body(r#"{"ingresso":{"_id":"t1"}}"#);
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(
        &resolver,
        PassthroughMaterializer,
        &bridge,
        settings(),
        NoHaptics,
    );
    let mut session = open_session().await;

    let outcome = pipeline
        .process(&mut session, ScanEvent::new("c1", ScanKind::Qr))
        .await;

    let CycleOutcome::NothingToPrint { ticket } = outcome else {
        panic!("expected NothingToPrint, got {:?}", outcome);
    };
    assert_eq!(ticket.ingresso_id.as_deref(), Some("t1"));
    assert_eq!(bridge.count(), 0);
}

#[tokio::test]
async fn test_unknown_code_reports_not_found() {
    let resolver = FakeResolver::not_found();
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(
        &resolver,
        PassthroughMaterializer,
        &bridge,
        settings(),
        NoHaptics,
    );
    let mut session = open_session().await;

    let outcome = pipeline
        .process(&mut session, ScanEvent::new("nope", ScanKind::Manual))
        .await;
    assert!(matches!(outcome, CycleOutcome::TicketNotFound));
    assert_eq!(bridge.count(), 0);
}

#[tokio::test]
async fn test_resolver_failure_is_sanitized() {
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(
        FailingResolver,
        PassthroughMaterializer,
        &bridge,
        settings(),
        NoHaptics,
    );
    let mut session = open_session().await;

    let outcome = pipeline
        .process(&mut session, ScanEvent::new("c1", ScanKind::Qr))
        .await;

    let CycleOutcome::Failed { stage, message } = outcome else {
        panic!("expected Failed");
    };
    assert_eq!(stage, Stage::Resolve);
    assert!(message.contains("500"));
    assert!(!message.contains(&"Z".repeat(40)));
}

#[tokio::test]
async fn test_bridge_failure_aborts_cycle() {
    let resolver = FakeResolver::with_body(r#"{"ingresso":{"_id":"t1","evento_id":"e1"}}"#);
    let pipeline = PrintPipeline::new(
        &resolver,
        PassthroughMaterializer,
        BrokenBridge,
        settings(),
        NoHaptics,
    );
    let mut session = open_session().await;

    let outcome = pipeline
        .process(&mut session, ScanEvent::new("abc123", ScanKind::Qr))
        .await;

    let CycleOutcome::Failed { stage, .. } = outcome else {
        panic!("expected Failed");
    };
    assert_eq!(stage, Stage::Print);
    // no automatic retry: one resolve, one failed print, session scanning again
    assert_eq!(resolver.calls(), 1);
    assert_eq!(session.state(), guarita_scan::SessionState::Scanning);
}

#[tokio::test]
async fn test_drive_consumes_events_sequentially() {
    let resolver = FakeResolver::with_body(r#"{"ingresso":{"_id":"t1","evento_id":"e1"}}"#);
    let bridge = RecordingBridge::default();
    let pipeline = PrintPipeline::new(
        &resolver,
        PassthroughMaterializer,
        &bridge,
        settings(),
        NoHaptics,
    );
    let session = open_session().await;

    let (event_tx, event_rx) = tokio::sync::mpsc::channel(16);
    let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::channel(16);

    // two distinct codes and one duplicate
    event_tx.send(ScanEvent::new("aaa", ScanKind::Qr)).await.unwrap();
    event_tx.send(ScanEvent::new("aaa", ScanKind::Qr)).await.unwrap();
    event_tx.send(ScanEvent::new("bbb", ScanKind::Qr)).await.unwrap();
    drop(event_tx);

    let session = drive(event_rx, session, &pipeline, outcome_tx).await;

    let mut printed = 0;
    while let Some(outcome) = outcome_rx.recv().await {
        assert!(matches!(outcome, CycleOutcome::Printed { .. }));
        printed += 1;
    }
    // the duplicate never produced an outcome
    assert_eq!(printed, 2);
    assert_eq!(resolver.calls(), 2);
    assert_eq!(session.state(), guarita_scan::SessionState::Scanning);
}
