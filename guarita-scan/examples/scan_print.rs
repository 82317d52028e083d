// guarita-scan/examples/scan_print.rs
// Resolve a ticket code and print it, end to end

use guarita_client::{ClientConfig, Materializer, Resolver, Role, SettingsStore};
use guarita_printer::NetworkBridge;
use guarita_scan::{
    CameraAccess, CycleOutcome, NoHaptics, PrintPipeline, ScanEvent, ScanKind, ScanSession, drive,
};

struct HeadlessCamera;

#[async_trait::async_trait]
impl CameraAccess for HeadlessCamera {
    async fn has_permission(&self) -> bool {
        true
    }
    async fn request_permission(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <api_base_url> <ticket_code>", args[0]);
        println!("  Example: {} http://192.168.0.10 abc123", args[0]);
        return Ok(());
    }

    let base_url = &args[1];
    let code = &args[2];

    let settings_path = std::env::var("GUARITA_SETTINGS_PATH")
        .unwrap_or_else(|_| "./guarita".to_string());
    let store = SettingsStore::new(&settings_path, "settings.json");

    let config = ClientConfig::new(base_url);
    let config = match store.bilheteria_token() {
        Some(token) => config.with_bilheteria_token(token),
        None => config,
    };

    let resolver = Resolver::new(config.build_http_client(), Role::Bilheteria);
    let materializer = Materializer::new(
        std::env::temp_dir().join("guarita-cache"),
        store.bilheteria_token(),
    );
    let bridge = NetworkBridge::new();

    let printer = store.printer_settings();
    tracing::info!(ip = %printer.ip_address, model = %printer.model, "printer configured");

    let pipeline = PrintPipeline::new(resolver, materializer, bridge, store, NoHaptics);

    let mut session = ScanSession::new();
    session.open(&HeadlessCamera).await?;

    let (event_tx, event_rx) = tokio::sync::mpsc::channel(4);
    let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::channel(4);

    event_tx.send(ScanEvent::new(code, ScanKind::Manual)).await?;
    drop(event_tx);

    let consumer = drive(event_rx, session, &pipeline, outcome_tx);
    let ((), _session) = tokio::join!(
        async {
            while let Some(outcome) = outcome_rx.recv().await {
                match outcome {
                    CycleOutcome::Printed { message, .. } => {
                        tracing::info!("print dispatched: {}", message)
                    }
                    CycleOutcome::NothingToPrint { ticket } => {
                        tracing::warn!(?ticket, "ticket found, no printable image")
                    }
                    CycleOutcome::TicketNotFound => tracing::warn!("ticket not found"),
                    CycleOutcome::Failed { stage, message } => {
                        tracing::error!(?stage, "cycle failed: {}", message)
                    }
                    CycleOutcome::Ignored(_) => {}
                }
            }
        },
        consumer
    );

    Ok(())
}
