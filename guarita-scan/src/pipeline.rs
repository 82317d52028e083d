//! Scan-to-print pipeline
//!
//! One strict linear chain per accepted scan: resolve the code against
//! the API, materialize the label image, dispatch to the print bridge.
//! Every await happens after the session entered `Processing`, and
//! [`PrintPipeline::process`] always finishes the cycle before
//! returning, so scanning is re-enabled on success and on every failure
//! path alike.

use crate::event::ScanEvent;
use crate::haptics::Haptics;
use crate::session::{IgnoreReason, ScanDecision, ScanSession};
use guarita_client::{ClientResult, PrintableImage, Resolution};
use guarita_printer::{PrintBridge, PrintRequest};
use shared::models::{PrinterSettings, TicketRecord};
use shared::sanitize;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Haptic pulse fired for each accepted scan
const VIBRATE_ON_SCAN: Duration = Duration::from_millis(200);

/// Ticket resolution seam, implemented by `guarita_client::Resolver`.
#[async_trait::async_trait]
pub trait TicketResolver: Send + Sync {
    async fn resolve(&self, code: &str) -> ClientResult<Resolution>;
}

/// Image materialization seam, implemented by `guarita_client::Materializer`.
#[async_trait::async_trait]
pub trait ImageMaterializer: Send + Sync {
    async fn materialize(&self, url: &str, key: &str) -> ClientResult<PrintableImage>;
}

/// Printer settings source, read once per cycle.
pub trait SettingsSource: Send + Sync {
    fn printer_settings(&self) -> PrinterSettings;
}

impl SettingsSource for PrinterSettings {
    fn printer_settings(&self) -> PrinterSettings {
        self.clone()
    }
}

/// Which stage a cycle failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Materialize,
    Print,
}

/// Result of one scan cycle, ready for display.
///
/// All message strings are already sanitized.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Scan never entered the pipeline
    Ignored(IgnoreReason),
    /// Label dispatched; carries the bridge's message
    Printed { ticket: TicketRecord, message: String },
    /// Ticket exists but no printable image could be derived -
    /// informational, not an error
    NothingToPrint { ticket: TicketRecord },
    /// The code does not match any ticket
    TicketNotFound,
    /// Cycle aborted; scanning is re-enabled
    Failed { stage: Stage, message: String },
}

/// The scan-to-print pipeline.
pub struct PrintPipeline<R, M, B, S, H> {
    resolver: R,
    materializer: M,
    bridge: B,
    settings: S,
    haptics: H,
}

impl<R, M, B, S, H> PrintPipeline<R, M, B, S, H>
where
    R: TicketResolver,
    M: ImageMaterializer,
    B: PrintBridge,
    S: SettingsSource,
    H: Haptics,
{
    pub fn new(resolver: R, materializer: M, bridge: B, settings: S, haptics: H) -> Self {
        Self {
            resolver,
            materializer,
            bridge,
            settings,
            haptics,
        }
    }

    /// Run one scan event through the pipeline.
    ///
    /// The session decides admission synchronously; after that the cycle
    /// runs to completion and the session always leaves `Processing`.
    #[instrument(skip(self, session, event), fields(kind = event.kind.as_str()))]
    pub async fn process(&self, session: &mut ScanSession, event: ScanEvent) -> CycleOutcome {
        if let ScanDecision::Ignored(reason) = session.accept(&event) {
            return CycleOutcome::Ignored(reason);
        }

        if let Err(e) = self.haptics.vibrate(VIBRATE_ON_SCAN) {
            warn!(error = %e, "haptic feedback unavailable");
        }

        let outcome = self.run_cycle(&event.code).await;
        session.finish_cycle();
        outcome
    }

    async fn run_cycle(&self, code: &str) -> CycleOutcome {
        let resolution = match self.resolver.resolve(code).await {
            Ok(resolution) => resolution,
            Err(e) => {
                return CycleOutcome::Failed {
                    stage: Stage::Resolve,
                    message: sanitize(&e.to_string()),
                };
            }
        };

        let (ticket, image) = match resolution {
            Resolution::NotFound => return CycleOutcome::TicketNotFound,
            Resolution::Found { ticket, image } => match image {
                Some(image) => (ticket, image),
                None => {
                    info!("ticket found, nothing to print");
                    return CycleOutcome::NothingToPrint { ticket };
                }
            },
        };

        let key = ticket.cache_key().unwrap_or(code);
        let printable = match self.materializer.materialize(image.url(), key).await {
            Ok(printable) => printable,
            Err(e) => {
                return CycleOutcome::Failed {
                    stage: Stage::Materialize,
                    message: sanitize(&e.to_string()),
                };
            }
        };

        let settings = self.settings.printer_settings();
        let request = PrintRequest {
            ip_address: settings.ip_address,
            image_uri: printable.as_uri(),
            model: settings.model,
            label_size: settings.label_size,
        };

        match self.bridge.print_image(&request).await {
            Ok(outcome) => {
                info!(status = %outcome.status, "print dispatched");
                CycleOutcome::Printed {
                    ticket,
                    message: sanitize(&outcome.message),
                }
            }
            Err(e) => CycleOutcome::Failed {
                stage: Stage::Print,
                message: sanitize(&e.to_string()),
            },
        }
    }
}
