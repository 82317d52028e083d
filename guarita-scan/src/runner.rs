//! Scan event consumer
//!
//! The camera (or manual input) side produces [`ScanEvent`]s into an
//! mpsc channel; a single consumer task drains it strictly sequentially
//! through the pipeline. Dropping the sender closes the intake; the
//! cycle being processed still runs to completion.

use crate::event::ScanEvent;
use crate::haptics::Haptics;
use crate::pipeline::{CycleOutcome, ImageMaterializer, PrintPipeline, SettingsSource,
    TicketResolver};
use crate::session::ScanSession;
use guarita_printer::PrintBridge;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Drain scan events through the pipeline, forwarding every non-ignored
/// outcome. Returns the session once the intake channel closes.
pub async fn drive<R, M, B, S, H>(
    mut events: mpsc::Receiver<ScanEvent>,
    mut session: ScanSession,
    pipeline: &PrintPipeline<R, M, B, S, H>,
    outcomes: mpsc::Sender<CycleOutcome>,
) -> ScanSession
where
    R: TicketResolver,
    M: ImageMaterializer,
    B: PrintBridge,
    S: SettingsSource,
    H: Haptics,
{
    while let Some(event) = events.recv().await {
        let outcome = pipeline.process(&mut session, event).await;
        if let CycleOutcome::Ignored(reason) = outcome {
            debug!(?reason, "scan ignored");
            continue;
        }
        if outcomes.send(outcome).await.is_err() {
            // nobody is listening for outcomes anymore
            break;
        }
    }
    info!("scan intake closed");
    session
}
