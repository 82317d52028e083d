//! Print bridge façade
//!
//! The seam between the scan pipeline and the printer hardware. The
//! pipeline only sees this trait; [`crate::NetworkBridge`] is the real
//! implementation, tests substitute their own.

use crate::error::PrintResult;
use serde::{Deserialize, Serialize};
use shared::models::{LabelSize, PrinterModel};
use std::time::Duration;

/// One print request: the materialized image plus printer settings.
#[derive(Debug, Clone)]
pub struct PrintRequest {
    pub ip_address: String,
    pub image_uri: String,
    pub model: PrinterModel,
    pub label_size: LabelSize,
}

/// Bridge response for a completed print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintOutcome {
    pub status: String,
    pub message: String,
}

impl PrintOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".into(),
            message: message.into(),
        }
    }
}

/// Availability report for a single printer.
///
/// Unreachable is not an error: the report carries the reason instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingReport {
    pub available: bool,
    pub ip_address: Option<String>,
    pub error: Option<String>,
}

/// A printer found during network discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredPrinter {
    pub ip_address: String,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
}

/// Print bridge contract.
#[async_trait::async_trait]
pub trait PrintBridge: Send + Sync {
    /// Print one label image. Any `Err` is fatal to the calling cycle;
    /// retries are operator-initiated.
    async fn print_image(&self, request: &PrintRequest) -> PrintResult<PrintOutcome>;

    /// Check whether a printer answers at `ip_address`.
    async fn ping_printer(&self, ip_address: &str) -> PingReport;

    /// Search the network for printers. An empty list is a successful
    /// result, not an error.
    async fn discover_printers(&self, timeout: Duration) -> PrintResult<Vec<DiscoveredPrinter>>;
}
