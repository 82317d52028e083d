//! # guarita-printer
//!
//! Brother QL label printing over the network - the print bridge behind
//! the scan-to-print pipeline.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - QL raster job building (image decode, resize, 1bpp threshold)
//! - QL status block parsing
//! - Raw TCP printing (port 9100), ping and network discovery
//!
//! What to print (ticket resolution, image download) stays in
//! `guarita-client`; sequencing stays in `guarita-scan`.
//!
//! ## Example
//!
//! ```ignore
//! use guarita_printer::{NetworkBridge, PrintBridge, PrintRequest};
//! use shared::models::{LabelSize, PrinterModel};
//!
//! let bridge = NetworkBridge::new();
//! let outcome = bridge
//!     .print_image(&PrintRequest {
//!         ip_address: "192.168.1.100".into(),
//!         image_uri: "file:///tmp/ticket.jpg".into(),
//!         model: PrinterModel::Ql820Nwb,
//!         label_size: LabelSize::DieCutW62H100,
//!     })
//!     .await?;
//! println!("{}", outcome.message);
//! ```

mod bridge;
mod error;
mod network;
mod raster;
mod status;

// Re-exports
pub use bridge::{DiscoveredPrinter, PingReport, PrintBridge, PrintOutcome, PrintRequest};
pub use error::{PrintError, PrintResult};
pub use network::NetworkBridge;
pub use raster::{build_raster_job, load_image_uri};
pub use status::{MediaType, PrinterStatus, STATUS_LEN};
