//! Guarita Scan - the scan-to-print pipeline
//!
//! Sequencing for the check-in workflow: a scan session state machine
//! with duplicate debouncing, and a linear resolve -> materialize ->
//! print pipeline over the seams the other crates implement.

pub mod adapters;
pub mod event;
pub mod haptics;
pub mod pipeline;
pub mod runner;
pub mod session;

pub use event::{ScanEvent, ScanKind};
pub use haptics::{Haptics, NoHaptics};
pub use pipeline::{
    CycleOutcome, ImageMaterializer, PrintPipeline, SettingsSource, Stage, TicketResolver,
};
pub use runner::drive;
pub use session::{
    CameraAccess, DEBOUNCE_WINDOW, IgnoreReason, ScanDecision, ScanSession, SessionError,
    SessionState,
};
