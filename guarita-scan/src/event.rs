//! Scan events

use std::time::Instant;

/// How a code reached the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Qr,
    Ean13,
    Code128,
    Code39,
    Pdf417,
    Aztec,
    DataMatrix,
    /// Typed or pasted by the operator
    Manual,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Qr => "qr",
            ScanKind::Ean13 => "ean-13",
            ScanKind::Code128 => "code-128",
            ScanKind::Code39 => "code-39",
            ScanKind::Pdf417 => "pdf-417",
            ScanKind::Aztec => "aztec",
            ScanKind::DataMatrix => "data-matrix",
            ScanKind::Manual => "manual",
        }
    }
}

/// One detected code, consumed exactly once.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    pub code: String,
    pub kind: ScanKind,
    pub at: Instant,
}

impl ScanEvent {
    pub fn new(code: impl Into<String>, kind: ScanKind) -> Self {
        Self {
            code: code.into(),
            kind,
            at: Instant::now(),
        }
    }
}
