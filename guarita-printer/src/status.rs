//! Brother QL status block parsing
//!
//! QL printers answer with a fixed 32-byte status block: on connect, on
//! `ESC i S`, and after a print job. Layout (the bytes this pipeline
//! reads):
//!
//! - byte 0: print head mark, always `0x80`
//! - byte 1: block size, always `0x20`
//! - byte 2: `'B'` (Brother)
//! - byte 4: model code
//! - bytes 8-9: error information 1 and 2
//! - byte 10: media width in mm
//! - byte 11: media type

use crate::error::{PrintError, PrintResult};
use shared::models::PrinterModel;

/// Status block length in bytes
pub const STATUS_LEN: usize = 32;

const HEAD_MARK: u8 = 0x80;
const BLOCK_SIZE: u8 = 0x20;

/// Media type reported in byte 11
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    None,
    ContinuousRoll,
    DieCutLabel,
    Unknown(u8),
}

impl From<u8> for MediaType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => MediaType::None,
            0x0A => MediaType::DieCutLabel,
            0x0B => MediaType::ContinuousRoll,
            other => MediaType::Unknown(other),
        }
    }
}

/// Parsed printer status block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterStatus {
    pub model: Option<PrinterModel>,
    pub error1: u8,
    pub error2: u8,
    pub media_width_mm: u8,
    pub media_type: MediaType,
}

impl PrinterStatus {
    /// Parse a raw status block.
    pub fn parse(block: &[u8]) -> PrintResult<Self> {
        if block.len() < STATUS_LEN {
            return Err(PrintError::Protocol(format!(
                "Short status block: {} bytes",
                block.len()
            )));
        }
        if block[0] != HEAD_MARK || block[1] != BLOCK_SIZE {
            return Err(PrintError::Protocol(format!(
                "Not a status block: {:02X} {:02X}",
                block[0], block[1]
            )));
        }

        Ok(Self {
            model: model_from_code(block[4]),
            error1: block[8],
            error2: block[9],
            media_width_mm: block[10],
            media_type: MediaType::from(block[11]),
        })
    }

    /// No error bits set
    pub fn is_ready(&self) -> bool {
        self.error1 == 0 && self.error2 == 0
    }

    /// Human-readable error summary for the reported error bits
    pub fn error_summary(&self) -> String {
        let mut problems = Vec::new();
        if self.error1 & 0x01 != 0 {
            problems.push("no media");
        }
        if self.error1 & 0x04 != 0 {
            problems.push("cutter jam");
        }
        if self.error1 & 0x10 != 0 {
            problems.push("printer in use");
        }
        if self.error2 & 0x01 != 0 {
            problems.push("wrong media");
        }
        if self.error2 & 0x10 != 0 {
            problems.push("cover open");
        }
        if problems.is_empty() {
            format!("error bits {:02X}/{:02X}", self.error1, self.error2)
        } else {
            problems.join(", ")
        }
    }
}

/// Map the status model code to a known model.
fn model_from_code(code: u8) -> Option<PrinterModel> {
    match code {
        0x4F => Some(PrinterModel::Ql820Nwb),
        0x43 => Some(PrinterModel::Ql810W),
        0x44 => Some(PrinterModel::Ql800),
        0x52 => Some(PrinterModel::Ql1110Nwb),
        0x51 => Some(PrinterModel::Ql1100),
        _ => None,
    }
}
