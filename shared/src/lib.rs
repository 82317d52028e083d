//! Shared types for the Guarita check-in client
//!
//! Common types used across multiple crates: ticket and participant
//! records returned by the Bilheteria/Portaria API, printer settings,
//! and the credential sanitizer applied to all user-facing text.

pub mod models;
pub mod sanitize;

// Re-exports
pub use models::{
    EventoDoc, IngressoDoc, LabelSize, Participant, PrinterModel, PrinterSettings, ReprintResponse,
    TicketRecord,
};
pub use sanitize::sanitize;
