//! Data models
//!
//! Shared between the API client and the print pipeline. API response
//! types mirror the Bilheteria/Portaria JSON: every field the server may
//! omit is an `Option`, and MongoDB-style `_id` fields carry an `id`
//! alias so both spellings deserialize.

pub mod participant;
pub mod printer;
pub mod ticket;

// Re-exports
pub use participant::*;
pub use printer::*;
pub use ticket::*;
