//! Guarita Client - HTTP client for the Bilheteria/Portaria API
//!
//! Resolves scanned ticket codes against the remote ticketing API,
//! materializes label images into the local cache, and persists the
//! operator's settings.

pub mod config;
pub mod error;
pub mod http;
pub mod materialize;
pub mod resolve;
pub mod settings;

pub use config::{ClientConfig, Environment};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, Role};
pub use materialize::{Materializer, PrintableImage};
pub use resolve::{ImageSource, Resolution, Resolver};
pub use settings::{SettingsStore, keys};

// Re-export shared types for convenience
pub use shared::{Participant, ReprintResponse, TicketRecord};
