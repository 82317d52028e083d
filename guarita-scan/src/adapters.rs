//! Pipeline seam implementations for the real client

use crate::pipeline::{ImageMaterializer, SettingsSource, TicketResolver};
use guarita_client::{ClientResult, Materializer, PrintableImage, Resolution, Resolver,
    SettingsStore};
use shared::models::PrinterSettings;

#[async_trait::async_trait]
impl TicketResolver for Resolver {
    async fn resolve(&self, code: &str) -> ClientResult<Resolution> {
        Resolver::resolve(self, code).await
    }
}

#[async_trait::async_trait]
impl ImageMaterializer for Materializer {
    async fn materialize(&self, url: &str, key: &str) -> ClientResult<PrintableImage> {
        Materializer::materialize(self, url, key).await
    }
}

impl SettingsSource for SettingsStore {
    fn printer_settings(&self) -> PrinterSettings {
        SettingsStore::printer_settings(self)
    }
}
