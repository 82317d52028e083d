//! Ticket (ingresso) models

use serde::{Deserialize, Serialize};

use super::participant::Participant;

/// Ticket document as returned inside API responses.
///
/// The server nests related data inconsistently between endpoints, so
/// every field is optional and extraction happens through
/// [`TicketRecord::from_response`]-style fallbacks in the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngressoDoc {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub evento_id: Option<String>,
    pub evento: Option<EventoDoc>,
    pub qrcode_hash: Option<String>,
    pub qrcode: Option<String>,
    pub layout_preenchido: Option<String>,
    pub participante: Option<Participant>,
}

impl IngressoDoc {
    /// Event id, preferring the flat field over the nested document.
    pub fn evento_id(&self) -> Option<&str> {
        self.evento_id
            .as_deref()
            .or_else(|| self.evento.as_ref().and_then(|e| e.id.as_deref()))
    }

    /// QR code hash, whichever spelling the server used.
    pub fn qrcode_hash(&self) -> Option<&str> {
        self.qrcode_hash.as_deref().or(self.qrcode.as_deref())
    }
}

/// Event document (only the id is ever read from nested form)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventoDoc {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
}

/// Response body of the reprint endpoint.
///
/// `layout_preenchido` and `evento_id` sometimes appear at the top level
/// and sometimes under `ingresso`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReprintResponse {
    pub layout_preenchido: Option<String>,
    pub evento_id: Option<String>,
    pub qrcode_hash: Option<String>,
    pub ingresso: Option<IngressoDoc>,
    pub participante: Option<Participant>,
}

/// Normalized ticket data for one resolve-and-print cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketRecord {
    pub ingresso_id: Option<String>,
    pub evento_id: Option<String>,
    pub qrcode_hash: Option<String>,
    pub layout_url: Option<String>,
}

impl TicketRecord {
    /// Flatten a reprint/lookup response into a ticket record.
    ///
    /// `scanned_code` fills in for missing ids the way the scan screens
    /// do: it is the qrcode hash the operator just read.
    pub fn from_response(response: &ReprintResponse, scanned_code: &str) -> Self {
        let ingresso = response.ingresso.as_ref();

        let ingresso_id = ingresso.and_then(|i| i.id.clone());
        let evento_id = ingresso
            .and_then(|i| i.evento_id().map(str::to_string))
            .or_else(|| response.evento_id.clone());
        let qrcode_hash = ingresso
            .and_then(|i| i.qrcode_hash().map(str::to_string))
            .or_else(|| response.qrcode_hash.clone())
            .or_else(|| {
                if scanned_code.is_empty() {
                    None
                } else {
                    Some(scanned_code.to_string())
                }
            });
        let layout_url = response
            .layout_preenchido
            .clone()
            .or_else(|| ingresso.and_then(|i| i.layout_preenchido.clone()));

        Self {
            ingresso_id,
            evento_id,
            qrcode_hash,
            layout_url,
        }
    }

    /// Deterministic key for the per-ticket cache file.
    ///
    /// Prefers the qrcode hash, falls back to the ingresso id.
    pub fn cache_key(&self) -> Option<&str> {
        self.qrcode_hash.as_deref().or(self.ingresso_id.as_deref())
    }
}
