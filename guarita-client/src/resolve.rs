//! Ticket resolution
//!
//! Turns a scanned code into a [`Resolution`]: the normalized ticket
//! record plus, when one can be derived, a printable image reference.
//!
//! Image extraction is an ordered chain of typed extractors tried until
//! one succeeds:
//! 1. embedded `layout_preenchido` URL, used verbatim;
//! 2. render-by-hash route (`/api/bilheteria/render/{hash}?evento_id=`);
//! 3. legacy per-event render route (`/api/evento/.../render.jpg`).

use crate::http::{HttpClient, Role};
use crate::{ClientError, ClientResult};
use serde_json::Value;
use shared::models::{ReprintResponse, TicketRecord};
use tracing::{debug, info, instrument};

/// Where a printable image reference came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Pre-rendered layout URL embedded in the API response
    Embedded(String),
    /// Render endpoint keyed by qrcode hash
    RenderByHash(String),
    /// Legacy render endpoint keyed by event + ticket ids
    LegacyRender(String),
}

impl ImageSource {
    /// The image URL, whatever tier produced it
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Embedded(url)
            | ImageSource::RenderByHash(url)
            | ImageSource::LegacyRender(url) => url,
        }
    }
}

/// Outcome of resolving a scanned code.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Ticket located. `image` is `None` when the ticket exists but no
    /// printable image could be derived (informational, not an error).
    Found {
        ticket: TicketRecord,
        image: Option<ImageSource>,
    },
    /// The code does not correspond to any ticket
    NotFound,
}

/// Resolver bound to an operator role.
#[derive(Debug, Clone)]
pub struct Resolver {
    http: HttpClient,
    role: Role,
}

impl Resolver {
    pub fn new(http: HttpClient, role: Role) -> Self {
        Self { http, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Resolve a scanned code through the role's endpoint.
    #[instrument(skip(self))]
    pub async fn resolve(&self, code: &str) -> ClientResult<Resolution> {
        let response = match self.role {
            Role::Bilheteria => self.http.reprint(code).await,
            Role::Portaria => self.http.gate_lookup(code).await,
        };

        let response = match response {
            Ok(response) => response,
            Err(ClientError::NotFound) => {
                info!("Ticket not found");
                return Ok(Resolution::NotFound);
            }
            Err(e) => return Err(e),
        };

        Ok(resolve_response(self.http.base_url(), &response, code))
    }

    /// Resolve a ticket from a participant CPF search.
    ///
    /// Takes the first matching participant, fetches its details and
    /// walks the document for an ingresso reference.
    #[instrument(skip(self))]
    pub async fn resolve_by_cpf(&self, cpf: &str) -> ClientResult<Resolution> {
        let participants = self.http.participants_by_cpf(cpf).await?;
        let Some(first) = participants.first() else {
            return Ok(Resolution::NotFound);
        };
        let Some(id) = first.id.as_deref() else {
            return Err(ClientError::InvalidResponse(
                "Participant without id".into(),
            ));
        };

        let detail = self.http.participant_detail(id).await?;
        let Some((ingresso_id, evento_id)) = find_ingresso_ref(&detail) else {
            return Ok(Resolution::Found {
                ticket: TicketRecord::default(),
                image: None,
            });
        };

        let ticket = TicketRecord {
            ingresso_id: Some(ingresso_id),
            evento_id: Some(evento_id),
            ..Default::default()
        };
        let image = resolve_image(self.http.base_url(), &ticket);
        Ok(Resolution::Found { ticket, image })
    }
}

/// Flatten a response and run the extractor chain.
pub fn resolve_response(base_url: &str, response: &ReprintResponse, code: &str) -> Resolution {
    let ticket = TicketRecord::from_response(response, code);
    let image = resolve_image(base_url, &ticket);
    debug!(?image, "image resolution");
    Resolution::Found { ticket, image }
}

/// Run the ordered extractor chain over a ticket record.
pub fn resolve_image(base_url: &str, ticket: &TicketRecord) -> Option<ImageSource> {
    extract_embedded(ticket)
        .or_else(|| extract_render_by_hash(base_url, ticket))
        .or_else(|| extract_legacy_render(base_url, ticket))
}

/// Tier 1: embedded pre-rendered layout, only with a usable scheme.
fn extract_embedded(ticket: &TicketRecord) -> Option<ImageSource> {
    let layout = ticket.layout_url.as_deref()?;
    if layout.starts_with("http://") || layout.starts_with("https://") || layout.starts_with("data:")
    {
        Some(ImageSource::Embedded(layout.to_string()))
    } else {
        None
    }
}

/// Tier 2: render-by-hash route, needs qrcode hash and event id.
fn extract_render_by_hash(base_url: &str, ticket: &TicketRecord) -> Option<ImageSource> {
    let hash = ticket.qrcode_hash.as_deref()?;
    let evento_id = ticket.evento_id.as_deref()?;
    let url = build_url(
        base_url,
        &["api", "bilheteria", "render", hash],
        &[("evento_id", evento_id)],
    )?;
    Some(ImageSource::RenderByHash(url))
}

/// Tier 3: legacy per-event route, needs event and ticket ids.
fn extract_legacy_render(base_url: &str, ticket: &TicketRecord) -> Option<ImageSource> {
    let evento_id = ticket.evento_id.as_deref()?;
    let ingresso_id = ticket.ingresso_id.as_deref()?;
    let url = build_url(
        base_url,
        &["api", "evento", evento_id, "ingresso", ingresso_id, "render.jpg"],
        &[],
    )?;
    Some(ImageSource::LegacyRender(url))
}

fn build_url(base_url: &str, segments: &[&str], query: &[(&str, &str)]) -> Option<String> {
    let mut url = url::Url::parse(base_url).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    for (key, value) in query {
        url.query_pairs_mut().append_pair(key, value);
    }
    Some(url.into())
}

/// Depth-first search for an ingresso reference inside an arbitrarily
/// nested participant document: any object carrying `_id` together with
/// `evento_id` (or a nested `evento._id`) qualifies.
pub fn find_ingresso_ref(value: &Value) -> Option<(String, String)> {
    if let Value::Object(map) = value {
        let id = map.get("_id").and_then(Value::as_str);
        let evento_id = map
            .get("evento_id")
            .and_then(Value::as_str)
            .or_else(|| map.get("evento")?.get("_id")?.as_str());
        if let (Some(id), Some(evento_id)) = (id, evento_id) {
            return Some((id.to_string(), evento_id.to_string()));
        }
    }

    match value {
        Value::Object(map) => map.values().find_map(find_ingresso_ref),
        Value::Array(items) => items.iter().find_map(find_ingresso_ref),
        _ => None,
    }
}
