//! HTTP client for the Bilheteria/Portaria API
//!
//! Responses are read as text first: non-2xx bodies are sanitized and
//! surfaced to the operator, 2xx bodies are then parsed as JSON.

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use shared::models::{IngressoDoc, Participant, ReprintResponse};
use shared::sanitize;
use tracing::{debug, instrument, warn};
use url::Url;

/// Operator role selecting which token header a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Bilheteria,
    Portaria,
}

impl Role {
    pub fn header_name(&self) -> &'static str {
        match self {
            Role::Bilheteria => "X-Token-Bilheteria",
            Role::Portaria => "X-Token-Portaria",
        }
    }
}

/// HTTP client for the ticketing API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    bilheteria_token: Option<String>,
    portaria_token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.clone(),
            bilheteria_token: config.bilheteria_token.clone(),
            portaria_token: config.portaria_token.clone(),
        }
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token for a role, if the operator supplied one
    pub fn token(&self, role: Role) -> Option<&str> {
        match role {
            Role::Bilheteria => self.bilheteria_token.as_deref(),
            Role::Portaria => self.portaria_token.as_deref(),
        }
    }

    /// Build an API URL from path segments and query pairs.
    ///
    /// Segments and query values are percent-encoded by the `url` crate,
    /// so scanned codes can contain arbitrary bytes.
    pub fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("Invalid base URL: {}", e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidConfig("Base URL cannot be a base".into()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Perform a request and return the raw response body.
    ///
    /// Non-2xx responses map to the error taxonomy: 404 is `NotFound`,
    /// 401/403 is `AccessDenied`, anything else carries the status and a
    /// sanitized body.
    #[instrument(skip(self), fields(method = %method, url = %url))]
    async fn request_text(&self, method: Method, url: Url, role: Role) -> ClientResult<String> {
        let mut request = self.client.request(method, url);
        if let Some(token) = self.token(role) {
            request = request.header(role.header_name(), token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "API request failed");
            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::AccessDenied,
                _ => ClientError::Status {
                    status: status.as_u16(),
                    body: sanitize(&text),
                },
            });
        }

        debug!(bytes = text.len(), "API response received");
        Ok(text)
    }

    // ========== Bilheteria API ==========

    /// Request a ticket reprint for a scanned code.
    ///
    /// `POST /api/bilheteria/reimprimir/{code}`
    pub async fn reprint(&self, code: &str) -> ClientResult<ReprintResponse> {
        let url = self.url(&["api", "bilheteria", "reimprimir", code], &[])?;
        let text = self.request_text(Method::POST, url, Role::Bilheteria).await?;
        serde_json::from_str(&text).map_err(Into::into)
    }

    /// Search participants by CPF.
    ///
    /// `GET /api/bilheteria/participantes/buscar?cpf=...`
    pub async fn participants_by_cpf(&self, cpf: &str) -> ClientResult<Vec<Participant>> {
        let url = self.url(&["api", "bilheteria", "participantes", "buscar"], &[("cpf", cpf)])?;
        let text = self.request_text(Method::GET, url, Role::Bilheteria).await?;
        // an empty or malformed list means no results, not an error
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    /// Fetch participant details (raw, the shape varies per deployment).
    ///
    /// `GET /api/bilheteria/participante/{id}`
    pub async fn participant_detail(&self, id: &str) -> ClientResult<Value> {
        let url = self.url(&["api", "bilheteria", "participante", id], &[])?;
        let text = self.request_text(Method::GET, url, Role::Bilheteria).await?;
        serde_json::from_str(&text).map_err(Into::into)
    }

    // ========== Portaria API ==========

    /// Validate a scanned code at the gate.
    ///
    /// `GET /api/portaria/ingresso/{code}`
    pub async fn gate_lookup(&self, code: &str) -> ClientResult<ReprintResponse> {
        let url = self.url(&["api", "portaria", "ingresso", code], &[])?;
        let text = self.request_text(Method::GET, url, Role::Portaria).await?;
        parse_lookup_body(&text)
    }
}

/// Parse a gate lookup body.
///
/// The endpoint returns either `{ ingresso: {...}, participante: {...} }`
/// or the ingresso document itself at the top level.
pub fn parse_lookup_body(text: &str) -> ClientResult<ReprintResponse> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("ingresso").is_some() {
        return serde_json::from_value(value).map_err(Into::into);
    }
    let ingresso: IngressoDoc = serde_json::from_value(value.clone())?;
    let participante = value
        .get("participante")
        .cloned()
        .and_then(|p| serde_json::from_value(p).ok());
    Ok(ReprintResponse {
        ingresso: Some(ingresso),
        participante,
        ..Default::default()
    })
}
