//! Client configuration

/// Backend environment selected by the operator.
///
/// Stored under the `api_env` settings key with the same spellings the
/// mobile app used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Parse the persisted value; anything unrecognized means development.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client configuration for connecting to the ticketing API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://192.168.0.10")
    pub base_url: String,

    /// Box-office operator token (sent as `X-Token-Bilheteria`)
    pub bilheteria_token: Option<String>,

    /// Gate operator token (sent as `X-Token-Portaria`)
    pub portaria_token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bilheteria_token: None,
            portaria_token: None,
            timeout: 10,
        }
    }

    /// Set the box-office operator token
    pub fn with_bilheteria_token(mut self, token: impl Into<String>) -> Self {
        self.bilheteria_token = Some(token.into());
        self
    }

    /// Set the gate operator token
    pub fn with_portaria_token(mut self, token: impl Into<String>) -> Self {
        self.portaria_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
