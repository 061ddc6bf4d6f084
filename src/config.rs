use reqwest::header::HeaderName;
use serde::Deserialize;

/// The host serving the Knack REST API.
pub const API_HOST: &str = "api.knack.com";

/// The API is only ever spoken over TLS.
pub const API_PORT: u16 = 443;

/// Version segment every request path is prefixed with.
pub const API_VERSION: &str = "v1";

/// `X-Knack-Application-Id`, sent on every request.
pub const APPLICATION_ID_HEADER: HeaderName = HeaderName::from_static("x-knack-application-id");

/// `X-Knack-REST-API-Key`, sent when no session token is present.
pub const REST_API_KEY_HEADER: HeaderName = HeaderName::from_static("x-knack-rest-api-key");

/// What a client is constructed from.
///
/// This mirrors the JSON shape applications tend to keep their Knack
/// credentials in, so it can be deserialized directly:
/// ```json
/// { "app_id": "5d1...", "api_key": "c0f..." }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientOptions {
    /// A session token obtained elsewhere. Takes priority over `api_key`.
    #[serde(default)]
    pub token: Option<String>,
    pub app_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ClientOptions {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Default::default()
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}
