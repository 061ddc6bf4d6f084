use std::sync::{PoisonError, RwLock};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::{ClientOptions, APPLICATION_ID_HEADER, REST_API_KEY_HEADER};
use crate::error::{Error, Result};

/// Credentials held for the lifetime of a client.
///
/// `app_id` and `api_key` never change after construction. The token is
/// written by a successful authentication and read by every request after.
/// Concurrent writers race; the last one wins.
#[derive(Debug)]
pub(crate) struct Session {
    app_id: String,
    api_key: Option<String>,
    token: RwLock<Option<String>>,
}

impl Session {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            app_id: options.app_id,
            api_key: options.api_key.filter(|key| !key.is_empty()),
            token: RwLock::new(options.token.filter(|token| !token.is_empty())),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores a freshly issued token. An empty token clears the slot, so
    /// requests fall back to the API key.
    pub fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(token).filter(|token| !token.is_empty());
    }

    /// The one credential header to send, if any. A token always beats the
    /// API key.
    pub fn credential(&self) -> Option<(HeaderName, String)> {
        match self.token() {
            Some(token) => Some((AUTHORIZATION, token)),
            None => self
                .api_key
                .clone()
                .map(|key| (REST_API_KEY_HEADER, key)),
        }
    }

    /// Headers for a new request: application id, content type, and the
    /// active credential.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(APPLICATION_ID_HEADER, header_value(APPLICATION_ID_HEADER, &self.app_id)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some((name, value)) = self.credential() {
            let value = header_value(name.clone(), &value)?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

fn header_value(name: HeaderName, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|source| Error::InvalidHeader { name, source })
}
