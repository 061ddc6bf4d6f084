use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, warn, Span};

use super::{HttpRequest, Transport};
use crate::error::{Error, Result};

/// Turns one resolved [`HttpRequest`] into parsed JSON.
///
/// Every call is a single attempt: nothing is retried, cached, or timed out
/// here.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends the request and parses whatever comes back as JSON.
    ///
    /// The status code is not inspected; the API answers errors with JSON
    /// documents of its own, and those are returned like any other value.
    ///
    /// ## Errors
    ///
    /// - [`Error::Transport`] if the request could not be sent or the body
    ///   stream broke off.
    /// - [`Error::MissingResponse`] if the transport had no response to give.
    /// - [`Error::Parse`] if the body is not JSON. The raw text is kept.
    #[instrument(
        name = "knack_request",
        skip(self, request),
        fields(
            http.method = tracing::field::Empty,
            http.path = %request.path,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute(&self, mut request: HttpRequest) -> Result<Value> {
        // A body implies POST unless a method other than the default was chosen.
        if request.body.is_some() && request.method == Method::GET {
            request.method = Method::POST;
        }
        Span::current().record("http.method", request.method.as_str());

        let payload = request
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(Error::Serialize)?;

        debug!("dispatching request");
        let response = self
            .transport
            .send(&request, payload)
            .await
            .map_err(Error::Transport)?;
        let Some(mut response) = response else {
            return Err(Error::MissingResponse);
        };
        Span::current().record("http.status_code", response.status);

        let mut buffer = Vec::new();
        while let Some(chunk) = response.body.next_chunk().await.map_err(Error::Transport)? {
            buffer.extend_from_slice(&chunk);
        }
        let text = String::from_utf8_lossy(&buffer).into_owned();

        match serde_json::from_str(&text) {
            Ok(value) => {
                debug!(bytes = buffer.len(), "response parsed");
                Ok(value)
            }
            Err(source) => {
                warn!(error = %source, bytes = buffer.len(), "response body is not JSON");
                Err(Error::Parse { source, body: text })
            }
        }
    }
}
