use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use super::HttpRequest;
use crate::error::TransportError;

/// Issues a single HTTP request and hands back the response as a stream of
/// chunks.
///
/// Implementations are expected to follow redirects on their own. Returning
/// `Ok(None)` signals that the request went out but nothing readable came
/// back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &HttpRequest,
        payload: Option<String>,
    ) -> Result<Option<HttpResponse>, TransportError>;
}

/// A response body, read incrementally.
#[async_trait]
pub trait ResponseBody: Send {
    /// The next chunk in arrival order, or `None` once the stream has ended.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError>;
}

pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn ResponseBody>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// The production transport, backed by `reqwest`.
///
/// `reqwest` follows up to ten redirects by default, which is all we need.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    scheme: &'static str,
}

impl ReqwestTransport {
    /// Speaks HTTPS, as the Knack API requires.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wraps an already configured client (proxies, custom roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            scheme: "https",
        }
    }

    /// Speaks plain HTTP. Only useful against local endpoints such as mock
    /// servers.
    pub fn plaintext() -> Self {
        Self {
            client: reqwest::Client::new(),
            scheme: "http",
        }
    }

    fn url(&self, request: &HttpRequest) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}://{}:{}{}",
            self.scheme, request.host, request.port, request.path
        ))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &HttpRequest,
        payload: Option<String>,
    ) -> Result<Option<HttpResponse>, TransportError> {
        let url = self.url(request)?;
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(payload) = payload {
            builder = builder.body(payload);
        }

        let response = builder.send().await?;
        Ok(Some(HttpResponse {
            status: response.status().as_u16(),
            body: Box::new(ReqwestBody(response)),
        }))
    }
}

struct ReqwestBody(reqwest::Response);

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        Ok(self.0.chunk().await?)
    }
}
