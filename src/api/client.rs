use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::query::RecordQuery;
use super::session::Session;
use crate::config::{ClientOptions, API_HOST, API_PORT, API_VERSION};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, RequestDescriptor, RequestExecutor, ReqwestTransport, Transport};

/// Builder for configuring a [`KnackClient`].
pub struct ClientBuilder {
    options: ClientOptions,
    host: String,
    port: u16,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    fn new(options: ClientOptions) -> Self {
        Self {
            options,
            host: API_HOST.to_string(),
            port: API_PORT,
            transport: None,
        }
    }

    /// Points the client somewhere other than the Knack API, e.g. a local
    /// mock server.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the default `reqwest` transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> KnackClient {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        KnackClient {
            session: Session::new(self.options),
            executor: RequestExecutor::new(transport),
            host: self.host,
            port: self.port,
        }
    }
}

/// Client for the Knack REST API.
///
/// Objects and records are passed through as plain JSON; their shape is
/// defined by each application and not interpreted here.
pub struct KnackClient {
    session: Session,
    executor: RequestExecutor,
    host: String,
    port: u16,
}

impl fmt::Debug for KnackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnackClient")
            .field("app_id", &self.session.app_id())
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl KnackClient {
    /// Creates a client talking to the Knack API over HTTPS.
    pub fn new(options: ClientOptions) -> Self {
        Self::builder(options).build()
    }

    pub fn builder(options: ClientOptions) -> ClientBuilder {
        ClientBuilder::new(options)
    }

    pub fn app_id(&self) -> &str {
        self.session.app_id()
    }

    /// The session token, once one was given or obtained via
    /// [`KnackClient::authenticate`].
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// Sends a request to `path` under the versioned base path, with the
    /// application id and the active credential attached.
    #[instrument(skip(self, descriptor), fields(path = %descriptor.path))]
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<Value> {
        let request = HttpRequest {
            host: self.host.clone(),
            port: self.port,
            path: format!("/{API_VERSION}/{}", descriptor.path),
            method: descriptor.method,
            headers: self.session.headers()?,
            body: descriptor.body,
        };
        self.executor.execute(request).await
    }

    /// Exchanges an email and password for a session token.
    ///
    /// The token is kept and used in place of the API key for every later
    /// request. Returns `Ok(None)` without contacting the API if either
    /// credential is empty.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<String>> {
        if email.is_empty() || password.is_empty() {
            debug!("missing email or password, skipping authentication");
            return Ok(None);
        }

        let path = format!(
            "applications/{}/session",
            path_segment(self.session.app_id())?
        );
        let response = self
            .request(RequestDescriptor::new(path).body(json!({
                "email": email,
                "password": password,
            })))
            .await?;

        // Our token is nested within the session's user.
        let token = response
            .pointer("/session/user/token")
            .and_then(Value::as_str)
            .ok_or(Error::MissingField("session.user.token"))?
            .to_string();
        self.session.set_token(token.clone());
        debug!("session token stored");

        Ok(Some(token))
    }

    /// Lists the application's objects.
    pub async fn objects(&self) -> Result<Value> {
        self.request(RequestDescriptor::new("objects")).await
    }

    pub async fn records(&self, object_key: &str) -> Result<Value> {
        self.request(RequestDescriptor::new(records_path(object_key)?))
            .await
    }

    pub async fn get_record(&self, object_key: &str, record_key: &str) -> Result<Value> {
        self.request(RequestDescriptor::new(record_path(object_key, record_key)?))
            .await
    }

    pub async fn create_record(&self, object_key: &str, body: Value) -> Result<Value> {
        self.request(RequestDescriptor::new(records_path(object_key)?).body(body))
            .await
    }

    pub async fn delete_record(&self, object_key: &str, record_key: &str) -> Result<Value> {
        let path = record_path(object_key, record_key)?;
        self.request(RequestDescriptor::new(path).method(Method::DELETE))
            .await
    }

    pub async fn update_record(
        &self,
        object_key: &str,
        record_key: &str,
        body: Value,
    ) -> Result<Value> {
        self.request(
            RequestDescriptor::new(record_path(object_key, record_key)?)
                .body(body)
                .method(Method::PUT),
        )
        .await
    }

    /// Searches an object's records.
    ///
    /// `filters` is sent as JSON in the `filters` query parameter. A `page`
    /// or `rows_per_page` of `None` (or zero) leaves the parameter out.
    pub async fn find_record(
        &self,
        object_key: &str,
        filters: Option<Value>,
        page: Option<u32>,
        rows_per_page: Option<u32>,
    ) -> Result<Value> {
        let query = RecordQuery {
            filters,
            page,
            rows_per_page,
        };
        self.find_records(object_key, &query).await
    }

    pub async fn find_records(&self, object_key: &str, query: &RecordQuery) -> Result<Value> {
        let path = format!("{}{}", records_path(object_key)?, query.to_query_string());
        self.request(RequestDescriptor::new(path)).await
    }
}

/// Checks that `key` is sent as exactly one path segment.
///
/// Keys are substituted verbatim, so anything the URL parser would
/// reinterpret (separators, dot segments) or rewrite (spaces, quotes and
/// other characters outside the path set) is refused.
pub(crate) fn path_segment(key: &str) -> Result<&str> {
    let verbatim = key.bytes().all(|byte| {
        byte.is_ascii_alphanumeric() || b"-._~!$&'()*+,;=:@%".contains(&byte)
    });
    if key.is_empty() || key == "." || key == ".." || !verbatim {
        return Err(Error::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(key)
}

fn records_path(object_key: &str) -> Result<String> {
    Ok(format!("objects/{}/records", path_segment(object_key)?))
}

fn record_path(object_key: &str, record_key: &str) -> Result<String> {
    Ok(format!(
        "{}/{}",
        records_path(object_key)?,
        path_segment(record_key)?
    ))
}
