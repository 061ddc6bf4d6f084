use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

/// One logical API call, before credentials and the base path are applied.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub(crate) path: String,
    pub(crate) method: Method,
    pub(crate) body: Option<Value>,
}

impl RequestDescriptor {
    /// A GET against `path`, relative to the versioned base path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            body: None,
        }
    }

    /// Attaches a JSON body. Sending a body always means POST, unless
    /// [`RequestDescriptor::method`] is called afterwards.
    pub fn body(mut self, body: Value) -> Self {
        self.method = Method::POST;
        self.body = Some(body);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn http_method(&self) -> &Method {
        &self.method
    }

    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Fully resolved connection parameters for a single request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub host: String,
    pub port: u16,
    /// Absolute path, including the version prefix and any query string.
    pub path: String,
    pub method: Method,
    pub headers: HeaderMap,
    /// Serialized by the executor right before dispatch.
    pub body: Option<Value>,
}
