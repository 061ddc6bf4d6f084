//! A recording transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

use super::{HttpRequest, HttpResponse, ResponseBody, Transport};
use crate::error::TransportError;

/// What the mock does with the next request it sees.
pub(crate) enum Reply {
    Json(Value),
    Text(String),
    Chunks(Vec<&'static str>),
    /// Delivers one chunk, then fails.
    BrokenStream(&'static str),
    Fail(&'static str),
    Nothing,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub host: String,
    pub port: u16,
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub payload: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(self.payload.as_deref().unwrap_or("null")).unwrap()
    }
}

#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: &HttpRequest,
        payload: Option<String>,
    ) -> Result<Option<HttpResponse>, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            host: request.host.clone(),
            port: request.port,
            method: request.method.clone(),
            path: request.path.clone(),
            headers: request.headers.clone(),
            payload,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Fail("no reply queued"));
        let (chunks, error) = match reply {
            Reply::Json(value) => (vec![Bytes::from(value.to_string())], None),
            Reply::Text(text) => (vec![Bytes::from(text)], None),
            Reply::Chunks(parts) => (
                parts
                    .into_iter()
                    .map(|part| Bytes::from_static(part.as_bytes()))
                    .collect(),
                None,
            ),
            Reply::BrokenStream(part) => (
                vec![Bytes::from_static(part.as_bytes())],
                Some("stream reset"),
            ),
            Reply::Fail(message) => return Err(message.into()),
            Reply::Nothing => return Ok(None),
        };

        Ok(Some(HttpResponse {
            status: 200,
            body: Box::new(ChunkBody {
                chunks: chunks.into(),
                error,
            }),
        }))
    }
}

struct ChunkBody {
    chunks: VecDeque<Bytes>,
    error: Option<&'static str>,
}

#[async_trait]
impl ResponseBody for ChunkBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        if let Some(chunk) = self.chunks.pop_front() {
            return Ok(Some(chunk));
        }
        match self.error.take() {
            Some(message) => Err(message.into()),
            None => Ok(None),
        }
    }
}
