use std::fmt;

use reqwest::header::{HeaderName, InvalidHeaderValue};

/// Errors raised by a [`Transport`](crate::http::Transport) implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Which half of the two-phase upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// Storing the file as an application asset.
    Asset,
    /// Creating the record that references the stored asset.
    Attach,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPhase::Asset => f.write_str("asset"),
            UploadPhase::Attach => f.write_str("attach"),
        }
    }
}

/// Possible failures while talking to the Knack API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, DNS, TLS, or mid-stream failures from the transport.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The transport returned without a response we could read from.
    #[error("transport produced no response")]
    MissingResponse,

    /// The response body was not JSON. `body` holds the raw text as received.
    #[error("response body is not valid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// A credential or application id can't be sent as a header value.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        name: HeaderName,
        #[source]
        source: InvalidHeaderValue,
    },

    /// The JSON body could not be turned into text.
    #[error("request body could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A response parsed fine but lacked a value we depend on.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    /// An object or record key that would not survive as a single path
    /// segment under the versioned base path.
    #[error("invalid key {key:?}: keys must be a single path segment")]
    InvalidKey { key: String },

    /// An upload body that isn't a JSON object.
    #[error("request body must be a JSON object")]
    InvalidBody,

    /// One half of the two-phase upload failed. `source` is that phase's
    /// error, unchanged.
    #[error("upload failed during the {phase} phase: {source}")]
    Upload {
        phase: UploadPhase,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The raw response text, if this is a parse failure.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Error::Parse { body, .. } => Some(body.as_str()),
            Error::Upload { source, .. } => source.raw_body(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
