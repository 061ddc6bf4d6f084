//! Client for the Knack REST API.
//!
//! ```no_run
//! use knackhq::{ClientOptions, KnackClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> knackhq::Result<()> {
//!     let client = KnackClient::new(ClientOptions::new("your-app-id").api_key("your-api-key"));
//!
//!     let objects = client.objects().await?;
//!     println!("{objects}");
//!
//!     let matches = client
//!         .find_record("object_1", Some(json!({"match": "and", "rules": []})), Some(1), Some(25))
//!         .await?;
//!     println!("{matches}");
//!     Ok(())
//! }
//! ```
//!
//! Every operation resolves to whatever JSON the API answered with. Nothing is
//! cached or retried, and no timeouts are applied.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{ClientBuilder, KnackClient, RecordQuery};
pub use config::ClientOptions;
pub use error::{Error, Result, TransportError, UploadPhase};
pub use http::{
    HttpRequest, HttpResponse, RequestDescriptor, RequestExecutor, ReqwestTransport,
    ResponseBody, Transport,
};
