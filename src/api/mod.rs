mod client;
mod query;
mod session;
mod upload;

pub use client::{ClientBuilder, KnackClient};
pub use query::RecordQuery;
