mod executor;
mod request;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::RequestExecutor;
pub use request::{HttpRequest, RequestDescriptor};
pub use transport::{HttpResponse, ReqwestTransport, ResponseBody, Transport};
